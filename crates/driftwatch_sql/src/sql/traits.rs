use crate::sql::error::SqlError;
use async_trait::async_trait;
use driftwatch_types::DriftRecord;

/// Sink for the per-tick drift records
#[async_trait]
pub trait DriftRecordStore: Send + Sync {
    /// Persists one record; the write is atomic
    async fn insert_drift_record(&self, record: &DriftRecord) -> Result<(), SqlError>;
}
