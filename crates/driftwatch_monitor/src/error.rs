use driftwatch_dataframe::DataFrameError;
use driftwatch_drift::DriftError;
use driftwatch_sql::SqlError;
use driftwatch_types::TypeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error(transparent)]
    DriftError(#[from] DriftError),

    #[error(transparent)]
    SqlError(#[from] SqlError),

    #[error(transparent)]
    DataFrameError(#[from] DataFrameError),

    #[error(transparent)]
    TypeError(#[from] TypeError),

    #[error("No rows left in the raw data for tick {tick}")]
    EmptySliceError { tick: usize },

    #[error("Timestamp of tick {tick} is out of range")]
    TimestampOverflowError { tick: usize },
}
