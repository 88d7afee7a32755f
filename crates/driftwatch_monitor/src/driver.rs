use crate::clock::{FixedStepClock, TickClock};
use crate::error::MonitorError;
use chrono::{DateTime, Utc};
use driftwatch_dataframe::{Dataset, PredictionModel};
use driftwatch_drift::suite::TargetColumn;
use driftwatch_drift::{dataset_drift, DatasetDriftResult, DriftSuite, SuiteResult};
use driftwatch_settings::MonitorSettings;
use driftwatch_sql::DriftRecordStore;
use driftwatch_types::{DriftRecord, TypeError};
use serde::Serialize;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, instrument};

const ALL_FEATURES_SUITE: &str = "all_features_drift_test";
const IMPORTANT_FEATURES_SUITE: &str = "important_features_drift_test";

/// Everything computed during one tick
#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    pub tick: usize,
    pub timestamp: DateTime<Utc>,
    pub record: DriftRecord,
    pub dataset_drift: DatasetDriftResult,
    pub important_features_drift: DatasetDriftResult,
    pub all_features: SuiteResult,
    pub important_features: SuiteResult,
}

/// Runs the monitoring loop: one window of raw rows per tick, tested against
/// the reference data and written to `store`.
pub struct MonitorDriver<S: DriftRecordStore> {
    reference: Dataset,
    raw: Dataset,
    model: Arc<dyn PredictionModel>,
    settings: MonitorSettings,
    clock: Box<dyn TickClock>,
    store: S,
    all_features_suite: DriftSuite,
    important_features_suite: DriftSuite,
    last_write: Option<Instant>,
}

impl<S: DriftRecordStore> MonitorDriver<S> {
    /// Validates the configured columns and builds both suites from the
    /// reference data.
    ///
    /// # Arguments
    ///
    /// * `reference` - Reference dataset
    /// * `raw` - Dataset the windows are taken from
    /// * `model` - Model used for the target prediction test
    /// * `settings` - Monitor settings
    /// * `store` - Destination of the drift records
    ///
    /// # Returns
    ///
    /// * `Result<Self, MonitorError>` - Fails on a feature without a score
    ///   column, a column missing from either dataset or an unsupported target type
    pub fn new(
        reference: Dataset,
        raw: Dataset,
        model: Arc<dyn PredictionModel>,
        settings: MonitorSettings,
        store: S,
    ) -> Result<Self, MonitorError> {
        let features = settings.feature_columns();

        for feature in &features {
            if !DriftRecord::is_tracked_feature(feature) {
                return Err(TypeError::UnknownFeatureColumn(feature.clone()).into());
            }
        }

        for column in features.iter().chain(settings.important_features.iter()) {
            reference.column(column)?;
            raw.column(column)?;
        }

        let target = TargetColumn {
            name: settings.target_column.clone(),
            column_type: settings.target_type.clone(),
        };

        let all_features_suite = DriftSuite::build(
            ALL_FEATURES_SUITE,
            &features,
            &reference,
            Some(&target),
            settings.size_threshold,
        )?;

        let important_features_suite = DriftSuite::build(
            IMPORTANT_FEATURES_SUITE,
            &settings.important_features,
            &reference,
            None,
            settings.size_threshold,
        )?;

        Ok(Self {
            clock: Box::new(FixedStepClock::from_settings(&settings)),
            reference,
            raw,
            model,
            settings,
            store,
            all_features_suite,
            important_features_suite,
            last_write: None,
        })
    }

    pub fn with_clock(mut self, clock: impl TickClock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Runs every configured tick in order, stopping at the first failure
    pub async fn run(&mut self) -> Result<Vec<TickReport>, MonitorError> {
        info!(
            "Starting drift monitoring for {} ticks of {} rows",
            self.settings.iterations, self.settings.window_size
        );

        let mut reports = Vec::with_capacity(self.settings.iterations);
        for tick in 0..self.settings.iterations {
            reports.push(self.run_tick(tick).await?);
        }

        info!("Drift monitoring finished");
        Ok(reports)
    }

    /// Tests window `tick` of the raw data and persists its drift record
    #[instrument(skip(self))]
    pub async fn run_tick(&mut self, tick: usize) -> Result<TickReport, MonitorError> {
        let window_size = self.settings.window_size;
        // an offset past usize::MAX is past the end of any data
        let offset = tick
            .checked_mul(window_size)
            .ok_or(MonitorError::EmptySliceError { tick })?;
        let current = self.raw.slice(offset, window_size);

        if current.is_empty() {
            return Err(MonitorError::EmptySliceError { tick });
        }
        debug!("Window has {} rows", current.num_rows());

        let all_features = self.all_features_suite.run(
            &current,
            &self.reference,
            Some(self.model.as_ref()),
            &self.settings.test_config,
        )?;
        let dataset_result =
            dataset_drift(&all_features.outcomes, self.settings.dataset_threshold)?;

        let important_features = self.important_features_suite.run(
            &current,
            &self.reference,
            None,
            &self.settings.test_config,
        )?;
        let important_result = dataset_drift(
            &important_features.outcomes,
            self.settings.important_threshold,
        )?;

        let timestamp = self.clock.timestamp(tick)?;
        let record = build_record(timestamp, &all_features, &dataset_result, &important_result)?;

        self.pace_write().await;
        self.store.insert_drift_record(&record).await?;
        self.last_write = Some(Instant::now());

        info!(
            "Tick {} at {}: dataset drift score {} (passed: {}), important features drift score {} (passed: {})",
            tick,
            timestamp,
            record.dataset_drift_score,
            dataset_result.passed,
            record.imp_var_drift_score,
            important_result.passed
        );

        Ok(TickReport {
            tick,
            timestamp,
            record,
            dataset_drift: dataset_result,
            important_features_drift: important_result,
            all_features,
            important_features,
        })
    }

    async fn pace_write(&self) {
        if let (Some(spacing), Some(last_write)) = (self.settings.write_spacing(), self.last_write) {
            let deadline = last_write + spacing;
            if deadline > Instant::now() {
                debug!("Waiting before next insert");
                tokio::time::sleep_until(deadline).await;
            }
        }
    }
}

/// Feature scores come from every outcome but the last, which holds the
/// target prediction test.
fn build_record(
    timestamp: DateTime<Utc>,
    all_features: &SuiteResult,
    dataset_drift: &DatasetDriftResult,
    important_features_drift: &DatasetDriftResult,
) -> Result<DriftRecord, MonitorError> {
    let mut record = DriftRecord::new(timestamp);

    if let Some((target, features)) = all_features.split_target() {
        for outcome in features {
            record.set_feature_score(&outcome.column_name, outcome.metric())?;
        }
        record.set_target_score(target.metric());
    }

    record.set_dataset_score(dataset_drift.metric);
    record.set_important_features_score(important_features_drift.metric);

    Ok(record)
}
