use crate::{env_list_or, env_or};
use chrono::{DateTime, Duration, Utc};
use driftwatch_types::DriftTestConfig;
use serde::Serialize;
use std::path::PathBuf;
use tracing::warn;

/// 2023-12-01T00:00:00Z
const DEFAULT_EPOCH_SECONDS: i64 = 1_701_388_800;

const SECONDS_PER_DAY: i64 = 86_400;

#[derive(Debug, Clone, Serialize)]
pub struct MonitorSettings {
    pub raw_data_path: PathBuf,
    pub reference_data_path: PathBuf,
    pub model_path: PathBuf,

    /// Rows per monitoring window
    pub window_size: usize,
    pub iterations: usize,

    /// Reference row count at or below which the small-sample tests are used
    pub size_threshold: usize,

    pub categorical_features: Vec<String>,
    pub numeric_features: Vec<String>,
    pub target_column: String,

    /// Type tag of the target column, `numeric` or `categorical`
    pub target_type: String,
    pub important_features: Vec<String>,

    pub dataset_threshold: f64,
    pub important_threshold: f64,

    pub epoch: DateTime<Utc>,
    pub tick_step_seconds: i64,

    /// Minimum wall time between two inserts, 0 disables pacing
    pub write_spacing_seconds: u64,

    pub test_config: DriftTestConfig,
}

impl MonitorSettings {
    /// Categorical features first, then numeric ones, in declaration order
    pub fn feature_columns(&self) -> Vec<String> {
        self.categorical_features
            .iter()
            .chain(self.numeric_features.iter())
            .cloned()
            .collect()
    }

    /// Falls back to one day when `tick_step_seconds` is out of range
    pub fn tick_step(&self) -> Duration {
        Duration::try_seconds(self.tick_step_seconds).unwrap_or_else(|| {
            warn!(
                "Tick step of {} seconds is out of range, using one day",
                self.tick_step_seconds
            );
            Duration::days(1)
        })
    }

    pub fn write_spacing(&self) -> Option<std::time::Duration> {
        (self.write_spacing_seconds > 0)
            .then(|| std::time::Duration::from_secs(self.write_spacing_seconds))
    }
}

impl Default for MonitorSettings {
    fn default() -> Self {
        let default_epoch =
            DateTime::<Utc>::UNIX_EPOCH + Duration::seconds(DEFAULT_EPOCH_SECONDS);

        let defaults = DriftTestConfig::default();
        let test_config = DriftTestConfig {
            ks_threshold: env_or("KS_THRESHOLD", defaults.ks_threshold),
            emd_threshold: env_or("EMD_THRESHOLD", defaults.emd_threshold),
            psi_threshold: env_or("PSI_THRESHOLD", defaults.psi_threshold),
            chi_square_threshold: env_or("CHI_SQUARE_THRESHOLD", defaults.chi_square_threshold),
            max_categories: env_or("MAX_CATEGORIES", defaults.max_categories),
        };

        Self {
            raw_data_path: env_or(
                "RAW_DATA_PATH",
                PathBuf::from("./data/raw_data.parquet"),
            ),
            reference_data_path: env_or(
                "REFERENCE_DATA_PATH",
                PathBuf::from("./data/reference_data.parquet"),
            ),
            model_path: env_or("MODEL_PATH", PathBuf::from("./model/lr_model.json")),
            window_size: env_or("MONITOR_WINDOW_SIZE", 100),
            iterations: env_or("MONITOR_ITERATIONS", 5),
            size_threshold: env_or("MONITOR_SIZE_THRESHOLD", 1000),
            categorical_features: env_list_or(
                "MONITOR_CATEGORICAL_FEATURES",
                &["holiday", "weathersit"],
            ),
            numeric_features: env_list_or(
                "MONITOR_NUMERIC_FEATURES",
                &["temp", "atemp", "windspeed"],
            ),
            target_column: env_or("MONITOR_TARGET_COLUMN", "cnt".to_string()),
            target_type: env_or("MONITOR_TARGET_TYPE", "numeric".to_string()),
            important_features: env_list_or(
                "MONITOR_IMPORTANT_FEATURES",
                &["temp", "atemp", "windspeed"],
            ),
            dataset_threshold: env_or("MONITOR_DATASET_THRESHOLD", 0.5),
            important_threshold: env_or("MONITOR_IMPORTANT_THRESHOLD", 1.0),
            epoch: env_or("MONITOR_EPOCH", default_epoch),
            tick_step_seconds: env_or("MONITOR_TICK_STEP_SECONDS", SECONDS_PER_DAY),
            write_spacing_seconds: env_or("MONITOR_WRITE_SPACING_SECONDS", 0),
            test_config,
        }
    }
}
