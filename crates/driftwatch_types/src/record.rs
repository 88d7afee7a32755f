use crate::error::TypeError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of decimal digits kept for persisted scores
pub const SCORE_DECIMALS: i32 = 5;

pub fn round_score(value: f64) -> f64 {
    let factor = 10f64.powi(SCORE_DECIMALS);
    (value * factor).round() / factor
}

/// One row of `data_drift_metrics`.
///
/// Every score defaults to 0.0 and all setters round to [`SCORE_DECIMALS`],
/// so a record is always complete and persistable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftRecord {
    pub timestamp: DateTime<Utc>,
    pub holiday_drift_score: f64,
    pub weathersit_drift_score: f64,
    pub temp_drift_score: f64,
    pub atemp_drift_score: f64,
    pub windspeed_drift_score: f64,
    pub target_drift_score: f64,
    pub dataset_drift_score: f64,
    pub imp_var_drift_score: f64,
}

impl DriftRecord {
    /// Feature columns that have a score column in the table
    pub const FEATURE_COLUMNS: [&'static str; 5] =
        ["holiday", "weathersit", "temp", "atemp", "windspeed"];

    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            holiday_drift_score: 0.0,
            weathersit_drift_score: 0.0,
            temp_drift_score: 0.0,
            atemp_drift_score: 0.0,
            windspeed_drift_score: 0.0,
            target_drift_score: 0.0,
            dataset_drift_score: 0.0,
            imp_var_drift_score: 0.0,
        }
    }

    pub fn is_tracked_feature(feature: &str) -> bool {
        Self::FEATURE_COLUMNS.contains(&feature)
    }

    fn feature_slot(&mut self, feature: &str) -> Result<&mut f64, TypeError> {
        match feature {
            "holiday" => Ok(&mut self.holiday_drift_score),
            "weathersit" => Ok(&mut self.weathersit_drift_score),
            "temp" => Ok(&mut self.temp_drift_score),
            "atemp" => Ok(&mut self.atemp_drift_score),
            "windspeed" => Ok(&mut self.windspeed_drift_score),
            _ => Err(TypeError::UnknownFeatureColumn(feature.to_string())),
        }
    }

    pub fn set_feature_score(&mut self, feature: &str, score: f64) -> Result<(), TypeError> {
        *self.feature_slot(feature)? = round_score(score);
        Ok(())
    }

    pub fn feature_score(&self, feature: &str) -> Option<f64> {
        match feature {
            "holiday" => Some(self.holiday_drift_score),
            "weathersit" => Some(self.weathersit_drift_score),
            "temp" => Some(self.temp_drift_score),
            "atemp" => Some(self.atemp_drift_score),
            "windspeed" => Some(self.windspeed_drift_score),
            _ => None,
        }
    }

    pub fn set_target_score(&mut self, score: f64) {
        self.target_drift_score = round_score(score);
    }

    pub fn set_dataset_score(&mut self, score: f64) {
        self.dataset_drift_score = round_score(score);
    }

    pub fn set_important_features_score(&mut self, score: f64) {
        self.imp_var_drift_score = round_score(score);
    }
}
