use crate::error::DriftError;
use driftwatch_types::TestOutcome;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PASS_RATE_THRESHOLD: f64 = 0.5;

/// Share of passing tests in a suite and whether it clears the threshold
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DatasetDriftResult {
    pub passed: bool,
    pub metric: f64,
}

/// Aggregates test outcomes into a single pass rate.
///
/// `passed` requires the pass rate to be strictly greater than `threshold`,
/// so a threshold of 1.0 can never be met.
///
/// # Arguments
///
/// * `outcomes` - Outcomes of a suite run
/// * `threshold` - Pass rate the suite must exceed
///
/// # Returns
///
/// * `Result<DatasetDriftResult, DriftError>` - fails on an empty outcome list
pub fn dataset_drift(
    outcomes: &[TestOutcome],
    threshold: f64,
) -> Result<DatasetDriftResult, DriftError> {
    if outcomes.is_empty() {
        return Err(DriftError::EmptyOutcomesError);
    }

    let passed = outcomes.iter().filter(|o| o.passed()).count();
    let ratio = passed as f64 / outcomes.len() as f64;

    Ok(DatasetDriftResult {
        passed: ratio > threshold,
        metric: ratio,
    })
}
