pub mod categories;
pub mod chi_square;
pub mod emd;
pub mod ks;
pub mod psi;

use crate::error::DriftError;
use driftwatch_types::{DriftTestConfig, StatTest, TestResult};
use ndarray::Array1;
use std::borrow::Cow;

pub use chi_square::chi_square_test;
pub use emd::earth_movers_distance_test;
pub use ks::ks_test;
pub use psi::psi_test;

/// Values of one column (or one set of predictions) fed to a drift test
#[derive(Debug, Clone)]
pub enum Sample<'a> {
    Numeric(Array1<f64>),
    Categorical(Cow<'a, [String]>),
}

impl Sample<'_> {
    fn numeric(&self, column: &str) -> Result<&Array1<f64>, DriftError> {
        match self {
            Sample::Numeric(values) => Ok(values),
            Sample::Categorical(_) => Err(DriftError::StatisticError(format!(
                "Expected numeric values for {column}"
            ))),
        }
    }

    fn categorical(&self, column: &str) -> Result<&[String], DriftError> {
        match self {
            Sample::Categorical(values) => Ok(values.as_ref()),
            Sample::Numeric(_) => Err(DriftError::StatisticError(format!(
                "Expected categorical values for {column}"
            ))),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Sample::Numeric(values) => values.is_empty(),
            Sample::Categorical(values) => values.is_empty(),
        }
    }
}

/// Runs `test` on a reference and an actual sample with the thresholds in `config`.
pub fn run_stat_test(
    test: StatTest,
    column: &str,
    reference: &Sample,
    actual: &Sample,
    config: &DriftTestConfig,
) -> Result<TestResult, DriftError> {
    if reference.is_empty() || actual.is_empty() {
        return Err(DriftError::EmptySampleError(column.to_string()));
    }

    let threshold = config.threshold(test);

    match test {
        StatTest::Ks => ks_test(
            &reference.numeric(column)?.view(),
            &actual.numeric(column)?.view(),
            threshold,
        ),
        StatTest::EarthMoversDistance => earth_movers_distance_test(
            &reference.numeric(column)?.view(),
            &actual.numeric(column)?.view(),
            threshold,
        ),
        StatTest::Psi => psi_test(
            reference.categorical(column)?,
            actual.categorical(column)?,
            threshold,
            config.max_categories,
        ),
        StatTest::ChiSquare => chi_square_test(
            reference.categorical(column)?,
            actual.categorical(column)?,
            threshold,
            config.max_categories,
        ),
    }
}
