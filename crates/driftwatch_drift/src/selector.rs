use crate::error::DriftError;
use driftwatch_types::{ColumnType, StatTest, TestKind};
use std::str::FromStr;

/// Reference row count at or below which the small-sample tests are used
pub const DEFAULT_SIZE_THRESHOLD: usize = 1000;

/// Picks the drift test for a column.
///
/// | column type | `row_count <= size_threshold` | larger |
/// |---|---|---|
/// | numeric | KS | Earth-Mover's distance |
/// | categorical | PSI | chi-square |
///
/// Prediction columns get the prediction variant of the same test.
pub fn select_test_kind(
    column_type: ColumnType,
    row_count: usize,
    is_prediction: bool,
    size_threshold: usize,
) -> TestKind {
    let is_small_dataset = row_count <= size_threshold;

    let test = match (column_type, is_small_dataset) {
        (ColumnType::Numeric, true) => StatTest::Ks,
        (ColumnType::Numeric, false) => StatTest::EarthMoversDistance,
        (ColumnType::Categorical, true) => StatTest::Psi,
        (ColumnType::Categorical, false) => StatTest::ChiSquare,
    };

    TestKind::new(test, is_prediction)
}

/// Same as [`select_test_kind`] for a raw type tag, failing with
/// `UnsupportedColumnType` for anything other than `numeric` or `categorical`.
pub fn select_test(
    column_type: &str,
    row_count: usize,
    is_prediction: bool,
    size_threshold: usize,
) -> Result<TestKind, DriftError> {
    let column_type = ColumnType::from_str(column_type)?;
    Ok(select_test_kind(
        column_type,
        row_count,
        is_prediction,
        size_threshold,
    ))
}
