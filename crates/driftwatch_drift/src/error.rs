use driftwatch_dataframe::DataFrameError;
use driftwatch_types::TypeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriftError {
    #[error(transparent)]
    TypeError(#[from] TypeError),

    #[error(transparent)]
    DataFrameError(#[from] DataFrameError),

    #[error("Cannot aggregate an empty list of test outcomes")]
    EmptyOutcomesError,

    #[error("No values to test for column: {0}")]
    EmptySampleError(String),

    #[error("Prediction test on {0} requires a model")]
    MissingModelError(String),

    #[error("Failed to compute statistic: {0}")]
    StatisticError(String),
}
