use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataFrameError {
    #[error("Column {0} not found in dataset")]
    ColumnNotFoundError(String),

    #[error("Column {column} has {found} rows, expected {expected}")]
    ColumnLengthError {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("Value {value} in column {column} is not numeric")]
    NonNumericValueError { column: String, value: String },

    #[error("Failed to downcast column {0}")]
    DowncastError(String),

    #[error("Model has {features} features but {coefficients} coefficients")]
    ModelShapeError { features: usize, coefficients: usize },

    #[error(transparent)]
    ArrowError(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    ParquetError(#[from] parquet::errors::ParquetError),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),
}
