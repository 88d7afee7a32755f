use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum TypeError {
    #[error("Unsupported column type: {0}")]
    UnsupportedColumnType(String),

    #[error("Column {0} is not a tracked feature of the drift record")]
    UnknownFeatureColumn(String),
}
