pub mod dataset;
pub mod error;
pub mod model;
pub mod reader;

pub use dataset::{Column, Dataset};
pub use error::DataFrameError;
pub use model::{LinearRegressionModel, PredictionModel};
