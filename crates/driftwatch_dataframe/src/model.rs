use crate::dataset::Dataset;
use crate::error::DataFrameError;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

/// A trained model that maps every row of a dataset to a prediction.
pub trait PredictionModel: Send + Sync {
    fn predict(&self, dataset: &Dataset) -> Result<Array1<f64>, DataFrameError>;
}

/// Ordinary least squares model, `intercept + sum(coefficient * feature)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressionModel {
    pub features: Vec<String>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegressionModel {
    pub fn new(
        features: Vec<String>,
        coefficients: Vec<f64>,
        intercept: f64,
    ) -> Result<Self, DataFrameError> {
        let model = Self {
            features,
            coefficients,
            intercept,
        };
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), DataFrameError> {
        if self.features.len() != self.coefficients.len() {
            return Err(DataFrameError::ModelShapeError {
                features: self.features.len(),
                coefficients: self.coefficients.len(),
            });
        }
        Ok(())
    }

    /// Loads a model serialized as JSON
    #[instrument]
    pub fn from_path(path: &Path) -> Result<Self, DataFrameError> {
        let raw = std::fs::read_to_string(path)?;
        let model: LinearRegressionModel = serde_json::from_str(&raw)?;
        model.validate()?;

        debug!("Loaded linear model with {} features", model.features.len());
        Ok(model)
    }
}

impl PredictionModel for LinearRegressionModel {
    fn predict(&self, dataset: &Dataset) -> Result<Array1<f64>, DataFrameError> {
        let mut predictions = Array1::from_elem(dataset.num_rows(), self.intercept);

        for (feature, coefficient) in self.features.iter().zip(&self.coefficients) {
            let values = dataset.values_as_f64(feature)?;
            predictions.scaled_add(*coefficient, &*values);
        }

        Ok(predictions)
    }
}
