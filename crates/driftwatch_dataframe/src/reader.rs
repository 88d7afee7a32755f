use crate::dataset::{Column, Dataset, MISSING_CATEGORY};
use crate::error::DataFrameError;
use arrow::array::{ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use ndarray::Array1;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::fs::File;
use std::path::Path;
use tracing::{debug, error, instrument};

enum ColumnBuffer {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

impl ColumnBuffer {
    fn into_column(self) -> Column {
        match self {
            ColumnBuffer::Numeric(values) => Column::Numeric(Array1::from(values)),
            ColumnBuffer::Categorical(values) => Column::Categorical(values),
        }
    }
}

fn is_numeric_type(data_type: &DataType) -> bool {
    data_type.is_numeric() || matches!(data_type, DataType::Boolean)
}

fn extend_numeric(
    name: &str,
    array: &ArrayRef,
    buffer: &mut Vec<f64>,
) -> Result<(), DataFrameError> {
    let casted = cast(array, &DataType::Float64)?;
    let values = casted.as_primitive_opt::<Float64Type>().ok_or_else(|| {
        error!("Failed to downcast column {} to Float64Array", name);
        DataFrameError::DowncastError(name.to_string())
    })?;

    buffer.extend(values.iter().map(|v| v.unwrap_or(f64::NAN)));
    Ok(())
}

fn extend_categorical(
    name: &str,
    array: &ArrayRef,
    buffer: &mut Vec<String>,
) -> Result<(), DataFrameError> {
    let casted = cast(array, &DataType::Utf8)?;
    let values = casted.as_string_opt::<i32>().ok_or_else(|| {
        error!("Failed to downcast column {} to StringArray", name);
        DataFrameError::DowncastError(name.to_string())
    })?;

    buffer.extend(
        values
            .iter()
            .map(|v| v.unwrap_or(MISSING_CATEGORY).to_string()),
    );
    Ok(())
}

/// Builds a [`Dataset`] from arrow record batches sharing one schema.
///
/// Numeric and boolean columns are read as floats; everything else is read
/// as category labels. Declared categorical numeric columns are labelled by
/// [`Dataset::new`], so `1`, `1.0` and `true` all become `"1"` whatever the
/// physical type in the file.
pub fn dataset_from_batches(
    batches: &[RecordBatch],
    categorical_columns: &[String],
    target: Option<&str>,
) -> Result<Dataset, DataFrameError> {
    let Some(first) = batches.first() else {
        return Dataset::new(Vec::new(), categorical_columns, target);
    };

    let schema = first.schema();
    let mut buffers: Vec<(String, ColumnBuffer)> = schema
        .fields()
        .iter()
        .map(|field| {
            let name = field.name().to_string();
            let buffer = if is_numeric_type(field.data_type()) {
                ColumnBuffer::Numeric(Vec::new())
            } else {
                ColumnBuffer::Categorical(Vec::new())
            };
            (name, buffer)
        })
        .collect();

    for batch in batches {
        for (idx, (name, buffer)) in buffers.iter_mut().enumerate() {
            let array = batch.column(idx);
            match buffer {
                ColumnBuffer::Numeric(values) => extend_numeric(name, array, values)?,
                ColumnBuffer::Categorical(values) => extend_categorical(name, array, values)?,
            }
        }
    }

    let columns = buffers
        .into_iter()
        .map(|(name, buffer)| (name, buffer.into_column()))
        .collect();

    Dataset::new(columns, categorical_columns, target)
}

impl Dataset {
    /// Reads a parquet file into a dataset
    ///
    /// # Arguments
    ///
    /// * `path` - Path of the parquet file
    /// * `categorical_columns` - Columns to treat as categorical
    /// * `target` - Target column name
    #[instrument(skip(categorical_columns))]
    pub fn from_parquet(
        path: &Path,
        categorical_columns: &[String],
        target: Option<&str>,
    ) -> Result<Dataset, DataFrameError> {
        let file = File::open(path).inspect_err(|e| {
            error!("Failed to open parquet file {:?}: {}", path, e);
        })?;

        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
        let batches = reader.collect::<Result<Vec<RecordBatch>, _>>()?;

        let dataset = dataset_from_batches(&batches, categorical_columns, target)?;
        debug!(
            "Loaded {} rows and {} columns from {:?}",
            dataset.num_rows(),
            dataset.column_names().len(),
            path
        );

        Ok(dataset)
    }
}
