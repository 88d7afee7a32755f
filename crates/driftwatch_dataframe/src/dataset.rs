use crate::error::DataFrameError;
use ndarray::{s, Array1, ArrayView1};
use std::borrow::Cow;
use std::collections::HashMap;

/// Placeholder category for null values
pub const MISSING_CATEGORY: &str = "missing";

#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Array1<f64>),
    Categorical(Vec<String>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(values) => values.len(),
            Column::Categorical(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slice(&self, start: usize, end: usize) -> Column {
        match self {
            Column::Numeric(values) => Column::Numeric(values.slice(s![start..end]).to_owned()),
            Column::Categorical(values) => Column::Categorical(values[start..end].to_vec()),
        }
    }

    fn into_categorical(self) -> Column {
        match self {
            Column::Numeric(values) => {
                Column::Categorical(values.iter().map(|v| format_category(*v)).collect())
            }
            categorical => categorical,
        }
    }
}

/// Renders a numeric value as a category label, `1.0` becomes `"1"`.
pub fn format_category(value: f64) -> String {
    if !value.is_finite() {
        MISSING_CATEGORY.to_string()
    } else if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Column-oriented table with its declared categorical columns and target.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    names: Vec<String>,
    columns: HashMap<String, Column>,
    categorical_columns: Vec<String>,
    target: Option<String>,
    num_rows: usize,
}

impl Dataset {
    /// Builds a dataset from named columns.
    ///
    /// Columns listed in `categorical_columns` are always stored as categories,
    /// numeric input for them is converted to labels.
    ///
    /// # Arguments
    ///
    /// * `columns` - Ordered `(name, column)` pairs, all of the same length
    /// * `categorical_columns` - Names of the categorical columns
    /// * `target` - Name of the target column, if any
    pub fn new(
        columns: Vec<(String, Column)>,
        categorical_columns: &[String],
        target: Option<&str>,
    ) -> Result<Self, DataFrameError> {
        let num_rows = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
        let mut names = Vec::with_capacity(columns.len());
        let mut map = HashMap::with_capacity(columns.len());

        for (name, column) in columns {
            if column.len() != num_rows {
                return Err(DataFrameError::ColumnLengthError {
                    column: name,
                    expected: num_rows,
                    found: column.len(),
                });
            }

            let column = if categorical_columns.contains(&name) {
                column.into_categorical()
            } else {
                column
            };

            names.push(name.clone());
            map.insert(name, column);
        }

        Ok(Self {
            names,
            columns: map,
            categorical_columns: categorical_columns.to_vec(),
            target: target.map(str::to_string),
            num_rows,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn categorical_columns(&self) -> &[String] {
        &self.categorical_columns
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn is_categorical(&self, name: &str) -> bool {
        self.categorical_columns.iter().any(|c| c == name)
    }

    pub fn column(&self, name: &str) -> Result<&Column, DataFrameError> {
        self.columns
            .get(name)
            .ok_or_else(|| DataFrameError::ColumnNotFoundError(name.to_string()))
    }

    /// Values of a column as floats; categorical labels must parse as numbers.
    pub fn values_as_f64(&self, name: &str) -> Result<Cow<'_, Array1<f64>>, DataFrameError> {
        match self.column(name)? {
            Column::Numeric(values) => Ok(Cow::Borrowed(values)),
            Column::Categorical(values) => values
                .iter()
                .map(|v| {
                    if v == MISSING_CATEGORY {
                        return Ok(f64::NAN);
                    }
                    v.parse::<f64>()
                        .map_err(|_| DataFrameError::NonNumericValueError {
                            column: name.to_string(),
                            value: v.clone(),
                        })
                })
                .collect::<Result<Array1<f64>, _>>()
                .map(Cow::Owned),
        }
    }

    /// Finite values of a numeric column, nulls and infinities dropped.
    pub fn finite_values(&self, name: &str) -> Result<Array1<f64>, DataFrameError> {
        let values = self.values_as_f64(name)?;
        Ok(clean_values(&values.view()))
    }

    /// Values of a column as category labels.
    pub fn values_as_categories(&self, name: &str) -> Result<Cow<'_, [String]>, DataFrameError> {
        match self.column(name)? {
            Column::Categorical(values) => Ok(Cow::Borrowed(values.as_slice())),
            Column::Numeric(values) => Ok(Cow::Owned(
                values.iter().map(|v| format_category(*v)).collect(),
            )),
        }
    }

    /// Rows `[offset, offset + len)`, clamped to the dataset length.
    pub fn slice(&self, offset: usize, len: usize) -> Dataset {
        let start = offset.min(self.num_rows);
        let end = offset.saturating_add(len).min(self.num_rows);

        let columns = self
            .columns
            .iter()
            .map(|(name, column)| (name.clone(), column.slice(start, end)))
            .collect();

        Dataset {
            names: self.names.clone(),
            columns,
            categorical_columns: self.categorical_columns.clone(),
            target: self.target.clone(),
            num_rows: end - start,
        }
    }
}

pub fn clean_values(values: &ArrayView1<f64>) -> Array1<f64> {
    values.iter().filter(|v| v.is_finite()).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn dataset() -> Dataset {
        Dataset::new(
            vec![
                ("holiday".to_string(), Column::Numeric(array![0., 1., 0., 0.])),
                ("temp".to_string(), Column::Numeric(array![0.2, 0.3, f64::NAN, 0.5])),
                (
                    "season".to_string(),
                    Column::Categorical(vec![
                        "spring".to_string(),
                        "summer".to_string(),
                        "fall".to_string(),
                        "missing".to_string(),
                    ]),
                ),
            ],
            &["holiday".to_string()],
            Some("temp"),
        )
        .unwrap()
    }

    #[test]
    fn test_declared_categorical_columns_are_labels() {
        let data = dataset();

        assert_eq!(data.num_rows(), 4);
        assert!(data.is_categorical("holiday"));
        assert_eq!(
            data.column("holiday").unwrap(),
            &Column::Categorical(vec![
                "0".to_string(),
                "1".to_string(),
                "0".to_string(),
                "0".to_string()
            ])
        );

        // labels parse back for models
        let holiday = data.values_as_f64("holiday").unwrap();
        assert_eq!(holiday.to_vec(), vec![0., 1., 0., 0.]);
    }

    #[test]
    fn test_non_numeric_labels() {
        let data = dataset();
        let err = data.values_as_f64("season").unwrap_err();
        assert!(matches!(err, DataFrameError::NonNumericValueError { .. }));
    }

    #[test]
    fn test_finite_values() {
        let data = dataset();
        assert_eq!(data.finite_values("temp").unwrap().to_vec(), vec![0.2, 0.3, 0.5]);
    }

    #[test]
    fn test_slice() {
        let data = dataset();

        let window = data.slice(1, 2);
        assert_eq!(window.num_rows(), 2);
        assert_eq!(window.column_names(), data.column_names());
        assert_eq!(window.target(), Some("temp"));
        assert_eq!(
            window.values_as_categories("season").unwrap().to_vec(),
            vec!["summer".to_string(), "fall".to_string()]
        );

        // windows past the end are clamped
        assert_eq!(data.slice(3, 100).num_rows(), 1);
        assert!(data.slice(10, 100).is_empty());
    }

    #[test]
    fn test_length_mismatch() {
        let result = Dataset::new(
            vec![
                ("a".to_string(), Column::Numeric(array![1., 2.])),
                ("b".to_string(), Column::Numeric(array![1.])),
            ],
            &[],
            None,
        );

        assert!(matches!(
            result,
            Err(DataFrameError::ColumnLengthError { found: 1, .. })
        ));
    }

    #[test]
    fn test_missing_column() {
        let data = dataset();
        assert!(matches!(
            data.column("hum"),
            Err(DataFrameError::ColumnNotFoundError(_))
        ));
    }

    #[test]
    fn test_format_category() {
        assert_eq!(format_category(2.0), "2");
        assert_eq!(format_category(-1.0), "-1");
        assert_eq!(format_category(0.25), "0.25");
        assert_eq!(format_category(f64::NAN), MISSING_CATEGORY);
    }
}
