use crate::error::DriftError;
use crate::selector::select_test_kind;
use crate::stats::{run_stat_test, Sample};
use driftwatch_dataframe::dataset::{clean_values, format_category};
use driftwatch_dataframe::{Dataset, PredictionModel};
use driftwatch_types::{
    ColumnDescriptor, ColumnType, DriftTestConfig, StatTest, TestKind, TestOutcome,
};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;
use tracing::{debug, info, instrument};

/// Column whose drift is measured on the model's predictions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetColumn {
    pub name: String,

    /// `numeric` or `categorical`
    pub column_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriftTest {
    pub kind: TestKind,
    pub column: ColumnDescriptor,
}

/// Ordered collection of drift tests run against the same pair of datasets
#[derive(Debug, Clone, PartialEq)]
pub struct DriftSuite {
    pub name: String,
    pub tests: Vec<DriftTest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuiteResult {
    pub name: String,
    pub outcomes: Vec<TestOutcome>,
}

impl SuiteResult {
    pub fn passed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    /// Last outcome and the ones before it. For a suite built with a target
    /// the last outcome is the target's prediction test.
    pub fn split_target(&self) -> Option<(&TestOutcome, &[TestOutcome])> {
        self.outcomes.split_last()
    }
}

impl DriftSuite {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tests: Vec::new(),
        }
    }

    pub fn add_test(&mut self, test: DriftTest) {
        self.tests.push(test);
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Builds a suite with one test per column, plus a prediction test for
    /// the target when one is given.
    ///
    /// Test sizes are chosen from the reference row count. A column is
    /// categorical when the reference dataset declares it so.
    ///
    /// # Arguments
    ///
    /// * `name` - Suite name
    /// * `columns` - Feature columns to test, in order
    /// * `reference` - Reference dataset
    /// * `target` - Target column tested on predictions, added last
    /// * `size_threshold` - Row count separating small and large datasets
    pub fn build(
        name: &str,
        columns: &[String],
        reference: &Dataset,
        target: Option<&TargetColumn>,
        size_threshold: usize,
    ) -> Result<Self, DriftError> {
        let row_count = reference.num_rows();
        let mut suite = DriftSuite::new(name);

        for column in columns {
            let column_type = if reference.is_categorical(column) {
                ColumnType::Categorical
            } else {
                ColumnType::Numeric
            };

            suite.add_test(DriftTest {
                kind: select_test_kind(column_type, row_count, false, size_threshold),
                column: ColumnDescriptor::feature(column, column_type),
            });
        }

        if let Some(target) = target {
            let column_type = ColumnType::from_str(&target.column_type)?;
            suite.add_test(DriftTest {
                kind: select_test_kind(column_type, row_count, true, size_threshold),
                column: ColumnDescriptor::target(&target.name, column_type),
            });
        }

        debug!(
            "Built suite {} with {} tests over {} reference rows",
            suite.name,
            suite.len(),
            row_count
        );

        Ok(suite)
    }

    /// Runs every test of the suite in order.
    ///
    /// Prediction tests need `model`; its predictions over both datasets are
    /// computed once, before any test runs.
    #[instrument(skip_all, fields(suite = %self.name))]
    pub fn run(
        &self,
        actual: &Dataset,
        reference: &Dataset,
        model: Option<&dyn PredictionModel>,
        config: &DriftTestConfig,
    ) -> Result<SuiteResult, DriftError> {
        let predictions = match self.tests.iter().find(|t| t.kind.is_prediction()) {
            Some(test) => {
                let model = model
                    .ok_or_else(|| DriftError::MissingModelError(test.column.name.clone()))?;
                Some((model.predict(reference)?, model.predict(actual)?))
            }
            None => None,
        };
        let mut outcomes = Vec::with_capacity(self.tests.len());

        for test in &self.tests {
            let stat_test = test.kind.stat_test();
            let column = test.column.name.as_str();

            let (reference_sample, actual_sample) = match &predictions {
                Some((reference_pred, actual_pred)) if test.kind.is_prediction() => (
                    prediction_sample(reference_pred, stat_test),
                    prediction_sample(actual_pred, stat_test),
                ),
                _ => (
                    column_sample(reference, column, stat_test)?,
                    column_sample(actual, column, stat_test)?,
                ),
            };

            let result = run_stat_test(stat_test, column, &reference_sample, &actual_sample, config)?;
            let outcome = TestOutcome::new(test.kind, column, result);

            debug!(
                "{} passed: {}, metric: {}",
                outcome.test_id, outcome.result.passed, outcome.result.metric
            );
            outcomes.push(outcome);
        }

        let result = SuiteResult {
            name: self.name.clone(),
            outcomes,
        };

        info!(
            "Suite {} finished: {}/{} tests passed",
            result.name,
            result.passed_count(),
            result.outcomes.len()
        );

        Ok(result)
    }
}

fn uses_numeric_input(test: StatTest) -> bool {
    matches!(test, StatTest::Ks | StatTest::EarthMoversDistance)
}

fn column_sample<'a>(
    dataset: &'a Dataset,
    column: &str,
    test: StatTest,
) -> Result<Sample<'a>, DriftError> {
    if uses_numeric_input(test) {
        Ok(Sample::Numeric(dataset.finite_values(column)?))
    } else {
        Ok(Sample::Categorical(dataset.values_as_categories(column)?))
    }
}

fn prediction_sample(predictions: &Array1<f64>, test: StatTest) -> Sample<'static> {
    if uses_numeric_input(test) {
        Sample::Numeric(clean_values(&predictions.view()))
    } else {
        Sample::Categorical(Cow::Owned(
            predictions.iter().map(|v| format_category(*v)).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::dataset_drift;
    use crate::selector::DEFAULT_SIZE_THRESHOLD;
    use driftwatch_dataframe::{Column, LinearRegressionModel};
    use driftwatch_types::ColumnRole;

    /// Deterministic stand-in for the bike sharing data
    fn bike_data(rows: usize, shift: f64) -> Dataset {
        let idx = Array1::from_iter((0..rows).map(|i| i as f64));
        let holiday = idx.mapv(|i| if (i as usize) % 7 == 0 { 1.0 } else { 0.0 });
        let weathersit = idx.mapv(|i| ((i as usize) % 3 + 1) as f64);
        let temp = idx.mapv(|i| ((i * 0.37).sin() + 1.0) / 2.0 + shift);
        let atemp = idx.mapv(|i| ((i * 0.53).cos() + 1.0) / 2.0 + shift);
        let windspeed = idx.mapv(|i| ((i * 0.11).sin().abs()) * 0.5 + shift);
        let cnt = idx.mapv(|i| 100.0 + 50.0 * (i * 0.29).sin());

        Dataset::new(
            vec![
                ("holiday".to_string(), Column::Numeric(holiday)),
                ("weathersit".to_string(), Column::Numeric(weathersit)),
                ("temp".to_string(), Column::Numeric(temp)),
                ("atemp".to_string(), Column::Numeric(atemp)),
                ("windspeed".to_string(), Column::Numeric(windspeed)),
                ("cnt".to_string(), Column::Numeric(cnt)),
            ],
            &["holiday".to_string(), "weathersit".to_string()],
            Some("cnt"),
        )
        .unwrap()
    }

    fn model() -> LinearRegressionModel {
        LinearRegressionModel::new(
            vec!["temp".to_string(), "atemp".to_string(), "windspeed".to_string()],
            vec![300.0, 100.0, -50.0],
            20.0,
        )
        .unwrap()
    }

    fn features() -> Vec<String> {
        ["holiday", "weathersit", "temp", "atemp", "windspeed"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn target() -> TargetColumn {
        TargetColumn {
            name: "cnt".to_string(),
            column_type: "numeric".to_string(),
        }
    }

    #[test]
    fn test_build_small_reference() {
        let reference = bike_data(500, 0.0);
        let suite = DriftSuite::build(
            "all_features_drift_test",
            &features(),
            &reference,
            Some(&target()),
            DEFAULT_SIZE_THRESHOLD,
        )
        .unwrap();

        let kinds: Vec<TestKind> = suite.tests.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TestKind::Psi,
                TestKind::Psi,
                TestKind::Ks,
                TestKind::Ks,
                TestKind::Ks,
                TestKind::PredictionKs,
            ]
        );

        let last = suite.tests.last().unwrap();
        assert_eq!(last.column.name, "cnt");
        assert_eq!(last.column.role, ColumnRole::Target);
    }

    #[test]
    fn test_build_large_reference() {
        let reference = bike_data(1500, 0.0);
        let suite =
            DriftSuite::build("large", &features(), &reference, Some(&target()), DEFAULT_SIZE_THRESHOLD)
                .unwrap();

        let kinds: Vec<TestKind> = suite.tests.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TestKind::ChiSquare,
                TestKind::ChiSquare,
                TestKind::EarthMoversDistance,
                TestKind::EarthMoversDistance,
                TestKind::EarthMoversDistance,
                TestKind::PredictionEarthMoversDistance,
            ]
        );
    }

    #[test]
    fn test_build_unsupported_target_type() {
        let reference = bike_data(100, 0.0);
        let target = TargetColumn {
            name: "cnt".to_string(),
            column_type: "ordinal".to_string(),
        };

        let result = DriftSuite::build("bad", &features(), &reference, Some(&target), 1000);
        assert!(matches!(result, Err(DriftError::TypeError(_))));
    }

    #[test]
    fn test_run_identical_distributions() {
        let reference = bike_data(100, 0.0);
        let actual = bike_data(100, 0.0);
        let model = model();

        let suite = DriftSuite::build(
            "all_features_drift_test",
            &features(),
            &reference,
            Some(&target()),
            DEFAULT_SIZE_THRESHOLD,
        )
        .unwrap();

        let result = suite
            .run(&actual, &reference, Some(&model), &DriftTestConfig::default())
            .unwrap();

        assert_eq!(result.outcomes.len(), 6);
        assert_eq!(result.passed_count(), 6);

        let (target_outcome, feature_outcomes) = result.split_target().unwrap();
        assert_eq!(target_outcome.kind, TestKind::PredictionKs);
        assert_eq!(target_outcome.metric(), 1.0);

        for outcome in feature_outcomes {
            match outcome.kind {
                // distances are zero
                TestKind::Psi => assert_eq!(outcome.metric(), 0.0),
                // p-values are one
                TestKind::Ks => assert_eq!(outcome.metric(), 1.0),
                other => panic!("unexpected test kind {other}"),
            }
        }

        let aggregate = dataset_drift(&result.outcomes, 0.5).unwrap();
        assert!(aggregate.passed);
        assert_eq!(aggregate.metric, 1.0);
    }

    #[test]
    fn test_run_shifted_numeric_features() {
        let reference = bike_data(100, 0.0);
        let actual = bike_data(100, 5.0);

        let suite = DriftSuite::build(
            "important_features_drift_test",
            &["temp".to_string(), "atemp".to_string(), "windspeed".to_string()],
            &reference,
            None,
            DEFAULT_SIZE_THRESHOLD,
        )
        .unwrap();

        let result = suite
            .run(&actual, &reference, None, &DriftTestConfig::default())
            .unwrap();

        assert_eq!(result.outcomes.len(), 3);
        assert_eq!(result.passed_count(), 0);
        assert!(result.outcomes.iter().all(|o| o.metric() < 0.05));
    }

    #[test]
    fn test_out_of_range_holiday() {
        let inject = |dataset: &Dataset| -> Dataset {
            let mut holiday = dataset.values_as_f64("holiday").unwrap().into_owned();
            holiday.iter_mut().take(40).for_each(|v| *v = 2.0);

            let columns = dataset
                .column_names()
                .iter()
                .map(|name| {
                    let column = if name == "holiday" {
                        Column::Numeric(holiday.clone())
                    } else {
                        dataset.column(name).unwrap().clone()
                    };
                    (name.clone(), column)
                })
                .collect();

            Dataset::new(columns, dataset.categorical_columns(), dataset.target()).unwrap()
        };

        let holiday = vec!["holiday".to_string()];

        // small reference keeps the PSI test, and it flags the unseen value
        let reference = bike_data(500, 0.0);
        let actual = inject(&bike_data(100, 0.0));
        let suite = DriftSuite::build("holiday", &holiday, &reference, None, 1000).unwrap();
        assert_eq!(suite.tests[0].kind, TestKind::Psi);

        let result = suite
            .run(&actual, &reference, None, &DriftTestConfig::default())
            .unwrap();
        assert!(!result.outcomes[0].passed());
        assert!(result.outcomes[0].metric() > 0.2);

        // crossing the size threshold switches to chi-square
        let reference = bike_data(1001, 0.0);
        let suite = DriftSuite::build("holiday", &holiday, &reference, None, 1000).unwrap();
        assert_eq!(suite.tests[0].kind, TestKind::ChiSquare);

        let result = suite
            .run(&actual, &reference, None, &DriftTestConfig::default())
            .unwrap();
        assert_eq!(result.outcomes[0].metric(), 0.0);
        assert!(!result.outcomes[0].passed());
    }

    #[test]
    fn test_prediction_test_requires_model() {
        let reference = bike_data(100, 0.0);
        let suite = DriftSuite::build(
            "all_features_drift_test",
            &features(),
            &reference,
            Some(&target()),
            DEFAULT_SIZE_THRESHOLD,
        )
        .unwrap();

        let result = suite.run(&reference, &reference, None, &DriftTestConfig::default());
        assert!(matches!(result, Err(DriftError::MissingModelError(c)) if c == "cnt"));
    }

    #[test]
    fn test_missing_column() {
        let reference = bike_data(100, 0.0);
        let suite =
            DriftSuite::build("missing", &["hum".to_string()], &reference, None, 1000).unwrap();

        let result = suite.run(&reference, &reference, None, &DriftTestConfig::default());
        assert!(matches!(result, Err(DriftError::DataFrameError(_))));
    }
}
