use crate::error::DriftError;
use crate::stats::categories::CategoryCounts;
use driftwatch_types::TestResult;

/// Floor applied to empty bucket proportions so the log term stays finite
pub const MIN_PROPORTION: f64 = 0.0001;

/// Population stability index over `(reference, actual)` proportion pairs
pub fn compute_psi(proportions: &[(f64, f64)]) -> f64 {
    proportions
        .iter()
        .map(|(reference, actual)| (reference - actual) * (reference / actual).ln())
        .sum()
}

/// PSI test over two categorical samples.
///
/// Passes when the total PSI is at most `threshold`.
pub fn psi_test(
    reference: &[String],
    actual: &[String],
    threshold: f64,
    max_categories: usize,
) -> Result<TestResult, DriftError> {
    if reference.is_empty() || actual.is_empty() {
        return Err(DriftError::EmptySampleError("psi".to_string()));
    }

    let counts = CategoryCounts::new(reference, actual, max_categories);
    let n_ref = reference.len() as f64;
    let n_act = actual.len() as f64;

    let proportions: Vec<(f64, f64)> = counts
        .reference
        .iter()
        .zip(&counts.actual)
        .map(|(&r, &a)| {
            (
                (r as f64 / n_ref).max(MIN_PROPORTION),
                (a as f64 / n_act).max(MIN_PROPORTION),
            )
        })
        .collect();

    let psi = compute_psi(&proportions);

    Ok(TestResult {
        passed: psi <= threshold,
        metric: psi,
        statistic: psi,
        p_value: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_compute_psi_basic() {
        let proportions = vec![(0.3, 0.2), (0.4, 0.4), (0.3, 0.4)];

        let expected = (0.3 - 0.2) * (0.3f64 / 0.2).ln()
            + (0.4 - 0.4) * (0.4f64 / 0.4).ln()
            + (0.3 - 0.4) * (0.3f64 / 0.4).ln();

        assert_relative_eq!(compute_psi(&proportions), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_identical_samples() {
        let values = labels(&["0", "0", "1", "0", "1"]);
        let result = psi_test(&values, &values, 0.2, 20).unwrap();

        assert_eq!(result.metric, 0.0);
        assert!(result.passed);
    }

    #[test]
    fn test_unseen_category() {
        let reference = labels(&["0"; 10]);
        let mut actual = labels(&["0"; 5]);
        actual.extend(labels(&["2"; 5]));

        let result = psi_test(&reference, &actual, 0.2, 20).unwrap();

        // ("0": 1.0 vs 0.5) + ("2": 0.0001 vs 0.5)
        let expected = (1.0 - 0.5) * (1.0f64 / 0.5).ln() + (0.0001 - 0.5) * (0.0001f64 / 0.5).ln();
        assert_relative_eq!(result.metric, expected, epsilon = 1e-12);
        assert!(!result.passed);
    }
}
