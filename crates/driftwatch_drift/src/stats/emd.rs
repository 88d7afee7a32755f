use crate::error::DriftError;
use driftwatch_types::TestResult;
use ndarray::ArrayView1;

/// First Wasserstein distance between two empirical distributions,
/// the area between their CDFs.
pub fn wasserstein_distance(reference: &[f64], actual: &[f64]) -> f64 {
    let mut reference = reference.to_vec();
    let mut actual = actual.to_vec();
    reference.sort_by(f64::total_cmp);
    actual.sort_by(f64::total_cmp);

    let mut support: Vec<f64> = reference.iter().chain(actual.iter()).copied().collect();
    support.sort_by(f64::total_cmp);

    let n_ref = reference.len() as f64;
    let n_act = actual.len() as f64;

    support
        .windows(2)
        .filter(|w| w[1] > w[0])
        .map(|w| {
            let x = w[0];
            let cdf_ref = reference.partition_point(|&v| v <= x) as f64 / n_ref;
            let cdf_act = actual.partition_point(|&v| v <= x) as f64 / n_act;
            (cdf_ref - cdf_act).abs() * (w[1] - w[0])
        })
        .sum()
}

/// Earth-Mover's distance test.
///
/// Both samples are min-max scaled over the union of their values so the
/// distance lies in `[0, 1]`. The test passes when the distance is at most
/// `threshold`.
pub fn earth_movers_distance_test(
    reference: &ArrayView1<f64>,
    actual: &ArrayView1<f64>,
    threshold: f64,
) -> Result<TestResult, DriftError> {
    if reference.is_empty() || actual.is_empty() {
        return Err(DriftError::EmptySampleError(
            "earth_movers_distance".to_string(),
        ));
    }

    let (min, max) = reference
        .iter()
        .chain(actual.iter())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    let distance = if max == min {
        0.0
    } else {
        let range = max - min;
        let scale = |values: &ArrayView1<f64>| -> Vec<f64> {
            values.iter().map(|v| (v - min) / range).collect()
        };
        wasserstein_distance(&scale(reference), &scale(actual))
    };

    Ok(TestResult {
        passed: distance <= threshold,
        metric: distance,
        statistic: distance,
        p_value: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array1};

    #[test]
    fn test_wasserstein_distance() {
        assert_relative_eq!(wasserstein_distance(&[0.0, 1.0, 3.0], &[5.0, 6.0, 8.0]), 5.0);
        assert_relative_eq!(wasserstein_distance(&[0.0, 1.0], &[0.0, 1.0]), 0.0);
        // unequal sizes: |F_ref - F_act| = 0.5 on [0, 1)
        assert_relative_eq!(wasserstein_distance(&[0.0, 1.0], &[1.0]), 0.5);
    }

    #[test]
    fn test_identical_samples() {
        let values = Array1::linspace(0.0, 10.0, 100);
        let result = earth_movers_distance_test(&values.view(), &values.view(), 0.2).unwrap();

        assert_eq!(result.metric, 0.0);
        assert!(result.passed);
    }

    #[test]
    fn test_normalised_distance() {
        // union spans [0, 10]; shifting by 5 moves all mass by 0.5
        let reference = array![0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let actual = array![5.0, 6.0, 7.0, 8.0, 9.0, 10.0];

        let result = earth_movers_distance_test(&reference.view(), &actual.view(), 0.2).unwrap();

        assert_relative_eq!(result.metric, 0.5, epsilon = 1e-12);
        assert!(!result.passed);
        assert!(result.p_value.is_none());
    }

    #[test]
    fn test_constant_samples() {
        let values = array![3.0, 3.0, 3.0];
        let result = earth_movers_distance_test(&values.view(), &values.view(), 0.2).unwrap();

        assert_eq!(result.metric, 0.0);
        assert!(result.passed);
    }
}
