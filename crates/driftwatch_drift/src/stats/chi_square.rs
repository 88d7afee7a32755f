use crate::error::DriftError;
use crate::stats::categories::CategoryCounts;
use driftwatch_types::TestResult;
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Chi-square statistic of the actual counts against the reference counts
/// rescaled to the actual sample size. A category absent from the reference
/// but present in the actual sample makes the statistic infinite.
pub fn chi_square_statistic(counts: &CategoryCounts) -> f64 {
    let n_ref: usize = counts.reference.iter().sum();
    let n_act: usize = counts.actual.iter().sum();
    if n_ref == 0 {
        return f64::INFINITY;
    }
    let k_norm = n_act as f64 / n_ref as f64;

    counts
        .reference
        .iter()
        .zip(&counts.actual)
        .map(|(&r, &a)| {
            let expected = k_norm * r as f64;
            if expected > 0.0 {
                (a as f64 - expected).powi(2) / expected
            } else if a > 0 {
                f64::INFINITY
            } else {
                0.0
            }
        })
        .sum()
}

/// Upper tail probability of the chi-square distribution
pub fn chi_square_p_value(statistic: f64, degrees_of_freedom: usize) -> Result<f64, DriftError> {
    if statistic.is_infinite() {
        return Ok(0.0);
    }

    if degrees_of_freedom == 0 {
        return Ok(if statistic > 0.0 { 0.0 } else { 1.0 });
    }

    let distribution = ChiSquared::new(degrees_of_freedom as f64)
        .map_err(|e| DriftError::StatisticError(e.to_string()))?;

    Ok(distribution.sf(statistic))
}

/// Chi-square goodness-of-fit test over two categorical samples.
///
/// Passes when the p-value is at least `threshold`.
pub fn chi_square_test(
    reference: &[String],
    actual: &[String],
    threshold: f64,
    max_categories: usize,
) -> Result<TestResult, DriftError> {
    if reference.is_empty() || actual.is_empty() {
        return Err(DriftError::EmptySampleError("chi_square".to_string()));
    }

    let counts = CategoryCounts::new(reference, actual, max_categories);
    let statistic = chi_square_statistic(&counts);
    let p_value = chi_square_p_value(statistic, counts.len().saturating_sub(1))?;

    Ok(TestResult {
        passed: p_value >= threshold,
        metric: p_value,
        statistic,
        p_value: Some(p_value),
    })
}
