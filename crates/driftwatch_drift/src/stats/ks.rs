use crate::error::DriftError;
use driftwatch_types::TestResult;
use ndarray::ArrayView1;

fn sorted(values: &ArrayView1<f64>) -> Vec<f64> {
    let mut values = values.to_vec();
    values.sort_by(f64::total_cmp);
    values
}

/// Largest distance between the empirical CDFs of two samples.
pub fn ks_statistic(reference: &[f64], actual: &[f64]) -> f64 {
    let n1 = reference.len() as f64;
    let n2 = actual.len() as f64;

    let mut i = 0;
    let mut j = 0;
    let mut d_max: f64 = 0.0;

    while i < reference.len() && j < actual.len() {
        let x = reference[i].min(actual[j]);

        // step over ties on both sides before comparing the CDFs
        while i < reference.len() && reference[i] <= x {
            i += 1;
        }
        while j < actual.len() && actual[j] <= x {
            j += 1;
        }

        d_max = d_max.max((i as f64 / n1 - j as f64 / n2).abs());
    }

    d_max
}

/// Survival function of the Kolmogorov distribution, Q(lambda).
pub fn kolmogorov_survival(lambda: f64) -> f64 {
    if lambda < 1e-3 {
        return 1.0;
    }

    let mut sum = 0.0;
    let mut sign = 1.0;
    let mut previous_term: f64 = 0.0;

    for k in 1..=100 {
        let k = k as f64;
        let term = sign * 2.0 * (-2.0 * k * k * lambda * lambda).exp();
        sum += term;

        if term.abs() <= 1e-10 * previous_term.abs() || term.abs() <= 1e-16 * sum.abs() {
            return sum.clamp(0.0, 1.0);
        }

        sign = -sign;
        previous_term = term;
    }

    // series failed to converge, which only happens for tiny lambda
    1.0
}

/// Largest sample size for which the exact p-value is computed
pub const MAX_EXACT_SAMPLE_SIZE: usize = 10_000;

fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Exact two-sided p-value of the two-sample statistic `d`.
///
/// Counts the share of lattice paths from `(0, 0)` to `(n1, n2)` that stay
/// strictly inside `|i / n1 - j / n2| < d`. The counts are kept normalised by
/// the binomial path count so they never overflow.
pub fn ks_exact_p_value(n1: usize, n2: usize, d: f64) -> f64 {
    let g = gcd(n1, n2);
    let lcm = (n1 / g) * n2;

    // d is a multiple of 1 / lcm, rounding removes float noise
    let h = (d * lcm as f64).round() as i64;
    if h <= 0 {
        return 1.0;
    }
    let bound = h * g as i64;

    let mut inside = vec![0.0; n2 + 1];
    for i in 0..=n1 {
        for j in 0..=n2 {
            let offset = (i * n2) as i64 - (j * n1) as i64;

            inside[j] = if offset.abs() >= bound {
                0.0
            } else if i == 0 && j == 0 {
                1.0
            } else {
                // inside[j] still holds column i - 1, inside[j - 1] is column i
                let from_left = if i > 0 { inside[j] * i as f64 } else { 0.0 };
                let from_below = if j > 0 { inside[j - 1] * j as f64 } else { 0.0 };
                (from_left + from_below) / (i + j) as f64
            };
        }
    }

    (1.0 - inside[n2]).clamp(0.0, 1.0)
}

/// Two-sample Kolmogorov-Smirnov test.
///
/// The p-value is exact when neither sample exceeds
/// [`MAX_EXACT_SAMPLE_SIZE`], otherwise it uses the asymptotic Kolmogorov
/// distribution with the effective sample size correction
/// `(en + 0.12 + 0.11 / en) * d`.
/// The test passes when the p-value is at least `threshold`.
pub fn ks_test(
    reference: &ArrayView1<f64>,
    actual: &ArrayView1<f64>,
    threshold: f64,
) -> Result<TestResult, DriftError> {
    if reference.is_empty() || actual.is_empty() {
        return Err(DriftError::EmptySampleError("ks".to_string()));
    }

    let reference = sorted(reference);
    let actual = sorted(actual);

    let d = ks_statistic(&reference, &actual);

    let p_value = if reference.len().max(actual.len()) <= MAX_EXACT_SAMPLE_SIZE {
        ks_exact_p_value(reference.len(), actual.len(), d)
    } else {
        let n1 = reference.len() as f64;
        let n2 = actual.len() as f64;
        let en = (n1 * n2 / (n1 + n2)).sqrt();
        kolmogorov_survival((en + 0.12 + 0.11 / en) * d)
    };

    Ok(TestResult {
        passed: p_value >= threshold,
        metric: p_value,
        statistic: d,
        p_value: Some(p_value),
    })
}
