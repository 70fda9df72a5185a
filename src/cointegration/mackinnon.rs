//! MacKinnon response surfaces for the two-variable Engle-Granger test
//!
//! p-values follow MacKinnon (1994) asymptotic approximations; critical
//! values follow the MacKinnon (2010) finite-sample response surface.
//! Both tables are for N = 2 series with a constant term.

use statrs::distribution::{ContinuousCDF, Normal};

/// Statistics above this map to p = 1
const TAU_MAX: f64 = 0.92;
/// Statistics below this map to p = 0
const TAU_MIN: f64 = -18.86;
/// Switch point between the small-p and large-p polynomials
const TAU_STAR: f64 = -2.62;

const TAU_SMALLP: [f64; 3] = [2.92, 1.5012, 0.039796];
const TAU_LARGEP: [f64; 4] = [2.1945, 0.64695, -0.29198, -0.042377];

const CRIT_1PCT: [f64; 4] = [-3.89644, -10.9519, -33.527, 0.0];
const CRIT_5PCT: [f64; 4] = [-3.33613, -6.1101, -6.823, 0.0];
const CRIT_10PCT: [f64; 4] = [-3.04445, -4.2412, -2.720, 0.0];

/// Test critical values at the usual significance levels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalValues {
    pub one_percent: f64,
    pub five_percent: f64,
    pub ten_percent: f64,
}

/// Evaluate c0 + c1·x + c2·x² + …
fn polyval(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Approximate p-value of an Engle-Granger test statistic
///
/// NaN in, NaN out.
pub fn coint_p_value(statistic: f64) -> f64 {
    if statistic.is_nan() {
        return f64::NAN;
    }
    if statistic > TAU_MAX {
        return 1.0;
    }
    if statistic < TAU_MIN {
        return 0.0;
    }

    let coefficients: &[f64] = if statistic <= TAU_STAR {
        &TAU_SMALLP
    } else {
        &TAU_LARGEP
    };

    Normal::new(0.0, 1.0)
        .map(|normal| normal.cdf(polyval(coefficients, statistic)))
        .unwrap_or(f64::NAN)
}

/// Finite-sample critical values for `nobs` observations
pub fn coint_critical_values(nobs: usize) -> CriticalValues {
    let inv = 1.0 / nobs as f64;
    CriticalValues {
        one_percent: polyval(&CRIT_1PCT, inv),
        five_percent: polyval(&CRIT_5PCT, inv),
        ten_percent: polyval(&CRIT_10PCT, inv),
    }
}
