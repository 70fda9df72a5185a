//! Cointegration engine
//!
//! Engle-Granger two-step test on a pair of aligned price series, plus the
//! hedge ratio and half-life of the resulting spread. Statistical
//! degeneracy never raises: it surfaces as NaN statistics and a rejected
//! result.

mod adf;
mod error;
mod half_life;
mod mackinnon;
mod ols;
mod zscore;

pub use adf::{adf_test, AdfResult};
pub use error::CointegrationError;
pub use half_life::half_life;
pub use mackinnon::{coint_critical_values, coint_p_value, CriticalValues};
pub use ols::{ols, OlsFit};
pub use zscore::{rolling_zscore, DEFAULT_ZSCORE_WINDOW};

/// Shortest series the engine will test
pub const MIN_OBSERVATIONS: usize = 3;

/// Significance level applied to the p-value
pub const ACCEPT_P_VALUE: f64 = 0.05;

/// R² above this means the pair is colinear and the statistic is −∞
fn colinearity_threshold() -> f64 {
    1.0 - 100.0 * f64::EPSILON.sqrt()
}

/// Outcome of testing one pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CointegrationResult {
    pub test_statistic: f64,
    pub p_value: f64,
    pub critical_values: CriticalValues,
    /// Slope of series1 on series2 without intercept
    pub hedge_ratio: f64,
    /// Spread half-life in bars, if the regression is well defined
    pub half_life: Option<i64>,
    /// Passed the 5% Engle-Granger test
    pub accepted: bool,
}

impl CointegrationResult {
    pub fn critical_value_5pct(&self) -> f64 {
        self.critical_values.five_percent
    }
}

/// Output of the Engle-Granger test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngleGranger {
    pub statistic: f64,
    pub p_value: f64,
    pub critical_values: CriticalValues,
}

/// Engle-Granger cointegration test of `y0` on `y1`
///
/// The first stage regresses `y0` on `y1` with a constant; the second runs
/// an ADF test on the residuals.
pub fn engle_granger(y0: &[f64], y1: &[f64]) -> EngleGranger {
    let statistic = engle_granger_statistic(y0, y1);
    EngleGranger {
        statistic,
        p_value: coint_p_value(statistic),
        critical_values: coint_critical_values(y0.len().saturating_sub(1)),
    }
}

fn engle_granger_statistic(y0: &[f64], y1: &[f64]) -> f64 {
    let ones = vec![1.0; y0.len()];
    let Some(fit) = ols(y0, &[y1, &ones]) else {
        return f64::NAN;
    };

    let mean = y0.iter().sum::<f64>() / y0.len() as f64;
    let tss: f64 = y0.iter().map(|v| (v - mean).powi(2)).sum();
    let r_squared = 1.0 - fit.ssr / tss;

    if !r_squared.is_finite() {
        return f64::NAN;
    }
    if r_squared >= colinearity_threshold() {
        return f64::NEG_INFINITY;
    }

    adf_test(&fit.residuals).map_or(f64::NAN, |adf| adf.statistic)
}

/// Least-squares slope of `y` on `x` through the origin
pub fn hedge_ratio(y: &[f64], x: &[f64]) -> f64 {
    let sxx: f64 = x.iter().map(|v| v * v).sum();
    if sxx == 0.0 {
        return f64::NAN;
    }
    let sxy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    sxy / sxx
}

/// Acceptance rule; any NaN input rejects
pub fn is_cointegrated(statistic: f64, p_value: f64, critical_value: f64) -> bool {
    statistic < critical_value && p_value < ACCEPT_P_VALUE
}

/// Test a pair of aligned series
pub fn calculate_cointegration(
    series1: &[f64],
    series2: &[f64],
) -> Result<CointegrationResult, CointegrationError> {
    if series1.len() != series2.len() {
        return Err(CointegrationError::LengthMismatch {
            left: series1.len(),
            right: series2.len(),
        });
    }
    if series1.len() < MIN_OBSERVATIONS {
        return Err(CointegrationError::InsufficientData {
            required: MIN_OBSERVATIONS,
            actual: series1.len(),
        });
    }

    let test = engle_granger(series1, series2);
    let hedge_ratio = hedge_ratio(series1, series2);
    let spread: Vec<f64> = series1
        .iter()
        .zip(series2)
        .map(|(a, b)| a - hedge_ratio * b)
        .collect();
    let half_life = if hedge_ratio.is_finite() {
        half_life(&spread)
    } else {
        None
    };

    Ok(CointegrationResult {
        test_statistic: test.statistic,
        p_value: test.p_value,
        critical_values: test.critical_values,
        hedge_ratio,
        half_life,
        accepted: is_cointegrated(test.statistic, test.p_value, test.critical_values.five_percent),
    })
}
