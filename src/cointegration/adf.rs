//! Augmented Dickey-Fuller test without deterministic terms
//!
//! Used on Engle-Granger residuals, which are mean-zero by construction.
//! The lag order is selected by AIC over a common estimation sample and
//! the chosen model is refit on the longest sample it allows.

use super::ols::{ols, OlsFit};

/// Result of an ADF regression
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdfResult {
    /// t-value of the lagged level
    pub statistic: f64,
    /// Number of lagged differences in the chosen model
    pub used_lag: usize,
    /// Observations in the final regression
    pub nobs: usize,
}

/// Default maximum lag: ceil(12·(n/100)^¼), capped at n/2 − 1
pub fn max_lag(nobs: usize) -> Option<usize> {
    let schwert = (12.0 * (nobs as f64 / 100.0).powf(0.25)).ceil() as usize;
    let cap = (nobs / 2).checked_sub(1)?;
    Some(schwert.min(cap))
}

/// Regress Δx[t] on x[t] and `lags` lagged differences, for t ≥ `trim`
fn fit_lag(x: &[f64], xdiff: &[f64], trim: usize, lags: usize) -> Option<OlsFit> {
    let rows = trim..xdiff.len();
    let y: Vec<f64> = xdiff[rows.clone()].to_vec();

    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(lags + 1);
    columns.push(x[rows.clone()].to_vec());
    for lag in 1..=lags {
        columns.push(rows.clone().map(|t| xdiff[t - lag]).collect());
    }

    let refs: Vec<&[f64]> = columns.iter().map(Vec::as_slice).collect();
    ols(&y, &refs)
}

/// Run the ADF test with AIC lag selection
///
/// Returns `None` when the series is too short or every candidate
/// regression is degenerate.
pub fn adf_test(x: &[f64]) -> Option<AdfResult> {
    let maxlag = max_lag(x.len())?;
    let xdiff: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();

    let mut best: Option<(f64, usize)> = None;
    for lags in 0..=maxlag {
        let Some(fit) = fit_lag(x, &xdiff, maxlag, lags) else {
            continue;
        };
        let aic = fit.aic();
        if aic.is_nan() {
            continue;
        }
        if best.map_or(true, |(best_aic, _)| aic < best_aic) {
            best = Some((aic, lags));
        }
    }

    let (_, used_lag) = best?;
    let fit = fit_lag(x, &xdiff, used_lag, used_lag)?;

    Some(AdfResult {
        statistic: fit.t_value(0),
        used_lag,
        nobs: fit.nobs(),
    })
}
