//! Mean-reversion half-life of a spread

use super::ols::ols;

/// Estimate the half-life of `spread`, in bars
///
/// Regresses the one-step change on the lagged level with an intercept.
/// The first lag and the first change duplicate their neighbours so the
/// regression covers every observation. A non-negative slope produces a
/// non-positive half-life; `None` is returned only when the regression
/// is degenerate or the result is not finite.
pub fn half_life(spread: &[f64]) -> Option<i64> {
    if spread.len() < 3 {
        return None;
    }

    let mut lagged = Vec::with_capacity(spread.len());
    lagged.push(spread[0]);
    lagged.extend_from_slice(&spread[..spread.len() - 1]);

    let mut change: Vec<f64> = spread.iter().zip(&lagged).map(|(s, l)| s - l).collect();
    change[0] = change[1];

    let ones = vec![1.0; spread.len()];
    let fit = ols(&change, &[&ones, &lagged])?;
    let beta = fit.params[1];

    let value = (-std::f64::consts::LN_2 / beta).round_ties_even();
    value.is_finite().then_some(value as i64)
}
