//! Rolling z-score of a spread

/// Trailing window used when no other is configured
pub const DEFAULT_ZSCORE_WINDOW: usize = 21;

/// Z-score of each observation against its trailing `window`
///
/// Uses the sample standard deviation. The first `window − 1` entries are
/// NaN, as is any entry whose window has zero deviation. Windows shorter
/// than two observations produce all NaN.
pub fn rolling_zscore(spread: &[f64], window: usize) -> Vec<f64> {
    let mut scores = vec![f64::NAN; spread.len()];
    if window < 2 || spread.len() < window {
        return scores;
    }

    for (end, score) in scores.iter_mut().enumerate().skip(window - 1) {
        let slice = &spread[end + 1 - window..=end];
        let mean = slice.iter().sum::<f64>() / window as f64;
        let variance =
            slice.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (window - 1) as f64;
        let std = variance.sqrt();
        if std > 0.0 {
            *score = (spread[end] - mean) / std;
        }
    }

    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zscore_warmup_is_nan() {
        let spread: Vec<f64> = (0..10).map(f64::from).collect();
        let scores = rolling_zscore(&spread, 4);
        assert_eq!(scores.len(), 10);
        assert!(scores[..3].iter().all(|s| s.is_nan()));
        assert!(scores[3..].iter().all(|s| s.is_finite()));
    }

    #[test]
    fn test_zscore_value() {
        // Window [1, 2, 3]: mean 2, sample std 1
        let scores = rolling_zscore(&[1.0, 2.0, 3.0], 3);
        assert!((scores[2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zscore_flat_window_is_nan() {
        let scores = rolling_zscore(&[5.0, 5.0, 5.0, 6.0], 3);
        assert!(scores[2].is_nan());
        assert!(scores[3].is_finite());
    }

    #[test]
    fn test_zscore_degenerate_window() {
        assert!(rolling_zscore(&[1.0, 2.0], 1).iter().all(|s| s.is_nan()));
        assert!(rolling_zscore(&[1.0, 2.0], DEFAULT_ZSCORE_WINDOW)
            .iter()
            .all(|s| s.is_nan()));
    }
}
