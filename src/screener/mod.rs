//! Pair screener
//!
//! Enumerates every unordered instrument pair of a [`PriceMatrix`], tests
//! each with the cointegration engine and keeps the pairs that pass both
//! the statistical test and the half-life window.

mod store;

pub use store::{AcceptedPairStore, StoreError};

use crate::cointegration::calculate_cointegration;
use crate::market_data::PriceMatrix;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Two instruments tested together; `base` precedes `quote` in column order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairCandidate {
    pub base: String,
    pub quote: String,
}

/// Pair that passed screening; field order is the CSV column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptedPair {
    pub base_market: String,
    pub quote_market: String,
    pub hedge_ratio: f64,
    pub half_life: i64,
}

/// Summary of one screening run
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenReport {
    pub instruments_screened: usize,
    pub pairs_tested: usize,
    pub pairs_accepted: usize,
    pub output_path: PathBuf,
}

/// All 2-combinations of `markets` in generation order
pub fn enumerate_pairs(markets: &[String]) -> Vec<PairCandidate> {
    markets
        .iter()
        .enumerate()
        .flat_map(|(i, base)| {
            markets[i + 1..].iter().map(move |quote| PairCandidate {
                base: base.clone(),
                quote: quote.clone(),
            })
        })
        .collect()
}

/// Half-life acceptance window
pub fn half_life_in_range(half_life: i64, max_half_life: i64) -> bool {
    half_life > 0 && half_life <= max_half_life
}

/// Test every pair in `matrix` and return the accepted ones in order
pub fn screen_pairs(matrix: &PriceMatrix, max_half_life: i64) -> Vec<AcceptedPair> {
    let candidates = enumerate_pairs(matrix.markets());
    let mut accepted = Vec::new();

    for candidate in &candidates {
        let (Some(series1), Some(series2)) =
            (matrix.column(&candidate.base), matrix.column(&candidate.quote))
        else {
            continue;
        };

        let result = match calculate_cointegration(series1, series2) {
            Ok(result) => result,
            Err(e) => {
                warn!(base = %candidate.base, quote = %candidate.quote, error = %e, "Skipping pair");
                continue;
            }
        };

        debug!(
            base = %candidate.base,
            quote = %candidate.quote,
            statistic = result.test_statistic,
            p_value = result.p_value,
            hedge_ratio = result.hedge_ratio,
            half_life = ?result.half_life,
            "Tested pair"
        );

        if !result.accepted {
            continue;
        }
        let Some(half_life) = result
            .half_life
            .filter(|hl| half_life_in_range(*hl, max_half_life))
        else {
            continue;
        };

        info!(
            base = %candidate.base,
            quote = %candidate.quote,
            hedge_ratio = result.hedge_ratio,
            half_life,
            "Cointegrated pair found"
        );
        accepted.push(AcceptedPair {
            base_market: candidate.base.clone(),
            quote_market: candidate.quote.clone(),
            hedge_ratio: result.hedge_ratio,
            half_life,
        });
    }

    accepted
}
