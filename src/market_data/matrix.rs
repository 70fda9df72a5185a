//! Timestamp-aligned close-price matrix

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

/// Close prices fetched for one instrument
#[derive(Debug, Clone, Default)]
pub struct InstrumentSeries {
    pub market: String,
    /// (timestamp, close) pairs in any order
    pub closes: Vec<(DateTime<Utc>, f64)>,
}

/// Rectangular price table: timestamp rows × instrument columns
///
/// Every cell is populated. Instruments missing any timestamp present in
/// another instrument's history are dropped entirely during alignment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceMatrix {
    timestamps: Vec<DateTime<Utc>>,
    markets: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl PriceMatrix {
    /// Outer-join the series on timestamp, then drop every incomplete column
    ///
    /// Column order follows input order. Duplicate timestamps within one
    /// series keep the last value.
    pub fn align(series: Vec<InstrumentSeries>) -> Self {
        let indexed: Vec<(String, BTreeMap<DateTime<Utc>, f64>)> = series
            .into_iter()
            .map(|s| (s.market, s.closes.into_iter().collect()))
            .collect();

        let timestamps: BTreeSet<DateTime<Utc>> = indexed
            .iter()
            .flat_map(|(_, closes)| closes.keys().copied())
            .collect();

        let mut markets = Vec::new();
        let mut columns = Vec::new();

        for (market, closes) in indexed {
            // Keys are a subset of the union, so equal length means full coverage
            if closes.len() == timestamps.len() {
                markets.push(market);
                columns.push(closes.into_values().collect());
            } else {
                tracing::debug!(
                    market = %market,
                    missing = timestamps.len() - closes.len(),
                    "Dropping instrument with incomplete history"
                );
            }
        }

        Self {
            timestamps: timestamps.into_iter().collect(),
            markets,
            columns,
        }
    }

    /// Row timestamps, ascending
    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    /// Column instrument identifiers, in column order
    pub fn markets(&self) -> &[String] {
        &self.markets
    }

    /// Close prices for one instrument
    pub fn column(&self, market: &str) -> Option<&[f64]> {
        self.markets
            .iter()
            .position(|m| m == market)
            .map(|idx| self.columns[idx].as_slice())
    }

    /// Close prices by column index
    pub fn column_at(&self, index: usize) -> Option<&[f64]> {
        self.columns.get(index).map(Vec::as_slice)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Number of instrument columns
    pub fn width(&self) -> usize {
        self.markets.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn ts(hour: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap() + Duration::hours(hour)
    }

    fn series(market: &str, hours: &[i64]) -> InstrumentSeries {
        InstrumentSeries {
            market: market.to_string(),
            closes: hours.iter().map(|&h| (ts(h), 100.0 + h as f64)).collect(),
        }
    }

    #[test]
    fn test_align_full_coverage() {
        let matrix = PriceMatrix::align(vec![
            series("A", &[0, 1, 2]),
            series("B", &[2, 0, 1]),
        ]);

        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix.markets(), &["A".to_string(), "B".to_string()]);
        assert_eq!(matrix.column("B").unwrap(), &[100.0, 101.0, 102.0]);
        assert_eq!(matrix.timestamps(), &[ts(0), ts(1), ts(2)]);
    }

    #[test]
    fn test_align_drops_column_with_single_gap() {
        let matrix = PriceMatrix::align(vec![
            series("A", &[0, 1, 2, 3]),
            series("B", &[0, 1, 3]),
            series("C", &[0, 1, 2, 3]),
        ]);

        assert_eq!(matrix.markets(), &["A".to_string(), "C".to_string()]);
        assert!(matrix.column("B").is_none());
        assert_eq!(matrix.len(), 4);
        for idx in 0..matrix.width() {
            assert_eq!(matrix.column_at(idx).unwrap().len(), matrix.len());
        }
    }

    #[test]
    fn test_align_is_conservative_across_instruments() {
        // Each instrument has a timestamp the other lacks; both are dropped
        let matrix = PriceMatrix::align(vec![series("A", &[0, 1]), series("B", &[1, 2])]);
        assert_eq!(matrix.width(), 0);
        assert_eq!(matrix.len(), 3);
    }

    #[test]
    fn test_align_empty_series_dropped() {
        let matrix = PriceMatrix::align(vec![series("A", &[0, 1]), series("B", &[])]);
        assert_eq!(matrix.markets(), &["A".to_string()]);
    }

    #[test]
    fn test_align_duplicate_timestamp_last_wins() {
        let mut a = series("A", &[0, 1]);
        a.closes.push((ts(1), 999.0));
        let matrix = PriceMatrix::align(vec![a]);
        assert_eq!(matrix.column("A").unwrap(), &[100.0, 999.0]);
    }

    #[test]
    fn test_align_no_input() {
        let matrix = PriceMatrix::align(vec![]);
        assert!(matrix.is_empty());
        assert_eq!(matrix.width(), 0);
    }
}
