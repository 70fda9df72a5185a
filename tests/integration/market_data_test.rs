//! Integration tests for price collection

use chrono::{Duration, TimeZone, Utc};
use perp_statarb::config::MarketDataConfig;
use perp_statarb::exchange::{Candle, ContractType, MarketInfo, MarketStatus, PaperExchange};
use perp_statarb::market_data::{MarketDataAggregator, Resolution};
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_matrix_keeps_only_complete_instruments() {
    let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
    let candles = |skip: Option<i64>| -> Vec<Candle> {
        (1..=20)
            .filter(|h| Some(*h) != skip)
            .map(|h| Candle {
                started_at: now - Duration::hours(h),
                close: 100.0 + h as f64,
            })
            .collect()
    };
    let market = |name: &str| MarketInfo {
        market: name.to_string(),
        status: MarketStatus::Online,
        contract_type: ContractType::Perpetual,
        tick_size: dec!(0.1),
    };

    let exchange = PaperExchange::new(now)
        .with_market(market("A-USD"))
        .with_market(market("B-USD"))
        .with_market(market("C-USD"))
        .with_candles("A-USD", candles(None))
        .with_candles("B-USD", candles(Some(7)))
        .with_candles("C-USD", candles(None));

    let config = MarketDataConfig {
        resolution: Resolution::OneHour,
        candle_limit: 10,
        window_count: 2,
        request_delay_ms: 0,
        ..MarketDataConfig::default()
    };

    let matrix = MarketDataAggregator::new(&exchange, &config)
        .build_price_matrix(now)
        .await
        .unwrap();

    assert_eq!(matrix.markets(), ["A-USD".to_string(), "C-USD".to_string()]);
    assert_eq!(matrix.len(), 20);
    assert!(matrix.timestamps().windows(2).all(|w| w[0] < w[1]));
    assert_eq!(matrix.column("A-USD").unwrap()[0], 120.0);
    assert!(matrix.column("B-USD").is_none());
}
