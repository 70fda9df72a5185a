//! Integration tests for the flattening pipeline

use chrono::{TimeZone, Utc};
use perp_statarb::config::Config;
use perp_statarb::exchange::{
    ContractType, ExchangeCall, MarketInfo, MarketStatus, OrderSide, PaperExchange, Position,
    PositionSide, PositionStatus,
};
use perp_statarb::pipeline;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::TempDir;

fn market(name: &str, tick: Decimal) -> MarketInfo {
    MarketInfo {
        market: name.to_string(),
        status: MarketStatus::Online,
        contract_type: ContractType::Perpetual,
        tick_size: tick,
    }
}

fn config(dir: &TempDir) -> Config {
    let mut config = Config::example().unwrap();
    config.flatten.api_delay_ms = 0;
    config.flatten.order_delay_ms = 0;
    config.flatten.pending_state_path = dir.path().join("bot_agents.json");
    config
}

#[tokio::test]
async fn test_flatten_call_sequence() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let exchange = PaperExchange::new(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        .with_market(market("BTC-USD", dec!(1)))
        .with_market(market("ETH-USD", dec!(0.1)))
        .with_position(Position {
            market: "BTC-USD".to_string(),
            side: PositionSide::Long,
            size: dec!(0.25),
            entry_price: dec!(62000),
        })
        .with_position(Position {
            market: "ETH-USD".to_string(),
            side: PositionSide::Short,
            size: dec!(3),
            entry_price: dec!(3100),
        });

    let placed = pipeline::flatten(&exchange, &config).await.unwrap();
    assert_eq!(placed.len(), 2);
    assert_eq!(placed[0].side, OrderSide::Sell);
    assert_eq!(placed[1].side, OrderSide::Buy);
    assert_eq!(placed[1].price, dec!(5270));

    assert_eq!(
        exchange.calls().await,
        vec![
            ExchangeCall::CancelAllOrders,
            ExchangeCall::GetMarkets,
            ExchangeCall::GetPositions(PositionStatus::Open),
            ExchangeCall::GetPositionId,
            ExchangeCall::GetServerTime,
            ExchangeCall::CreateOrder("BTC-USD".to_string()),
            ExchangeCall::GetPositionId,
            ExchangeCall::GetServerTime,
            ExchangeCall::CreateOrder("ETH-USD".to_string()),
        ]
    );
    assert_eq!(
        std::fs::read_to_string(&config.flatten.pending_state_path).unwrap(),
        "[]"
    );
}

#[tokio::test]
async fn test_flatten_zero_positions() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let exchange = PaperExchange::new(Utc::now()).with_market(market("BTC-USD", dec!(1)));

    let placed = pipeline::flatten(&exchange, &config).await.unwrap();
    assert!(placed.is_empty());
    assert!(exchange.orders().await.is_empty());
}

#[tokio::test]
async fn test_flatten_rejection_stops_pass() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    std::fs::write(&config.flatten.pending_state_path, r#"[{"id":1}]"#).unwrap();

    let position = |name: &str| Position {
        market: name.to_string(),
        side: PositionSide::Long,
        size: dec!(1),
        entry_price: dec!(10),
    };
    let exchange = PaperExchange::new(Utc::now())
        .with_market(market("A-USD", dec!(0.01)))
        .with_market(market("B-USD", dec!(0.01)))
        .with_market(market("C-USD", dec!(0.01)))
        .with_position(position("A-USD"))
        .with_position(position("B-USD"))
        .with_position(position("C-USD"))
        .reject_orders_after(1);

    let err = pipeline::flatten(&exchange, &config).await.unwrap_err();
    assert_eq!(err.operation, "abort all positions");

    let calls = exchange.calls().await;
    assert!(!calls.contains(&ExchangeCall::CreateOrder("C-USD".to_string())));
    assert_eq!(exchange.orders().await.len(), 1);
    assert_eq!(
        std::fs::read_to_string(&config.flatten.pending_state_path).unwrap(),
        r#"[{"id":1}]"#
    );
}
