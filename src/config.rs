//! Configuration types for perp-statarb

use crate::market_data::Resolution;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub exchange: ExchangeConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub market_data: MarketDataConfig,
    #[serde(default)]
    pub screening: ScreeningConfig,
    #[serde(default)]
    pub flatten: FlattenConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Exchange connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Account queried for the position id used when signing orders
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing)]
    pub api_passphrase: Option<String>,
}

impl ExchangeConfig {
    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Feature toggles selecting which pipelines `run` executes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Run the cointegration screening pipeline
    #[serde(default = "default_true")]
    pub find_cointegrated: bool,
    /// Run the position flattening pipeline
    #[serde(default)]
    pub abort_all_positions: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            find_cointegrated: true,
            abort_all_positions: false,
        }
    }
}

/// Largest accepted `candle_limit`
pub const MAX_CANDLE_LIMIT: u32 = 1_000;
/// Largest accepted `window_count`
pub const MAX_WINDOW_COUNT: u32 = 1_000;

/// Historical price collection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketDataConfig {
    /// Candle resolution
    #[serde(default)]
    pub resolution: Resolution,

    /// Maximum candles returned per request
    #[serde(default = "default_candle_limit")]
    pub candle_limit: u32,

    /// Number of request windows making up the lookback
    #[serde(default = "default_window_count")]
    pub window_count: u32,

    /// Pause between candle requests (milliseconds)
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Cap the instrument universe for fast iteration
    #[serde(default)]
    pub test_mode: bool,

    /// Instrument cap applied in test mode
    #[serde(default = "default_test_mode_market_count")]
    pub test_mode_market_count: usize,
}

impl MarketDataConfig {
    /// Instrument cap in effect, if any
    pub fn market_cap(&self) -> Option<usize> {
        self.test_mode.then_some(self.test_mode_market_count)
    }
}

impl Default for MarketDataConfig {
    fn default() -> Self {
        Self {
            resolution: Resolution::default(),
            candle_limit: default_candle_limit(),
            window_count: default_window_count(),
            request_delay_ms: default_request_delay_ms(),
            test_mode: false,
            test_mode_market_count: default_test_mode_market_count(),
        }
    }
}

/// Pair screening configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningConfig {
    /// Longest acceptable half-life, in bars
    #[serde(default = "default_max_half_life")]
    pub max_half_life: i64,

    /// Accepted-pairs output file
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            max_half_life: default_max_half_life(),
            output_path: default_output_path(),
        }
    }
}

/// Position flattening configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlattenConfig {
    /// Order expiration offset from exchange server time (seconds)
    #[serde(default = "default_expiration_offset_secs")]
    pub expiration_offset_secs: i64,

    /// Maximum fee rate accepted on close orders
    #[serde(default = "default_limit_fee")]
    pub limit_fee: Decimal,

    /// Entry price multiplier when closing by buying
    #[serde(default = "default_buy_price_multiplier")]
    pub buy_price_multiplier: Decimal,

    /// Entry price multiplier when closing by selling
    #[serde(default = "default_sell_price_multiplier")]
    pub sell_price_multiplier: Decimal,

    /// Pause between the cancel and snapshot calls (milliseconds)
    #[serde(default = "default_api_delay_ms")]
    pub api_delay_ms: u64,

    /// Pause after each close order (milliseconds)
    #[serde(default = "default_order_delay_ms")]
    pub order_delay_ms: u64,

    /// Locally persisted pending-order state
    #[serde(default = "default_pending_state_path")]
    pub pending_state_path: PathBuf,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        Self {
            expiration_offset_secs: default_expiration_offset_secs(),
            limit_fee: default_limit_fee(),
            buy_price_multiplier: default_buy_price_multiplier(),
            sell_price_multiplier: default_sell_price_multiplier(),
            api_delay_ms: default_api_delay_ms(),
            order_delay_ms: default_order_delay_ms(),
            pending_state_path: default_pending_state_path(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

fn default_true() -> bool {
    true
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_candle_limit() -> u32 {
    100
}
fn default_window_count() -> u32 {
    4
}
fn default_request_delay_ms() -> u64 {
    100
}
fn default_test_mode_market_count() -> usize {
    3
}
fn default_max_half_life() -> i64 {
    24
}
fn default_output_path() -> PathBuf {
    PathBuf::from("cointegrated_pairs.csv")
}
fn default_expiration_offset_secs() -> i64 {
    70
}
fn default_limit_fee() -> Decimal {
    Decimal::new(15, 3) // 0.015
}
fn default_buy_price_multiplier() -> Decimal {
    Decimal::new(17, 1) // 1.7
}
fn default_sell_price_multiplier() -> Decimal {
    Decimal::new(3, 1) // 0.3
}
fn default_api_delay_ms() -> u64 {
    500
}
fn default_order_delay_ms() -> u64 {
    200
}
fn default_pending_state_path() -> PathBuf {
    PathBuf::from("bot_agents.json")
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the lookback arithmetic cannot represent
    pub fn validate(&self) -> anyhow::Result<()> {
        let market_data = &self.market_data;
        anyhow::ensure!(
            (1..=MAX_CANDLE_LIMIT).contains(&market_data.candle_limit),
            "market_data.candle_limit must be between 1 and {MAX_CANDLE_LIMIT}, got {}",
            market_data.candle_limit
        );
        anyhow::ensure!(
            (1..=MAX_WINDOW_COUNT).contains(&market_data.window_count),
            "market_data.window_count must be between 1 and {MAX_WINDOW_COUNT}, got {}",
            market_data.window_count
        );
        Ok(())
    }

    /// Built-in configuration shipped as `config.toml.example`
    pub fn example() -> anyhow::Result<Self> {
        Self::parse(include_str!("../config.toml.example"))
    }
}
