//! Candle resolutions and lookback windows

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Candle resolution accepted by the candles endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Resolution {
    #[serde(rename = "1MIN")]
    OneMinute,
    #[serde(rename = "5MINS")]
    FiveMinutes,
    #[serde(rename = "15MINS")]
    FifteenMinutes,
    #[serde(rename = "30MINS")]
    ThirtyMinutes,
    #[default]
    #[serde(rename = "1HOUR")]
    OneHour,
    #[serde(rename = "4HOURS")]
    FourHours,
    #[serde(rename = "1DAY")]
    OneDay,
}

impl Resolution {
    /// Wire name of the resolution
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::OneMinute => "1MIN",
            Resolution::FiveMinutes => "5MINS",
            Resolution::FifteenMinutes => "15MINS",
            Resolution::ThirtyMinutes => "30MINS",
            Resolution::OneHour => "1HOUR",
            Resolution::FourHours => "4HOURS",
            Resolution::OneDay => "1DAY",
        }
    }

    /// Length of one bucket
    pub fn duration(&self) -> Duration {
        match self {
            Resolution::OneMinute => Duration::minutes(1),
            Resolution::FiveMinutes => Duration::minutes(5),
            Resolution::FifteenMinutes => Duration::minutes(15),
            Resolution::ThirtyMinutes => Duration::minutes(30),
            Resolution::OneHour => Duration::hours(1),
            Resolution::FourHours => Duration::hours(4),
            Resolution::OneDay => Duration::days(1),
        }
    }
}

/// A half-open request window `[from, to)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Split the lookback ending at `now` into consecutive windows
///
/// Each window spans `candle_limit` buckets so that a single request never
/// exceeds the per-request candle cap. Windows are returned oldest first.
/// Both counts are bounded by `Config::validate`.
pub fn lookback_windows(
    now: DateTime<Utc>,
    resolution: Resolution,
    candle_limit: u32,
    window_count: u32,
) -> Vec<TimeWindow> {
    let span = resolution.duration() * candle_limit as i32;

    (0..window_count)
        .rev()
        .map(|i| {
            let to = now - span * i as i32;
            TimeWindow { from: to - span, to }
        })
        .collect()
}
