use super::format::tick_label;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MS_PER_MINUTE: i64 = 60_000;
const MS_PER_HOUR: i64 = 3_600_000;

/// Named lookback ranges offered by the timeline view.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TimeRange {
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "10m")]
    TenMinutes,
    #[default]
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "6h")]
    SixHours,
    #[serde(rename = "24h")]
    TwentyFourHours,
}

/// Window length and tick spacing for a [`TimeRange`], in milliseconds.
///
/// `slot_count * slot_ms == window_ms` for every range, so the last tick
/// always lands on `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeConfig {
    pub window_ms: i64,
    pub slot_count: u32,
    pub slot_ms: i64,
}

impl TimeRange {
    pub const ALL: [TimeRange; 5] = [
        TimeRange::FiveMinutes,
        TimeRange::TenMinutes,
        TimeRange::OneHour,
        TimeRange::SixHours,
        TimeRange::TwentyFourHours,
    ];

    pub fn config(&self) -> RangeConfig {
        match self {
            Self::FiveMinutes => RangeConfig {
                window_ms: 5 * MS_PER_MINUTE,
                slot_count: 10,
                slot_ms: MS_PER_MINUTE / 2,
            },
            Self::TenMinutes => RangeConfig {
                window_ms: 10 * MS_PER_MINUTE,
                slot_count: 10,
                slot_ms: MS_PER_MINUTE,
            },
            Self::OneHour => RangeConfig {
                window_ms: MS_PER_HOUR,
                slot_count: 12,
                slot_ms: 5 * MS_PER_MINUTE,
            },
            Self::SixHours => RangeConfig {
                window_ms: 6 * MS_PER_HOUR,
                slot_count: 12,
                slot_ms: 30 * MS_PER_MINUTE,
            },
            Self::TwentyFourHours => RangeConfig {
                window_ms: 24 * MS_PER_HOUR,
                slot_count: 12,
                slot_ms: 120 * MS_PER_MINUTE,
            },
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::FiveMinutes => "5m",
            Self::TenMinutes => "10m",
            Self::OneHour => "1h",
            Self::SixHours => "6h",
            Self::TwentyFourHours => "24h",
        }
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|range| range.key() == s.trim())
            .ok_or_else(|| format!("Unknown time range: {}", s))
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tick {
    pub time: DateTime<Utc>,
    pub label: String,
    pub is_now: bool,
}

/// The `[start, now]` interval a timeline is drawn over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub range: TimeRange,
    pub start: DateTime<Utc>,
    pub now: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(now: DateTime<Utc>, range: TimeRange) -> Self {
        let start = now - Duration::milliseconds(range.config().window_ms);
        Self { range, start, now }
    }

    pub fn span_ms(&self) -> i64 {
        self.range.config().window_ms
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.now
    }

    pub fn ticks(&self) -> Vec<Tick> {
        let config = self.range.config();
        (0..=config.slot_count)
            .map(|i| {
                let time = self.start + Duration::milliseconds(i as i64 * config.slot_ms);
                Tick {
                    time,
                    label: tick_label(time),
                    is_now: i == config.slot_count,
                }
            })
            .collect()
    }
}
