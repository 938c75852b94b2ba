use crate::models::{ExecutionRecord, ExecutionStatus, ExecutionType};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Lookback windows reported on the dashboard, in minutes.
pub const LOOKBACK_MINUTES: [i64; 4] = [1, 5, 15, 60];

/// Success rate reported for a window with no executions.
pub const EMPTY_WINDOW_SUCCESS_RATE: u32 = 100;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RollingStat {
    pub minutes: i64,
    pub count: usize,
    pub success_rate: u32,
}

/// Platform-wide counts for every entry in [`LOOKBACK_MINUTES`].
pub fn rolling_stats(records: &[ExecutionRecord], now: DateTime<Utc>) -> Vec<RollingStat> {
    LOOKBACK_MINUTES
        .iter()
        .map(|&minutes| rolling_stat(records, now, minutes))
        .collect()
}

pub fn rolling_stat(records: &[ExecutionRecord], now: DateTime<Utc>, minutes: i64) -> RollingStat {
    let cutoff = now - Duration::minutes(minutes);
    let (count, success) = records
        .iter()
        .filter(|record| record.timestamp >= cutoff)
        .fold((0, 0), |(count, success), record| {
            let ok = (record.status == ExecutionStatus::Success) as usize;
            (count + 1, success + ok)
        });

    let success_rate = if count == 0 {
        EMPTY_WINDOW_SUCCESS_RATE
    } else {
        percent(success, count)
    };

    RollingStat {
        minutes,
        count,
        success_rate,
    }
}

/// Totals over the whole record set.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionStats {
    pub total: usize,
    pub normal: usize,
    pub replay: usize,
    pub shadow: usize,
    pub success: usize,
    pub failed: usize,
    pub replay_success: usize,
    pub replay_failed: usize,
    pub shadow_success: usize,
    pub shadow_failed: usize,
    pub replay_rate: u32,
    pub shadow_rate: u32,
    pub success_rate: u32,
    pub debug_rate: u32,
    pub avg_duration_ms: u64,
}

impl ExecutionStats {
    pub fn from_records(records: &[ExecutionRecord]) -> Self {
        let mut stats = Self {
            total: records.len(),
            ..Self::default()
        };
        let mut duration_sum: u64 = 0;

        for record in records {
            match record.execution_type {
                ExecutionType::Normal => stats.normal += 1,
                ExecutionType::Replay => stats.replay += 1,
                ExecutionType::Shadow => stats.shadow += 1,
            }
            match (record.execution_type, record.status) {
                (ExecutionType::Replay, ExecutionStatus::Success) => stats.replay_success += 1,
                (ExecutionType::Replay, ExecutionStatus::Failed) => stats.replay_failed += 1,
                (ExecutionType::Shadow, ExecutionStatus::Success) => stats.shadow_success += 1,
                (ExecutionType::Shadow, ExecutionStatus::Failed) => stats.shadow_failed += 1,
                _ => {}
            }
            match record.status {
                ExecutionStatus::Success => stats.success += 1,
                ExecutionStatus::Failed => stats.failed += 1,
                _ => {}
            }
            duration_sum = duration_sum.saturating_add(record.duration);
        }

        if stats.total > 0 {
            stats.replay_rate = percent(stats.replay, stats.total);
            stats.shadow_rate = percent(stats.shadow, stats.total);
            stats.success_rate = percent(stats.success, stats.total);
            stats.debug_rate = percent(stats.replay + stats.shadow, stats.total);
            stats.avg_duration_ms =
                (duration_sum as f64 / stats.total as f64).round() as u64;
        }

        stats
    }
}

/// Executions stamped on the same UTC calendar day as `now`.
pub fn executions_on_day(records: &[ExecutionRecord], now: DateTime<Utc>) -> usize {
    let day = now.date_naive();
    records
        .iter()
        .filter(|record| record.timestamp.date_naive() == day)
        .count()
}

fn percent(part: usize, whole: usize) -> u32 {
    (part as f64 / whole as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExecutionStatus::{Failed, Pending, Running, Success};
    use crate::models::ExecutionType::{Replay, Shadow};
    use crate::timeline::fixtures::{normal, now, record};

    #[test]
    fn reports_each_lookback_window() {
        let records = vec![
            normal(1, "resizeImage", Success, 30),
            normal(2, "sendNotification", Failed, 3 * 60),
            normal(3, "processPayment", Success, 20 * 60),
        ];

        let stats = rolling_stats(&records, now());
        assert_eq!(
            stats,
            vec![
                RollingStat { minutes: 1, count: 1, success_rate: 100 },
                RollingStat { minutes: 5, count: 2, success_rate: 50 },
                RollingStat { minutes: 15, count: 2, success_rate: 50 },
                RollingStat { minutes: 60, count: 3, success_rate: 67 },
            ]
        );
    }

    #[test]
    fn empty_window_reports_full_success() {
        let records = vec![normal(1, "resizeImage", Failed, 2 * 60 * 60)];
        let stat = rolling_stat(&records, now(), 60);
        assert_eq!(stat.count, 0);
        assert_eq!(stat.success_rate, EMPTY_WINDOW_SUCCESS_RATE);

        assert!(rolling_stats(&[], now()).iter().all(|s| s.success_rate == 100));
    }

    #[test]
    fn cutoff_is_inclusive_and_future_records_count() {
        let records = vec![
            normal(1, "resizeImage", Success, 60),
            normal(2, "resizeImage", Running, -30),
        ];
        let stat = rolling_stat(&records, now(), 1);
        assert_eq!(stat.count, 2);
        assert_eq!(stat.success_rate, 50);
    }

    #[test]
    fn totals_cover_types_statuses_and_rates() {
        let mut records = vec![
            normal(1, "generateReport", Failed, 60),
            record(2, "generateReport", Failed, Shadow, Some(1), 50),
            normal(3, "sendNotification", Failed, 40),
            record(4, "sendNotification", Success, Replay, Some(3), 30),
        ];
        records[0].duration = 2341;
        records[1].duration = 2456;
        records[2].duration = 523;
        records[3].duration = 98;

        let stats = ExecutionStats::from_records(&records);
        assert_eq!(stats.total, 4);
        assert_eq!((stats.normal, stats.replay, stats.shadow), (2, 1, 1));
        assert_eq!((stats.success, stats.failed), (1, 3));
        assert_eq!((stats.replay_success, stats.replay_failed), (1, 0));
        assert_eq!((stats.shadow_success, stats.shadow_failed), (0, 1));
        assert_eq!(stats.success_rate, 25);
        assert_eq!(stats.debug_rate, 50);
        assert_eq!(stats.avg_duration_ms, 1355);
    }

    #[test]
    fn derived_runs_still_pending_are_not_split() {
        let records = vec![
            normal(1, "resizeImage", Failed, 90),
            record(2, "resizeImage", Pending, Replay, Some(1), 60),
            record(3, "resizeImage", Running, Shadow, Some(1), 30),
        ];
        let stats = ExecutionStats::from_records(&records);
        assert_eq!((stats.replay, stats.shadow), (1, 1));
        assert_eq!(
            (stats.replay_success, stats.replay_failed, stats.shadow_success, stats.shadow_failed),
            (0, 0, 0, 0)
        );
    }

    #[test]
    fn today_counts_only_the_current_calendar_day() {
        // now() is 12:00 UTC, so 13h ago falls on the previous day.
        let records = vec![
            normal(1, "resizeImage", Success, 60),
            normal(2, "resizeImage", Success, 11 * 60 * 60),
            normal(3, "resizeImage", Failed, 13 * 60 * 60),
        ];
        assert_eq!(executions_on_day(&records, now()), 2);
        assert_eq!(executions_on_day(&[], now()), 0);
    }

    #[test]
    fn totals_of_nothing_are_zero() {
        assert_eq!(ExecutionStats::from_records(&[]), ExecutionStats::default());
    }
}
