use super::format::relative_time;
use super::layout::{bar_width, position_percent};
use super::navigation::NavigationIntent;
use super::window::TimeWindow;
use crate::models::{ExecutionRecord, ExecutionStatus, ExecutionType};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Only(ExecutionType),
}

impl TypeFilter {
    pub fn matches(&self, execution_type: ExecutionType) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => *wanted == execution_type,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("ALL") {
            return Ok(Self::All);
        }
        s.parse::<ExecutionType>().map(Self::Only)
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("ALL"),
            Self::Only(execution_type) => f.write_str(execution_type.as_str()),
        }
    }
}

/// Badge counts shown next to a function's name.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct FunctionSummary {
    pub success: usize,
    pub failed: usize,
    pub replay: usize,
    pub shadow: usize,
}

impl FunctionSummary {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a ExecutionRecord>,
    {
        let mut summary = Self::default();
        for record in records {
            match record.status {
                ExecutionStatus::Success => summary.success += 1,
                ExecutionStatus::Failed => summary.failed += 1,
                ExecutionStatus::Running | ExecutionStatus::Pending => {}
            }
            match record.execution_type {
                ExecutionType::Replay => summary.replay += 1,
                ExecutionType::Shadow => summary.shadow += 1,
                ExecutionType::Normal => {}
            }
        }
        summary
    }
}

/// One execution placed on a function's row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineBar {
    pub id: i64,
    pub status: ExecutionStatus,
    #[serde(rename = "type")]
    pub execution_type: ExecutionType,
    pub parent_execution_id: Option<i64>,
    pub duration: u64,
    pub timestamp: DateTime<Utc>,
    pub worker: String,
    pub lamport: i64,
    pub position: f64,
    pub width: f64,
    pub relative_time: String,
    pub intent: NavigationIntent,
}

impl TimelineBar {
    fn place(record: &ExecutionRecord, window: &TimeWindow) -> Self {
        Self {
            id: record.id,
            status: record.status,
            execution_type: record.execution_type,
            parent_execution_id: record.parent_execution_id,
            duration: record.duration,
            timestamp: record.timestamp,
            worker: record.worker.clone(),
            lamport: record.lamport,
            position: position_percent(window, record.timestamp),
            width: bar_width(record.duration),
            relative_time: relative_time(window.now, record.timestamp),
            intent: NavigationIntent::ExecutionDetail { id: record.id },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionRow {
    pub function: String,
    pub summary: FunctionSummary,
    pub bars: Vec<TimelineBar>,
}

/// Executions of `function` inside `window` that pass `filter`, oldest first.
///
/// The sort is stable: records sharing a timestamp keep their input order.
pub fn visible_executions<'a>(
    records: &'a [ExecutionRecord],
    function: &str,
    window: &TimeWindow,
    filter: TypeFilter,
) -> Vec<&'a ExecutionRecord> {
    let mut visible: Vec<&ExecutionRecord> = records
        .iter()
        .filter(|record| {
            record.function == function
                && window.contains(record.timestamp)
                && filter.matches(record.execution_type)
        })
        .collect();
    visible.sort_by_key(|record| record.timestamp);
    visible
}

/// Builds one row per function.
///
/// Rows follow `registered` order; functions that only appear in `records`
/// are appended in first-seen order.
pub fn function_rows(
    records: &[ExecutionRecord],
    registered: &[String],
    window: &TimeWindow,
    filter: TypeFilter,
) -> Vec<FunctionRow> {
    let mut seen = HashSet::new();
    let names: Vec<&str> = registered
        .iter()
        .map(String::as_str)
        .chain(records.iter().map(|record| record.function.as_str()))
        .filter(|name| seen.insert(*name))
        .collect();

    names
        .into_iter()
        .map(|name| {
            let visible = visible_executions(records, name, window, filter);
            FunctionRow {
                function: name.to_string(),
                summary: FunctionSummary::from_records(visible.iter().copied()),
                bars: visible
                    .into_iter()
                    .map(|record| TimelineBar::place(record, window))
                    .collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::fixtures::{normal, now, record};
    use crate::timeline::window::TimeRange;
    use crate::models::ExecutionStatus::{Failed, Running, Success};
    use crate::models::ExecutionType::{Normal, Replay, Shadow};

    fn sample() -> Vec<ExecutionRecord> {
        vec![
            normal(1, "resizeImage", Failed, 40 * 60),
            record(2, "resizeImage", Success, Replay, Some(1), 30 * 60),
            record(3, "resizeImage", Failed, Replay, Some(1), 90 * 60),
            normal(4, "sendNotification", Success, 10 * 60),
            record(5, "resizeImage", Success, Shadow, Some(1), 20 * 60),
            record(6, "resizeImage", Running, Replay, Some(1), 5 * 60),
            normal(7, "resizeImage", Success, 5 * 60),
            record(8, "resizeImage", Success, Replay, Some(7), -60),
        ]
    }

    #[test]
    fn filters_by_function_window_and_type() {
        let records = sample();
        let window = TimeWindow::new(now(), TimeRange::OneHour);
        let visible = visible_executions(
            &records,
            "resizeImage",
            &window,
            TypeFilter::Only(Replay),
        );

        let ids: Vec<i64> = visible.iter().map(|r| r.id).collect();
        // 3 is older than the window, 8 is in the future.
        assert_eq!(ids, vec![2, 6]);
        assert!(visible.windows(2).all(|p| p[0].timestamp <= p[1].timestamp));
    }

    #[test]
    fn equal_timestamps_keep_input_order() {
        let records = sample();
        let window = TimeWindow::new(now(), TimeRange::OneHour);
        let ids: Vec<i64> = visible_executions(&records, "resizeImage", &window, TypeFilter::All)
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 5, 6, 7]);
    }

    #[test]
    fn summary_counts_status_and_type() {
        let records = sample();
        let window = TimeWindow::new(now(), TimeRange::OneHour);
        let visible = visible_executions(&records, "resizeImage", &window, TypeFilter::All);
        let summary = FunctionSummary::from_records(visible.iter().copied());

        assert_eq!(
            summary,
            FunctionSummary {
                success: 3,
                failed: 1,
                replay: 2,
                shadow: 1,
            }
        );
    }

    #[test]
    fn rows_follow_registry_then_first_seen_order() {
        let mut records = sample();
        records.push(normal(9, "generateReport", Success, 60));
        let registered = vec!["processPayment".to_string(), "resizeImage".to_string()];
        let window = TimeWindow::new(now(), TimeRange::FiveMinutes);

        let rows = function_rows(&records, &registered, &window, TypeFilter::All);
        let names: Vec<&str> = rows.iter().map(|row| row.function.as_str()).collect();
        assert_eq!(
            names,
            vec!["processPayment", "resizeImage", "sendNotification", "generateReport"]
        );

        assert!(rows[0].bars.is_empty());
        assert_eq!(rows[0].summary, FunctionSummary::default());

        let resize = &rows[1];
        assert_eq!(resize.bars.iter().map(|b| b.id).collect::<Vec<_>>(), vec![6, 7]);
        assert_eq!(resize.bars[0].position, 0.0);
        assert_eq!(resize.bars[0].relative_time, "5m ago");
        assert_eq!(
            resize.bars[1].intent,
            NavigationIntent::ExecutionDetail { id: 7 }
        );

        let report = &rows[3];
        assert_eq!(report.bars.len(), 1);
        assert_eq!(report.bars[0].position, 80.0);
    }

    #[test]
    fn type_filter_parses_all_and_types() {
        assert_eq!("all".parse::<TypeFilter>(), Ok(TypeFilter::All));
        assert_eq!("SHADOW".parse::<TypeFilter>(), Ok(TypeFilter::Only(Shadow)));
        assert!("BOTH".parse::<TypeFilter>().is_err());
        assert!(TypeFilter::Only(Normal).matches(Normal));
        assert!(!TypeFilter::Only(Normal).matches(Replay));
    }
}
