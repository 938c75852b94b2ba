use crate::error::Result;
use crate::models::ExecutionRecord;
use crate::repository::{ExecutionRepository, FunctionRepository};
use crate::services::Clock;
use crate::timeline::{
    ExecutionIndex, ExecutionStats, FunctionRow, RollingStat, Tick, TimeRange, TimeWindow,
    TypeFilter, executions_on_day, function_rows, rolling_stats,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineView {
    pub now: DateTime<Utc>,
    pub range: TimeRange,
    pub type_filter: String,
    pub window_start: DateTime<Utc>,
    pub ticks: Vec<Tick>,
    pub rows: Vec<FunctionRow>,
    pub rolling: Vec<RollingStat>,
    pub total_executions: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub now: DateTime<Utc>,
    pub rolling: Vec<RollingStat>,
    pub totals: ExecutionStats,
    /// Executions on the UTC calendar day of `now`.
    pub today: usize,
    /// Registered functions.
    pub functions: usize,
}

/// Composes timeline views from the record store and the function registry.
#[derive(Clone)]
pub struct TimelineService {
    exec_repo: ExecutionRepository,
    function_repo: FunctionRepository,
    clock: Clock,
}

impl TimelineService {
    pub fn new(exec_repo: ExecutionRepository, function_repo: FunctionRepository, clock: Clock) -> Self {
        Self {
            exec_repo,
            function_repo,
            clock,
        }
    }

    /// `now` overrides the shared clock for this view only.
    pub async fn timeline(
        &self,
        range: TimeRange,
        filter: TypeFilter,
        now: Option<DateTime<Utc>>,
    ) -> Result<TimelineView> {
        let now = now.unwrap_or_else(|| self.clock.now());
        let records = self.exec_repo.list_all().await?;
        let registered: Vec<String> = self
            .function_repo
            .list()
            .await?
            .into_iter()
            .map(|function| function.name)
            .collect();

        Self::warn_dangling(&records);

        let window = TimeWindow::new(now, range);
        Ok(TimelineView {
            now,
            range,
            type_filter: filter.to_string(),
            window_start: window.start,
            ticks: window.ticks(),
            rows: function_rows(&records, &registered, &window, filter),
            rolling: rolling_stats(&records, now),
            total_executions: records.len(),
        })
    }

    pub async fn dashboard(&self, now: Option<DateTime<Utc>>) -> Result<DashboardStats> {
        let now = now.unwrap_or_else(|| self.clock.now());
        let records = self.exec_repo.list_all().await?;
        let functions = self.function_repo.list().await?.len();

        Ok(DashboardStats {
            now,
            rolling: rolling_stats(&records, now),
            totals: ExecutionStats::from_records(&records),
            today: executions_on_day(&records, now),
            functions,
        })
    }

    fn warn_dangling(records: &[ExecutionRecord]) {
        let index = ExecutionIndex::new(records);
        for record in index.dangling() {
            tracing::warn!(
                "Execution {} references missing parent {:?}",
                record.id,
                record.parent_execution_id
            );
        }
    }
}
