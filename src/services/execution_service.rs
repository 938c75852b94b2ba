use crate::error::{AppError, Result};
use crate::models::{ExecutionRecord, ExecutionStatus, ExecutionType};
use crate::repository::{ExecutionQuery, ExecutionRepository, NewExecution};
use crate::services::Clock;
use crate::timeline::{CompareMode, Comparison, ExecutionIndex, ParentLink};
use serde_json::Map;

pub const DEFAULT_PAGE_LIMIT: i64 = 50;
pub const MAX_PAGE_LIMIT: i64 = 500;

#[derive(Debug, Clone, Default)]
pub struct ListParams {
    pub function: Option<String>,
    pub status: Option<ExecutionStatus>,
    pub execution_type: Option<ExecutionType>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct ExecutionPage {
    pub data: Vec<ExecutionRecord>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParentState {
    Root,
    Found(ExecutionRecord),
    Missing(i64),
}

/// A record with its resolved parent and its replay/shadow children.
#[derive(Debug, Clone)]
pub struct ExecutionLineage {
    pub record: ExecutionRecord,
    pub parent: ParentState,
    pub children: Vec<ExecutionRecord>,
}

#[derive(Clone)]
pub struct ExecutionService {
    repo: ExecutionRepository,
    clock: Clock,
}

impl ExecutionService {
    pub fn new(repo: ExecutionRepository, clock: Clock) -> Self {
        Self { repo, clock }
    }

    pub async fn list_executions(&self, params: ListParams) -> Result<ExecutionPage> {
        let page = params.page.unwrap_or(1);
        if page < 1 {
            return Err(AppError::Validation("page must be at least 1".to_string()));
        }
        let limit = params.limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_LIMIT
            )));
        }

        let offset = (page - 1)
            .checked_mul(limit)
            .ok_or_else(|| AppError::Validation(format!("page {} is out of range", page)))?;

        let query = ExecutionQuery {
            function: params.function,
            status: params.status,
            execution_type: params.execution_type,
            limit,
            offset,
        };
        let (data, total) = self.repo.list(&query).await?;

        Ok(ExecutionPage {
            data,
            total,
            page,
            limit,
        })
    }

    pub async fn get_lineage(&self, id: i64) -> Result<ExecutionLineage> {
        let records = self.repo.list_all().await?;
        let index = ExecutionIndex::new(&records);
        let record = index.get(id).ok_or(AppError::ExecutionNotFound(id))?;

        let parent = match index.parent_of(record) {
            ParentLink::Root => ParentState::Root,
            ParentLink::Found(parent) => ParentState::Found(parent.clone()),
            ParentLink::Missing(parent_id) => {
                tracing::warn!(
                    "Execution {} references missing parent {}",
                    id,
                    parent_id
                );
                ParentState::Missing(parent_id)
            }
        };

        Ok(ExecutionLineage {
            record: record.clone(),
            parent,
            children: index.children_of(id).into_iter().cloned().collect(),
        })
    }

    pub async fn replay_execution(&self, id: i64) -> Result<ExecutionRecord> {
        let original = self.repo.get(id).await?;
        let worker = original.worker.clone();
        let replay = self
            .repo
            .create(Self::derive(&original, ExecutionType::Replay, worker, self.clock.now()))
            .await?;

        tracing::info!("Replay {} queued for execution {}", replay.id, id);
        Ok(replay)
    }

    pub async fn shadow_execution(
        &self,
        id: i64,
        target_worker: Option<String>,
    ) -> Result<ExecutionRecord> {
        let original = self.repo.get(id).await?;
        let worker = match target_worker {
            Some(worker) if worker.trim().is_empty() => {
                return Err(AppError::Validation(
                    "targetWorker cannot be empty".to_string(),
                ));
            }
            Some(worker) => worker,
            None => original.worker.clone(),
        };
        let shadow = self
            .repo
            .create(Self::derive(&original, ExecutionType::Shadow, worker, self.clock.now()))
            .await?;

        tracing::info!(
            "Shadow {} queued for execution {} on {}",
            shadow.id,
            id,
            shadow.worker
        );
        Ok(shadow)
    }

    pub async fn compare_execution(&self, id: i64, mode: CompareMode) -> Result<Comparison> {
        let records = self.repo.list_all().await?;
        let index = ExecutionIndex::new(&records);
        let original = index.get(id).ok_or(AppError::ExecutionNotFound(id))?;
        let derived = index
            .derived_of(id, mode.execution_type())
            .ok_or(AppError::DerivedNotFound {
                id,
                mode: mode.as_str(),
            })?;

        Ok(Comparison::between(original.clone(), derived.clone()))
    }

    fn derive(
        original: &ExecutionRecord,
        execution_type: ExecutionType,
        worker: String,
        now: chrono::DateTime<chrono::Utc>,
    ) -> NewExecution {
        NewExecution {
            function: original.function.clone(),
            status: ExecutionStatus::Pending,
            execution_type,
            parent_execution_id: Some(original.id),
            duration: 0,
            timestamp: now,
            worker,
            input: original.input.clone(),
            output: Map::new(),
            logs: vec![format!(
                "[INFO] {} of execution {} queued",
                execution_type.as_str(),
                original.id
            )],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_pool;
    use crate::timeline::Verdict;
    use crate::timeline::fixtures::{normal, now, record};
    use crate::models::ExecutionStatus::{Failed, Success};

    async fn service_with(records: &[ExecutionRecord]) -> (tempfile::TempDir, ExecutionService) {
        let (dir, pool) = test_pool().await;
        let repo = ExecutionRepository::new(pool);
        for record in records {
            repo.insert(record).await.unwrap();
        }
        (dir, ExecutionService::new(repo, Clock::fixed(now())))
    }

    #[tokio::test]
    async fn replay_links_parent_and_copies_input() {
        let mut original = normal(1003, "sendNotification", Failed, 12 * 60);
        original.input = serde_json::json!({"channel": "email"})
            .as_object()
            .cloned()
            .unwrap();
        let (_dir, service) = service_with(&[original.clone()]).await;

        let replay = service.replay_execution(1003).await.unwrap();
        assert_eq!(replay.execution_type, ExecutionType::Replay);
        assert_eq!(replay.parent_execution_id, Some(1003));
        assert_eq!(replay.status, ExecutionStatus::Pending);
        assert_eq!(replay.function, "sendNotification");
        assert_eq!(replay.input, original.input);
        assert_eq!(replay.timestamp, now());
        assert!(replay.lamport > original.lamport);
    }

    #[tokio::test]
    async fn shadow_honours_target_worker() {
        let (_dir, service) = service_with(&[normal(1006, "processPayment", Success, 60)]).await;

        let shadow = service
            .shadow_execution(1006, Some("worker-b7e2".to_string()))
            .await
            .unwrap();
        assert_eq!(shadow.worker, "worker-b7e2");
        assert_eq!(shadow.execution_type, ExecutionType::Shadow);

        let default_worker = service.shadow_execution(1006, None).await.unwrap();
        assert_eq!(default_worker.worker, "worker-a3f2");

        assert!(matches!(
            service.shadow_execution(1006, Some("  ".to_string())).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn replaying_unknown_execution_is_not_found() {
        let (_dir, service) = service_with(&[]).await;
        assert!(matches!(
            service.replay_execution(42).await,
            Err(AppError::ExecutionNotFound(42))
        ));
    }

    #[tokio::test]
    async fn lineage_tolerates_dangling_parent() {
        let records = vec![
            normal(1, "resizeImage", Failed, 60),
            record(2, "resizeImage", Success, ExecutionType::Replay, Some(1), 30),
            record(3, "resizeImage", Success, ExecutionType::Shadow, Some(99), 20),
        ];
        let (_dir, service) = service_with(&records).await;

        let root = service.get_lineage(1).await.unwrap();
        assert_eq!(root.parent, ParentState::Root);
        assert_eq!(root.children.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2]);

        let child = service.get_lineage(2).await.unwrap();
        assert!(matches!(child.parent, ParentState::Found(ref p) if p.id == 1));

        let orphan = service.get_lineage(3).await.unwrap();
        assert_eq!(orphan.parent, ParentState::Missing(99));
    }

    #[tokio::test]
    async fn list_validates_paging() {
        let (_dir, service) = service_with(&[normal(1, "resizeImage", Success, 60)]).await;

        let page = service.list_executions(ListParams::default()).await.unwrap();
        assert_eq!((page.total, page.page, page.limit), (1, 1, DEFAULT_PAGE_LIMIT));

        for params in [
            ListParams { page: Some(0), ..Default::default() },
            ListParams { limit: Some(0), ..Default::default() },
            ListParams { limit: Some(MAX_PAGE_LIMIT + 1), ..Default::default() },
            ListParams { page: Some(i64::MAX), limit: Some(MAX_PAGE_LIMIT), ..Default::default() },
        ] {
            assert!(matches!(
                service.list_executions(params).await,
                Err(AppError::Validation(_))
            ));
        }
    }

    #[tokio::test]
    async fn compare_uses_latest_derived_run() {
        let records = vec![
            normal(1003, "sendNotification", Failed, 12 * 60),
            record(1013, "sendNotification", Success, ExecutionType::Replay, Some(1003), 10 * 60),
        ];
        let (_dir, service) = service_with(&records).await;

        let comparison = service
            .compare_execution(1003, CompareMode::Replay)
            .await
            .unwrap();
        assert_eq!(comparison.derived.id, 1013);
        assert_eq!(comparison.verdict, Verdict::Recovered);

        assert!(matches!(
            service.compare_execution(1003, CompareMode::Shadow).await,
            Err(AppError::DerivedNotFound { id: 1003, .. })
        ));
    }
}
