use crate::error::{AppError, Result};
use crate::models::{ExecutionRecord, ExecutionStatus, ExecutionType};
use crate::repository::DbPool;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::{Sqlite, SqliteConnection, Transaction};

#[derive(Debug, sqlx::FromRow)]
struct ExecutionRow {
    id: i64,
    function: String,
    status: ExecutionStatus,
    execution_type: ExecutionType,
    parent_execution_id: Option<i64>,
    duration: i64,
    timestamp: i64,
    worker: String,
    lamport: i64,
    input: String,
    output: String,
    logs: String,
}

impl TryFrom<ExecutionRow> for ExecutionRecord {
    type Error = AppError;

    fn try_from(row: ExecutionRow) -> Result<Self> {
        let timestamp = DateTime::from_timestamp_millis(row.timestamp).ok_or_else(|| {
            AppError::Validation(format!(
                "Execution {} has an out-of-range timestamp {}",
                row.id, row.timestamp
            ))
        })?;

        Ok(Self {
            id: row.id,
            function: row.function,
            status: row.status,
            execution_type: row.execution_type,
            parent_execution_id: row.parent_execution_id,
            duration: row.duration.max(0) as u64,
            timestamp,
            worker: row.worker,
            lamport: row.lamport,
            input: serde_json::from_str(&row.input)?,
            output: serde_json::from_str(&row.output)?,
            logs: serde_json::from_str(&row.logs)?,
        })
    }
}

/// Filters accepted by [`ExecutionRepository::list`].
#[derive(Debug, Clone, Default)]
pub struct ExecutionQuery {
    pub function: Option<String>,
    pub status: Option<ExecutionStatus>,
    pub execution_type: Option<ExecutionType>,
    pub limit: i64,
    pub offset: i64,
}

/// A record to append. `id` is assigned by the store; the lamport clock is
/// taken as one past the highest value already stored.
#[derive(Debug, Clone)]
pub struct NewExecution {
    pub function: String,
    pub status: ExecutionStatus,
    pub execution_type: ExecutionType,
    pub parent_execution_id: Option<i64>,
    pub duration: u64,
    pub timestamp: DateTime<Utc>,
    pub worker: String,
    pub input: Map<String, Value>,
    pub output: Map<String, Value>,
    pub logs: Vec<String>,
}

#[derive(Clone)]
pub struct ExecutionRepository {
    pool: DbPool,
}

impl ExecutionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, id: i64) -> Result<ExecutionRecord> {
        let row = sqlx::query_as::<_, ExecutionRow>("SELECT * FROM executions WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::ExecutionNotFound(id))?;

        ExecutionRecord::try_from(row)
    }

    /// Every stored record, oldest first.
    pub async fn list_all(&self) -> Result<Vec<ExecutionRecord>> {
        let rows = sqlx::query_as::<_, ExecutionRow>(
            "SELECT * FROM executions ORDER BY timestamp ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ExecutionRecord::try_from).collect()
    }

    /// One page of matching records, newest first, plus the total match count.
    pub async fn list(&self, query: &ExecutionQuery) -> Result<(Vec<ExecutionRecord>, i64)> {
        let status = query.status.map(|s| s as i32);
        let execution_type = query.execution_type.map(|t| t as i32);

        let rows = sqlx::query_as::<_, ExecutionRow>(
            r#"
            SELECT * FROM executions
            WHERE (?1 IS NULL OR function = ?1)
              AND (?2 IS NULL OR status = ?2)
              AND (?3 IS NULL OR execution_type = ?3)
            ORDER BY timestamp DESC, id DESC
            LIMIT ?4 OFFSET ?5
            "#,
        )
        .bind(&query.function)
        .bind(status)
        .bind(execution_type)
        .bind(query.limit)
        .bind(query.offset)
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM executions
            WHERE (?1 IS NULL OR function = ?1)
              AND (?2 IS NULL OR status = ?2)
              AND (?3 IS NULL OR execution_type = ?3)
            "#,
        )
        .bind(&query.function)
        .bind(status)
        .bind(execution_type)
        .fetch_one(&self.pool)
        .await?;

        let records = rows
            .into_iter()
            .map(ExecutionRecord::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok((records, total))
    }

    pub async fn count(&self) -> Result<i64> {
        let total = sqlx::query_scalar("SELECT COUNT(*) FROM executions")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn create(&self, new: NewExecution) -> Result<ExecutionRecord> {
        let result = sqlx::query(
            r#"
            INSERT INTO executions
                (function, status, execution_type, parent_execution_id, duration, timestamp,
                 worker, lamport, input, output, logs)
            VALUES (?, ?, ?, ?, ?, ?, ?,
                    (SELECT COALESCE(MAX(lamport), 0) + 1 FROM executions),
                    ?, ?, ?)
            "#,
        )
        .bind(&new.function)
        .bind(new.status as i32)
        .bind(new.execution_type as i32)
        .bind(new.parent_execution_id)
        .bind(new.duration as i64)
        .bind(new.timestamp.timestamp_millis())
        .bind(&new.worker)
        .bind(serde_json::to_string(&new.input)?)
        .bind(serde_json::to_string(&new.output)?)
        .bind(serde_json::to_string(&new.logs)?)
        .execute(&self.pool)
        .await?;

        self.get(result.last_insert_rowid()).await
    }

    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        Ok(self.pool.begin().await?)
    }

    /// Stores a record with its own id and lamport value, as used for seeding.
    pub async fn insert(&self, record: &ExecutionRecord) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_with(&mut conn, record).await
    }

    pub async fn insert_with(conn: &mut SqliteConnection, record: &ExecutionRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO executions
                (id, function, status, execution_type, parent_execution_id, duration, timestamp,
                 worker, lamport, input, output, logs)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id)
        .bind(&record.function)
        .bind(record.status as i32)
        .bind(record.execution_type as i32)
        .bind(record.parent_execution_id)
        .bind(record.duration as i64)
        .bind(record.timestamp.timestamp_millis())
        .bind(&record.worker)
        .bind(record.lamport)
        .bind(serde_json::to_string(&record.input)?)
        .bind(serde_json::to_string(&record.output)?)
        .bind(serde_json::to_string(&record.logs)?)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}
