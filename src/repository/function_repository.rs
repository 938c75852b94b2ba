use crate::error::{AppError, Result};
use crate::models::FunctionDef;
use crate::repository::DbPool;
use sqlx::SqliteConnection;

#[derive(Clone)]
pub struct FunctionRepository {
    pool: DbPool,
}

impl FunctionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<FunctionDef>> {
        let functions = sqlx::query_as::<_, FunctionDef>(
            r#"
            SELECT id, name, runtime, current_version, executions_24h, failures_24h, active,
                   code, env_vars, memory, timeout, created_at
            FROM functions
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(functions)
    }

    pub async fn get(&self, id: &str) -> Result<FunctionDef> {
        let function = sqlx::query_as::<_, FunctionDef>(
            r#"
            SELECT id, name, runtime, current_version, executions_24h, failures_24h, active,
                   code, env_vars, memory, timeout, created_at
            FROM functions
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::FunctionNotFound(id.to_string()))?;

        Ok(function)
    }

    pub async fn exists_by_name(&self, name: &str) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;
        Self::exists_by_name_with(&mut conn, name).await
    }

    pub async fn exists_by_name_with(conn: &mut SqliteConnection, name: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM functions WHERE name = ?")
            .bind(name)
            .fetch_one(&mut *conn)
            .await?;
        Ok(count > 0)
    }

    pub async fn create(&self, function: &FunctionDef) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        Self::create_with(&mut conn, function).await
    }

    pub async fn create_with(conn: &mut SqliteConnection, function: &FunctionDef) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO functions (id, name, runtime, current_version, executions_24h, failures_24h, active, code, env_vars, memory, timeout, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&function.id)
        .bind(&function.name)
        .bind(&function.runtime)
        .bind(&function.current_version)
        .bind(function.executions_24h)
        .bind(function.failures_24h)
        .bind(function.active)
        .bind(&function.code)
        .bind(&function.env_vars)
        .bind(function.memory)
        .bind(function.timeout)
        .bind(function.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM functions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::FunctionNotFound(id.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_pool;
    use chrono::{Duration, TimeZone, Utc};

    fn function(id: &str, name: &str, offset_secs: i64) -> FunctionDef {
        FunctionDef {
            id: id.to_string(),
            name: name.to_string(),
            runtime: "node20".to_string(),
            current_version: "v1.0.0".to_string(),
            executions_24h: 0,
            failures_24h: 0,
            active: true,
            code: "export const handler = async () => ({})".to_string(),
            env_vars: None,
            memory: Some(256),
            timeout: Some(30),
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()
                + Duration::seconds(offset_secs),
        }
    }

    #[tokio::test]
    async fn create_list_and_delete() {
        let (_dir, pool) = test_pool().await;
        let repo = FunctionRepository::new(pool);

        repo.create(&function("fn-2", "processPayment", 1)).await.unwrap();
        repo.create(&function("fn-1", "resizeImage", 0)).await.unwrap();

        let names: Vec<String> = repo.list().await.unwrap().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["resizeImage", "processPayment"]);
        assert!(repo.exists_by_name("resizeImage").await.unwrap());
        assert_eq!(repo.get("fn-2").await.unwrap().memory, Some(256));

        repo.delete("fn-1").await.unwrap();
        assert!(matches!(
            repo.delete("fn-1").await,
            Err(AppError::FunctionNotFound(_))
        ));
        assert!(!repo.exists_by_name("resizeImage").await.unwrap());
    }
}
