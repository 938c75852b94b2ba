use crate::repository::DbPool;
use anyhow::Result;

pub async fn establish_connection(database_url: &str) -> Result<DbPool> {
    // Ensure the database URL has the correct format
    let db_url = if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite:{}", database_url)
    };

    // Create connection with create_if_missing option
    let connection_string = format!("{}?mode=rwc", db_url);
    let pool = sqlx::SqlitePool::connect(&connection_string).await?;

    migrate(&pool).await?;

    Ok(pool)
}

async fn migrate(pool: &DbPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS functions (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            runtime TEXT NOT NULL,
            current_version TEXT NOT NULL,
            executions_24h INTEGER NOT NULL DEFAULT 0,
            failures_24h INTEGER NOT NULL DEFAULT 0,
            active BOOLEAN NOT NULL DEFAULT 1,
            code TEXT NOT NULL DEFAULT '',
            env_vars TEXT,
            memory INTEGER,
            timeout INTEGER,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS executions (
            id INTEGER PRIMARY KEY,
            function TEXT NOT NULL,
            status INTEGER NOT NULL,
            execution_type INTEGER NOT NULL,
            parent_execution_id INTEGER,
            duration INTEGER NOT NULL DEFAULT 0,
            timestamp INTEGER NOT NULL,
            worker TEXT NOT NULL,
            lamport INTEGER NOT NULL,
            input TEXT NOT NULL DEFAULT '{}',
            output TEXT NOT NULL DEFAULT '{}',
            logs TEXT NOT NULL DEFAULT '[]'
        );

        CREATE INDEX IF NOT EXISTS idx_executions_function ON executions(function);
        CREATE INDEX IF NOT EXISTS idx_executions_timestamp ON executions(timestamp);
        CREATE INDEX IF NOT EXISTS idx_executions_parent ON executions(parent_execution_id);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
