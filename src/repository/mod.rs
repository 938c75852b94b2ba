mod connection;
mod execution_repository;
mod function_repository;

pub use connection::establish_connection;
pub use execution_repository::{ExecutionQuery, ExecutionRepository, NewExecution};
pub use function_repository::FunctionRepository;

pub type DbPool = sqlx::SqlitePool;

#[cfg(test)]
pub(crate) async fn test_pool() -> (tempfile::TempDir, DbPool) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite:{}", dir.path().join("eventos.db").display());
    let pool = establish_connection(&url).await.unwrap();
    (dir, pool)
}
