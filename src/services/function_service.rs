use crate::error::{AppError, Result};
use crate::models::{EnvVar, FunctionDef, Runtime};
use crate::repository::FunctionRepository;
use chrono::Utc;
use std::collections::HashSet;
use std::ops::RangeInclusive;
use uuid::Uuid;

const INITIAL_VERSION: &str = "v1.0.0";
const MAX_NAME_LEN: usize = 64;
const MEMORY_MB: RangeInclusive<i64> = 128..=10_240;
const TIMEOUT_SECS: RangeInclusive<i64> = 1..=900;

#[derive(Debug, Clone)]
pub struct Deployment {
    pub name: String,
    pub runtime: String,
    pub code: String,
    pub env_vars: Vec<EnvVar>,
    pub memory: Option<i64>,
    pub timeout: Option<i64>,
}

#[derive(Clone)]
pub struct FunctionService {
    repo: FunctionRepository,
}

impl FunctionService {
    pub fn new(repo: FunctionRepository) -> Self {
        Self { repo }
    }

    pub async fn list_functions(&self) -> Result<Vec<FunctionDef>> {
        self.repo.list().await
    }

    pub async fn get_function(&self, id: &str) -> Result<FunctionDef> {
        self.repo.get(id).await
    }

    pub async fn deploy_function(&self, deployment: Deployment) -> Result<FunctionDef> {
        let runtime = Self::validate(&deployment)?;

        if self.repo.exists_by_name(&deployment.name).await? {
            return Err(AppError::FunctionAlreadyExists(deployment.name));
        }

        let env_vars = if deployment.env_vars.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&deployment.env_vars)?)
        };

        let function = FunctionDef {
            id: format!("fn-{}", Uuid::new_v4()),
            name: deployment.name,
            runtime: runtime.to_string(),
            current_version: INITIAL_VERSION.to_string(),
            executions_24h: 0,
            failures_24h: 0,
            active: true,
            code: deployment.code,
            env_vars,
            memory: deployment.memory,
            timeout: deployment.timeout,
            created_at: Utc::now(),
        };
        // A concurrent deploy can win between the name check and the insert.
        self.repo.create(&function).await.map_err(|err| match err {
            AppError::Database(e)
                if e.as_database_error().is_some_and(|d| d.is_unique_violation()) =>
            {
                AppError::FunctionAlreadyExists(function.name.clone())
            }
            other => other,
        })?;

        tracing::info!(
            "Deployed function {} ({}) on {}",
            function.name,
            function.id,
            function.runtime
        );
        Ok(function)
    }

    pub async fn delete_function(&self, id: &str) -> Result<()> {
        self.repo.delete(id).await?;
        tracing::info!("Deleted function {}", id);
        Ok(())
    }

    fn validate(deployment: &Deployment) -> Result<Runtime> {
        let name = deployment.name.as_str();
        if name.trim().is_empty() {
            return Err(AppError::Validation("Function name is required".to_string()));
        }
        if name.len() > MAX_NAME_LEN {
            return Err(AppError::Validation(format!(
                "Function name cannot exceed {} characters",
                MAX_NAME_LEN
            )));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(AppError::Validation(format!(
                "Function name may only contain letters, digits, '-' and '_': {}",
                name
            )));
        }

        let runtime: Runtime = deployment.runtime.parse().map_err(AppError::Validation)?;

        if deployment.code.trim().is_empty() {
            return Err(AppError::Validation("Code is required".to_string()));
        }

        if let Some(memory) = deployment.memory {
            if !MEMORY_MB.contains(&memory) {
                return Err(AppError::Validation(format!(
                    "memory must be between {} and {} MB",
                    MEMORY_MB.start(),
                    MEMORY_MB.end()
                )));
            }
        }
        if let Some(timeout) = deployment.timeout {
            if !TIMEOUT_SECS.contains(&timeout) {
                return Err(AppError::Validation(format!(
                    "timeout must be between {} and {} seconds",
                    TIMEOUT_SECS.start(),
                    TIMEOUT_SECS.end()
                )));
            }
        }

        let mut keys = HashSet::new();
        for var in &deployment.env_vars {
            let key = var.key.trim();
            if key.is_empty() {
                return Err(AppError::Validation(
                    "Environment variable key cannot be empty".to_string(),
                ));
            }
            if !keys.insert(key) {
                return Err(AppError::Validation(format!(
                    "Duplicate environment variable: {}",
                    key
                )));
            }
        }

        Ok(runtime)
    }
}
