use crate::models::{EnvVar, FunctionDef};
use crate::services::Deployment;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub id: String,
    pub name: String,
    pub runtime: String,
    pub current_version: String,
    pub executions_24h: i64,
    pub failures_24h: i64,
    pub active: bool,
}

impl From<FunctionDef> for FunctionResponse {
    fn from(function: FunctionDef) -> Self {
        Self {
            id: function.id,
            name: function.name,
            runtime: function.runtime,
            current_version: function.current_version,
            executions_24h: function.executions_24h,
            failures_24h: function.failures_24h,
            active: function.active,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    pub name: String,
    pub runtime: String,
    pub code: String,
    pub env_vars: Option<Vec<EnvVar>>,
    pub memory: Option<i64>,
    pub timeout: Option<i64>,
}

impl From<DeployRequest> for Deployment {
    fn from(req: DeployRequest) -> Self {
        Self {
            name: req.name,
            runtime: req.runtime,
            code: req.code,
            env_vars: req.env_vars.unwrap_or_default(),
            memory: req.memory,
            timeout: req.timeout,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployResponse {
    pub id: String,
    pub name: String,
    pub version: String,
    pub url: String,
    pub deployed_at: String,
}

impl From<FunctionDef> for DeployResponse {
    fn from(function: FunctionDef) -> Self {
        Self {
            url: format!("/invoke/{}", function.name),
            id: function.id,
            name: function.name,
            version: function.current_version,
            deployed_at: function.created_at.to_rfc3339(),
        }
    }
}
