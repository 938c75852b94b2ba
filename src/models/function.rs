use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FunctionDef {
    pub id: String,
    pub name: String,
    pub runtime: String,
    pub current_version: String,
    pub executions_24h: i64,
    pub failures_24h: i64,
    pub active: bool,
    pub code: String,
    pub env_vars: Option<String>,
    pub memory: Option<i64>,
    pub timeout: Option<i64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Runtime {
    Node20,
    Python312,
    Go121,
}

impl Runtime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node20 => "node20",
            Self::Python312 => "python312",
            Self::Go121 => "go121",
        }
    }
}

impl FromStr for Runtime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node20" => Ok(Self::Node20),
            "python312" => Ok(Self::Python312),
            "go121" => Ok(Self::Go121),
            other => Err(format!("Unsupported runtime: {}", other)),
        }
    }
}

impl fmt::Display for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnvVar {
    pub key: String,
    pub value: String,
}
