use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// A single function invocation as recorded by the execution engine.
///
/// Records are immutable once stored. Replay and shadow runs are new records
/// pointing back at their origin through `parent_execution_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    pub id: i64,
    pub function: String,
    pub status: ExecutionStatus,
    #[serde(rename = "type")]
    pub execution_type: ExecutionType,
    pub parent_execution_id: Option<i64>,
    /// Milliseconds.
    pub duration: u64,
    pub timestamp: DateTime<Utc>,
    pub worker: String,
    pub lamport: i64,
    pub input: Map<String, Value>,
    pub output: Map<String, Value>,
    pub logs: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum ExecutionStatus {
    Pending = 0,
    Running = 1,
    Success = 2,
    Failed = 3,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }
}

impl FromStr for ExecutionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "RUNNING" => Ok(Self::Running),
            "SUCCESS" => Ok(Self::Success),
            "FAILED" => Ok(Self::Failed),
            other => Err(format!("Unknown execution status: {}", other)),
        }
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i32)]
pub enum ExecutionType {
    Normal = 0,
    Replay = 1,
    Shadow = 2,
}

impl ExecutionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Replay => "REPLAY",
            Self::Shadow => "SHADOW",
        }
    }
}

impl FromStr for ExecutionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NORMAL" => Ok(Self::Normal),
            "REPLAY" => Ok(Self::Replay),
            "SHADOW" => Ok(Self::Shadow),
            other => Err(format!("Unknown execution type: {}", other)),
        }
    }
}

impl fmt::Display for ExecutionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
