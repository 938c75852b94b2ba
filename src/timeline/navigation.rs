use crate::models::ExecutionType;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CompareMode {
    Replay,
    Shadow,
}

impl CompareMode {
    pub fn execution_type(&self) -> ExecutionType {
        match self {
            Self::Replay => ExecutionType::Replay,
            Self::Shadow => ExecutionType::Shadow,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Replay => "replay",
            Self::Shadow => "shadow",
        }
    }
}

impl FromStr for CompareMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replay" => Ok(Self::Replay),
            "shadow" => Ok(Self::Shadow),
            other => Err(format!("Unknown compare mode: {}", other)),
        }
    }
}

/// Where a click on an execution should take the console, carried with the
/// data instead of being parked in shared client state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "page", rename_all = "camelCase")]
pub enum NavigationIntent {
    ExecutionDetail { id: i64 },
    Compare { id: i64, mode: CompareMode },
}

impl NavigationIntent {
    pub fn path(&self) -> String {
        match self {
            Self::ExecutionDetail { id } => format!("/execution/{}", id),
            Self::Compare { id, mode } => format!("/compare/{}?mode={}", id, mode.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intents_render_console_paths() {
        assert_eq!(
            NavigationIntent::ExecutionDetail { id: 1003 }.path(),
            "/execution/1003"
        );
        assert_eq!(
            NavigationIntent::Compare {
                id: 1005,
                mode: CompareMode::Shadow
            }
            .path(),
            "/compare/1005?mode=shadow"
        );
    }

    #[test]
    fn intent_serializes_with_page_tag() {
        let value = serde_json::to_value(NavigationIntent::Compare {
            id: 7,
            mode: CompareMode::Replay,
        })
        .unwrap();
        assert_eq!(value["page"], "compare");
        assert_eq!(value["mode"], "replay");
    }
}
