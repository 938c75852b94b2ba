use crate::error::{AppError, Result};
use crate::models::{ExecutionRecord, ExecutionStatus, ExecutionType};
use crate::services::{ExecutionLineage, ExecutionPage, ListParams, ParentState};
use crate::timeline::{CompareMode, NavigationIntent};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListExecutionsQuery {
    pub function_id: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub execution_type: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl TryFrom<ListExecutionsQuery> for ListParams {
    type Error = AppError;

    fn try_from(query: ListExecutionsQuery) -> Result<Self> {
        let status = query
            .status
            .as_deref()
            .map(str::parse::<ExecutionStatus>)
            .transpose()
            .map_err(AppError::Validation)?;
        let execution_type = query
            .execution_type
            .as_deref()
            .map(str::parse::<ExecutionType>)
            .transpose()
            .map_err(AppError::Validation)?;

        Ok(Self {
            function: query.function_id.filter(|name| !name.is_empty()),
            status,
            execution_type,
            page: query.page,
            limit: query.limit,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ExecutionsListResponse {
    pub data: Vec<ExecutionRecord>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl From<ExecutionPage> for ExecutionsListResponse {
    fn from(page: ExecutionPage) -> Self {
        Self {
            data: page.data,
            total: page.total,
            page: page.page,
            limit: page.limit,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionDetailResponse {
    /// The record itself sits at the top level; lineage keys are siblings.
    #[serde(flatten)]
    pub execution: ExecutionRecord,
    pub parent: Option<ExecutionRecord>,
    /// Parent id that does not resolve to a stored execution.
    pub missing_parent_id: Option<i64>,
    pub children: Vec<ExecutionRecord>,
    pub intents: Vec<IntentLink>,
}

/// A navigation intent together with the console route it resolves to.
#[derive(Debug, Serialize)]
pub struct IntentLink {
    #[serde(flatten)]
    pub intent: NavigationIntent,
    pub path: String,
}

impl From<NavigationIntent> for IntentLink {
    fn from(intent: NavigationIntent) -> Self {
        Self {
            path: intent.path(),
            intent,
        }
    }
}

impl From<ExecutionLineage> for ExecutionDetailResponse {
    fn from(lineage: ExecutionLineage) -> Self {
        let id = lineage.record.id;
        let mut intents = Vec::new();

        let (parent, missing_parent_id) = match lineage.parent {
            ParentState::Root => (None, None),
            ParentState::Found(parent) => {
                intents.push(NavigationIntent::ExecutionDetail { id: parent.id });
                (Some(parent), None)
            }
            ParentState::Missing(parent_id) => (None, Some(parent_id)),
        };

        for mode in [CompareMode::Replay, CompareMode::Shadow] {
            if lineage
                .children
                .iter()
                .any(|child| child.execution_type == mode.execution_type())
            {
                intents.push(NavigationIntent::Compare { id, mode });
            }
        }

        Self {
            execution: lineage.record,
            parent,
            missing_parent_id,
            children: lineage.children,
            intents: intents.into_iter().map(IntentLink::from).collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShadowRequest {
    pub target_worker: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompareQuery {
    pub mode: Option<String>,
}

impl CompareQuery {
    pub fn mode(&self) -> Result<CompareMode> {
        match self.mode.as_deref() {
            None => Ok(CompareMode::Replay),
            Some(raw) => raw.parse().map_err(AppError::Validation),
        }
    }
}
