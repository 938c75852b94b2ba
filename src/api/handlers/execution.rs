use crate::api::dto::execution::{
    CompareQuery, ExecutionDetailResponse, ExecutionsListResponse, ListExecutionsQuery,
    ShadowRequest,
};
use crate::api::routes::AppState;
use crate::error::Result;
use crate::models::ExecutionRecord;
use crate::services::ListParams;
use crate::timeline::Comparison;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

pub async fn list_executions(
    State(state): State<AppState>,
    Query(query): Query<ListExecutionsQuery>,
) -> Result<Json<ExecutionsListResponse>> {
    let params = ListParams::try_from(query)?;
    let page = state.execution_service.list_executions(params).await?;
    Ok(Json(ExecutionsListResponse::from(page)))
}

pub async fn get_execution(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ExecutionDetailResponse>> {
    let lineage = state.execution_service.get_lineage(id).await?;
    Ok(Json(ExecutionDetailResponse::from(lineage)))
}

pub async fn replay_execution(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<(StatusCode, Json<ExecutionRecord>)> {
    let replay = state.execution_service.replay_execution(id).await?;
    Ok((StatusCode::CREATED, Json(replay)))
}

pub async fn shadow_execution(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    req: Option<Json<ShadowRequest>>,
) -> Result<(StatusCode, Json<ExecutionRecord>)> {
    let target_worker = req.and_then(|Json(req)| req.target_worker);
    let shadow = state
        .execution_service
        .shadow_execution(id, target_worker)
        .await?;
    Ok((StatusCode::CREATED, Json(shadow)))
}

pub async fn compare_execution(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(query): Query<CompareQuery>,
) -> Result<Json<Comparison>> {
    let comparison = state
        .execution_service
        .compare_execution(id, query.mode()?)
        .await?;
    Ok(Json(comparison))
}
