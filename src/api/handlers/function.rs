use crate::api::dto::function::{DeployRequest, DeployResponse, FunctionResponse};
use crate::api::routes::AppState;
use crate::error::Result;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

pub async fn list_functions(State(state): State<AppState>) -> Result<Json<Vec<FunctionResponse>>> {
    let functions = state.function_service.list_functions().await?;
    Ok(Json(
        functions.into_iter().map(FunctionResponse::from).collect(),
    ))
}

pub async fn get_function(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FunctionResponse>> {
    let function = state.function_service.get_function(&id).await?;
    Ok(Json(FunctionResponse::from(function)))
}

pub async fn deploy_function(
    State(state): State<AppState>,
    Json(req): Json<DeployRequest>,
) -> Result<(StatusCode, Json<DeployResponse>)> {
    let function = state.function_service.deploy_function(req.into()).await?;
    Ok((StatusCode::CREATED, Json(DeployResponse::from(function))))
}

pub async fn delete_function(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    state.function_service.delete_function(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
