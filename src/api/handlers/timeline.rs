use crate::api::dto::timeline::{StatsQuery, TimelineQuery};
use crate::api::routes::AppState;
use crate::error::Result;
use crate::services::{DashboardStats, TimelineView};
use axum::{
    Json,
    extract::{Query, State},
};

pub async fn get_timeline(
    State(state): State<AppState>,
    Query(query): Query<TimelineQuery>,
) -> Result<Json<TimelineView>> {
    let view = state
        .timeline_service
        .timeline(query.range()?, query.type_filter()?, query.now()?)
        .await?;
    Ok(Json(view))
}

pub async fn get_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<DashboardStats>> {
    let stats = state.timeline_service.dashboard(query.now()?).await?;
    Ok(Json(stats))
}
