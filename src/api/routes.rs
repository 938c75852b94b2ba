use super::handlers::{execution, function, health, timeline};
use super::middleware::cors::add_cors;
use crate::services::{ExecutionService, FunctionService, TimelineService};
use axum::{
    Router,
    routing::{get, post},
};

#[derive(Clone)]
pub struct AppState {
    pub function_service: FunctionService,
    pub execution_service: ExecutionService,
    pub timeline_service: TimelineService,
}

pub fn create_router(
    function_service: FunctionService,
    execution_service: ExecutionService,
    timeline_service: TimelineService,
) -> Router {
    let state = AppState {
        function_service,
        execution_service,
        timeline_service,
    };

    let api_routes = Router::new()
        .route("/health", get(health::health_check))
        // Function registry
        .route(
            "/api/functions",
            get(function::list_functions).post(function::deploy_function),
        )
        .route(
            "/api/functions/{id}",
            get(function::get_function).delete(function::delete_function),
        )
        // Execution records
        .route("/api/executions", get(execution::list_executions))
        .route("/api/executions/{id}", get(execution::get_execution))
        .route("/api/executions/{id}/replay", post(execution::replay_execution))
        .route("/api/executions/{id}/shadow", post(execution::shadow_execution))
        .route("/api/executions/{id}/compare", get(execution::compare_execution))
        // Timeline
        .route("/api/timeline", get(timeline::get_timeline))
        .route("/api/stats", get(timeline::get_stats))
        .with_state(state);

    add_cors(api_routes)
}
