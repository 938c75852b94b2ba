use axum::{Router, http::Method};
use tower_http::cors::{Any, CorsLayer};

/// The console is served from its own origin, so the API accepts any.
pub fn add_cors(router: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any);

    router.layer(cors)
}
