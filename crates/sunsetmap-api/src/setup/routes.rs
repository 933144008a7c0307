use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::sunsets;
use crate::state::AppState;

/// Multipart framing overhead allowed on top of the object size cap.
const BODY_LIMIT_SLACK: usize = 1024 * 1024;

pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.upload_max_bytes as usize + BODY_LIMIT_SLACK;
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(sunsets::health))
        .route(
            "/api/sunsets",
            get(sunsets::list_sunsets).post(sunsets::submit_sunset),
        )
        .route("/api/sunsets/{id}", get(sunsets::get_sunset_image))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        layer.allow_origin(AllowOrigin::list(parsed))
    }
}
