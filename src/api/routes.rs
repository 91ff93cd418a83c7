//! Router construction

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api::handlers;
use crate::AppState;

/// Build the studio router
pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.settings.limits.max_upload_body_bytes();

    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/options", get(handlers::options))
        .route("/api/studio", get(handlers::get_studio))
        .route(
            "/api/studio/images/:slot",
            put(handlers::put_image).get(handlers::get_image),
        )
        .route("/api/studio/prompt", put(handlers::put_prompt))
        .route("/api/studio/settings", put(handlers::put_settings))
        .route("/api/studio/generate", post(handlers::generate))
        .route("/api/studio/reset", post(handlers::reset))
        .route("/api/studio/zoom", post(handlers::zoom))
        .route("/api/studio/result", get(handlers::result))
        .route("/api/studio/download", post(handlers::download))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
