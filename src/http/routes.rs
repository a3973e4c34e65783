use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Widget controls
        .route("/access", post(handlers::request_access))
        .route("/start", post(handlers::start_recording))
        .route("/pause", post(handlers::pause_recording))
        .route("/resume", post(handlers::resume_recording))
        .route("/stop", post(handlers::stop_recording))
        // Widget queries
        .route("/view", get(handlers::get_view))
        .route("/stats", get(handlers::get_stats))
        .route("/recordings/:id", get(handlers::get_recording))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
