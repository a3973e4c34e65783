//! HTTP control surface for a local host page
//!
//! This module exposes the widget over a small REST API:
//! - POST /access, /start, /pause, /resume, /stop - Press a button
//! - GET /view - Current view model
//! - GET /stats - Session statistics
//! - GET /recordings/:id - Download the recorded artifact
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::ErrorResponse;
pub use routes::create_router;
pub use state::AppState;
