//! HTTP API module
//!
//! The control and event-stream surface a UI uses to drive the timer.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/start", post(start_handler))
        .route("/stop", post(stop_handler))
        .route("/reset", post(reset_handler))
        .route("/restart-phase", post(restart_phase_handler))
        .route("/settings", get(get_settings_handler).put(update_settings_handler))
        .route("/state", put(update_state_handler))
        .route("/data/save", post(save_handler))
        .route("/data/load", post(load_handler))
        .route("/data", delete(clear_handler))
        .route("/status", get(status_handler))
        .route("/events", get(events_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
