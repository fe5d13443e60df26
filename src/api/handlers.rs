//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use serde_json::Value;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use crate::state::{AppState, SettingsPatch, StatePatch};
use super::responses::{
    ApiResponse, DataResponse, HealthResponse, SettingsResponse, SnapshotPayload, StatusResponse,
};

fn internal_error(context: &str, e: String) -> StatusCode {
    error!("{}: {}", context, e);
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Handle POST /start - Start or resume the countdown
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let timer = state.start().map_err(|e| internal_error("Failed to start timer", e))?;
    info!("Start endpoint called - {} phase, {}s left", timer.state.phase, timer.time);
    Ok(Json(ApiResponse::running("Timer started".to_string(), timer)))
}

/// Handle POST /stop - Pause the countdown, keeping phase and remaining time
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let timer = state.stop().map_err(|e| internal_error("Failed to stop timer", e))?;
    info!("Stop endpoint called - {}s left", timer.time);
    Ok(Json(ApiResponse::stopped("Timer stopped".to_string(), timer)))
}

/// Handle POST /reset - Back to the first work block, stopped
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let timer = state.reset().map_err(|e| internal_error("Failed to reset timer", e))?;
    info!("Reset endpoint called");
    Ok(Json(ApiResponse::stopped("Timer reset".to_string(), timer)))
}

/// Handle POST /restart-phase - Apply current settings to the running phase now
pub async fn restart_phase_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let timer = state
        .restart_phase()
        .map_err(|e| internal_error("Failed to restart phase", e))?;
    Ok(Json(ApiResponse::from_status(
        format!("Restarted {} phase", timer.state.phase),
        timer,
    )))
}

/// Handle GET /settings
pub async fn get_settings_handler(State(state): State<Arc<AppState>>) -> Result<Json<SettingsResponse>, StatusCode> {
    let settings = state
        .get_settings()
        .map_err(|e| internal_error("Failed to read settings", e))?;
    Ok(Json(SettingsResponse::ok("Current settings".to_string(), settings)))
}

/// Handle PUT /settings - Merge a partial, loosely-typed settings object
pub async fn update_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<SettingsResponse>, StatusCode> {
    let patch = SettingsPatch::from_json(&body).unwrap_or_else(|| {
        warn!("Settings update carried no usable field: {}", body);
        SettingsPatch::default()
    });
    let settings = state
        .update_settings(patch)
        .map_err(|e| internal_error("Failed to update settings", e))?;
    Ok(Json(SettingsResponse::ok(
        "Settings updated; they apply from the next phase".to_string(),
        settings,
    )))
}

/// Handle PUT /state - Merge a partial cycle/phase object
pub async fn update_state_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<Value>,
) -> Result<Json<ApiResponse>, StatusCode> {
    let patch = StatePatch::from_json(&body).unwrap_or_else(|| {
        warn!("State update carried no usable field: {}", body);
        StatePatch::default()
    });
    let timer = state
        .update_state(patch)
        .map_err(|e| internal_error("Failed to update state", e))?;
    Ok(Json(ApiResponse::from_status("State updated".to_string(), timer)))
}

/// Handle POST /data/save - Persist the snapshot
pub async fn save_handler(State(state): State<Arc<AppState>>) -> Result<Json<DataResponse>, StatusCode> {
    match state.save() {
        Ok(snapshot) => Ok(Json(DataResponse::ok(
            "Timer data saved".to_string(),
            SnapshotPayload::Saved(snapshot),
        ))),
        Err(e) => {
            error!("{}", e);
            Ok(Json(DataResponse::error(e)))
        }
    }
}

/// Handle POST /data/load - Restore the persisted snapshot
pub async fn load_handler(State(state): State<Arc<AppState>>) -> Result<Json<DataResponse>, StatusCode> {
    match state.load().map_err(|e| internal_error("Failed to load timer data", e))? {
        Some(loaded) => Ok(Json(DataResponse::ok(
            "Timer data loaded".to_string(),
            SnapshotPayload::Loaded(loaded),
        ))),
        None => Ok(Json(DataResponse::error(
            "No usable timer data in storage".to_string(),
        ))),
    }
}

/// Handle DELETE /data - Erase the persisted snapshot
pub async fn clear_handler(State(state): State<Arc<AppState>>) -> Result<Json<DataResponse>, StatusCode> {
    match state.clear() {
        Ok(snapshot) => Ok(Json(DataResponse::ok(
            "Timer data cleared".to_string(),
            SnapshotPayload::Saved(snapshot),
        ))),
        Err(e) => {
            error!("{}", e);
            Ok(Json(DataResponse::error(e)))
        }
    }
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = state
        .get_status()
        .map_err(|e| internal_error("Failed to get timer status", e))?;

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /events - Stream every timer event as Server-Sent Events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    info!("Event stream subscriber connected");
    let events_rx = state.events_tx.subscribe();

    let stream = stream::unfold(events_rx, |mut events_rx| async move {
        loop {
            match events_rx.recv().await {
                Ok(event) => {
                    let sse = Event::default()
                        .event(event.name())
                        .json_data(&event)
                        .unwrap_or_else(|e| {
                            warn!("Failed to encode {} event: {}", event.name(), e);
                            Event::default().event(event.name())
                        });
                    return Some((Ok::<_, Infallible>(sse), events_rx));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
