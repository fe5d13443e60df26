//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    state::{LoadedSnapshot, Settings, Snapshot},
    timer::TimerStatus,
};

/// API response structure for timer control endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerStatus,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerStatus) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Response for a timer that is counting down
    pub fn running(message: String, timer: TimerStatus) -> Self {
        Self::new("running".to_string(), message, timer)
    }

    /// Response for a timer that is stopped
    pub fn stopped(message: String, timer: TimerStatus) -> Self {
        Self::new("stopped".to_string(), message, timer)
    }

    /// Pick running/stopped from the status itself
    pub fn from_status(message: String, timer: TimerStatus) -> Self {
        if timer.running {
            Self::running(message, timer)
        } else {
            Self::stopped(message, timer)
        }
    }
}

/// Response for the settings endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub settings: Settings,
}

impl SettingsResponse {
    pub fn ok(message: String, settings: Settings) -> Self {
        Self {
            status: "ok".to_string(),
            message,
            timestamp: Utc::now(),
            settings,
        }
    }
}

/// Payload of the persistence endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotPayload {
    Saved(Snapshot),
    Loaded(LoadedSnapshot),
}

/// Response for save/load/clear
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub snapshot: Option<SnapshotPayload>,
}

impl DataResponse {
    pub fn ok(message: String, snapshot: SnapshotPayload) -> Self {
        Self {
            status: "ok".to_string(),
            message,
            timestamp: Utc::now(),
            snapshot: Some(snapshot),
        }
    }

    /// Soft failure, e.g. nothing usable in storage
    pub fn error(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message,
            timestamp: Utc::now(),
            snapshot: None,
        }
    }
}

/// Enhanced status response with server information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerStatus,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
