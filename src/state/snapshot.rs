//! Persisted `{time, state, settings}` triple

use serde::{Deserialize, Serialize};

use super::{Settings, TimerState};

pub const TIME_KEY: &str = "time";
pub const STATE_KEY: &str = "state";
pub const SETTINGS_KEY: &str = "settings";

/// Complete in-memory snapshot, as written by a save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time: u64,
    pub state: TimerState,
    pub settings: Settings,
}

/// Outcome of a load. Records that were absent or malformed are `None`
/// (serialized as `null`); present ones hold the values after merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadedSnapshot {
    pub time: Option<u64>,
    pub state: Option<TimerState>,
    pub settings: Option<Settings>,
}
