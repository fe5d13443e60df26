//! State management module
//!
//! Value types owned by the Pomodoro timer, plus the shared application state
//! the daemon hands to its tasks and HTTP handlers.

pub mod app_state;
pub mod detailed_time;
pub mod settings;
pub mod snapshot;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, SharedTimer};
pub use detailed_time::{DetailedTime, UnitChanges};
pub use settings::{Settings, SettingsPatch};
pub use snapshot::{LoadedSnapshot, Snapshot, SETTINGS_KEY, STATE_KEY, TIME_KEY};
pub use timer_state::{is_rest_due, Phase, StatePatch, TimerState, MAX_CYCLE};
