//! Pomodoro Timer - a countdown engine for the work/break/rest technique
//!
//! The library holds the timer itself (a one-second [`timer::Ticker`] driven by
//! a [`timer::PomodoroTimer`] state machine), its persistence, and the daemon
//! pieces that expose it to a UI over HTTP.

pub mod config;
pub mod error;
pub mod state;
pub mod storage;
pub mod timer;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::StorageError;
pub use state::{AppState, Phase, Settings, TimerState};
pub use timer::{PomodoroTimer, TimerEvents, Ticker};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
