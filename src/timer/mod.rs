//! Countdown engine
//!
//! [`Ticker`] counts seconds down; [`PomodoroTimer`] owns one and turns its
//! expiries into work/break/rest transitions.

pub mod events;
pub mod pomodoro;
pub mod ticker;

pub use events::{TimerEvent, TimerEvents};
pub use pomodoro::{PomodoroTimer, TimerStatus};
pub use ticker::{Tick, Ticker, TickerCallbacks};
