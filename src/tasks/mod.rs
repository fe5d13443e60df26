//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod autosave;
pub mod countdown;

// Re-export main functions
pub use autosave::autosave_task;
pub use countdown::countdown_task;
