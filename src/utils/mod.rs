//! Utility functions module
//!
//! This module contains utility functions used throughout the application.

pub mod coerce;
pub mod signals;

// Re-export main functions
pub use coerce::{coerce_u32, coerce_u64};
pub use signals::shutdown_signal;
