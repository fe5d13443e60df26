//! External collaborators module
//!
//! This module contains the side effects the timer itself never performs,
//! such as announcing phase changes to the user.

pub mod notifier;

// Re-export main functions
pub use notifier::{execute_notify_command, notifier_task, phase_message};
