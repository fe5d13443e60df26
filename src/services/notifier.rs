//! Phase-change notifications
//!
//! The timer never plays sounds or shows popups itself; it only signals when
//! work, a break or a rest begins. This collaborator turns those signals into a
//! log line and, optionally, a user-supplied shell command (play a sound, send a
//! desktop notification, ...).

use std::sync::Arc;
use tokio::{process::Command, sync::broadcast::error::RecvError};
use tracing::{debug, error, info, warn};

use crate::{
    state::{AppState, Phase},
    timer::TimerEvent,
};

/// Message shown when `phase` begins
pub fn phase_message(phase: Phase) -> &'static str {
    match phase {
        Phase::Work => "Break is over, back to work",
        Phase::Break => "Work block done, take a short break",
        Phase::Rest => "Well earned: time for a long rest",
    }
}

fn started_phase(event: &TimerEvent) -> Option<Phase> {
    match event {
        TimerEvent::Work => Some(Phase::Work),
        TimerEvent::Break => Some(Phase::Break),
        TimerEvent::Rest => Some(Phase::Rest),
        _ => None,
    }
}

/// Run the notification command through `sh -c` with the phase exported as
/// `POMODORO_PHASE` and the message as `POMODORO_MESSAGE`
pub async fn execute_notify_command(command: &str, phase: Phase) -> Result<(), String> {
    debug!("Running notify command for {} phase: {}", phase, command);

    let output = Command::new("sh")
        .args(["-c", command])
        .env("POMODORO_PHASE", phase.as_str())
        .env("POMODORO_MESSAGE", phase_message(phase))
        .output()
        .await
        .map_err(|e| format!("Failed to execute notify command: {}", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!("Notify command failed ({}): {}", output.status, stderr.trim()));
    }

    Ok(())
}

/// Background task that announces each new phase
pub async fn notifier_task(state: Arc<AppState>, command: Option<String>) {
    info!("Starting notifier task");

    let mut events_rx = state.events_tx.subscribe();

    loop {
        let event = match events_rx.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                warn!("Notifier lagged behind, skipped {} events", skipped);
                continue;
            }
            Err(RecvError::Closed) => {
                info!("Event channel closed, stopping notifier");
                break;
            }
        };

        let Some(phase) = started_phase(&event) else {
            continue;
        };

        info!("Notify: {}", phase_message(phase));

        if let Some(command) = command.as_deref() {
            if let Err(e) = execute_notify_command(command, phase).await {
                error!("{}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_phase_starts_are_announced() {
        assert_eq!(started_phase(&TimerEvent::Rest), Some(Phase::Rest));
        assert_eq!(started_phase(&TimerEvent::Work), Some(Phase::Work));
        assert_eq!(started_phase(&TimerEvent::Tick(3)), None);
        assert_eq!(started_phase(&TimerEvent::PhaseChange(Phase::Break)), None);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn command_sees_phase_environment() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("phase.txt");
        let command = format!("printf %s \"$POMODORO_PHASE\" > {}", out.display());

        execute_notify_command(&command, Phase::Break).await.unwrap();
        assert_eq!(std::fs::read_to_string(&out).unwrap(), "break");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_command_is_reported() {
        let result = execute_notify_command("exit 3", Phase::Work).await;
        assert!(result.unwrap_err().contains("Notify command failed"));
    }
}
