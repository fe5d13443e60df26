//! Countdown driver background task

use std::{sync::Arc, time::Duration};
use tokio::time::{sleep, sleep_until, Instant};
use tracing::{debug, error, info};

use crate::state::AppState;

/// Background task that feeds wall-clock time into the timer.
///
/// Sleeps until the next tick is due, or until an action changes the schedule,
/// then lets the timer handle whatever ticks have come due.
pub async fn countdown_task(state: Arc<AppState>) {
    info!("Starting countdown task");

    loop {
        let deadline = match state.next_deadline() {
            Ok(deadline) => deadline,
            Err(e) => {
                error!("Failed to read countdown deadline: {}", e);
                sleep(Duration::from_secs(1)).await;
                continue;
            }
        };

        match deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = sleep_until(deadline) => {
                        if let Err(e) = state.poll_timer(Instant::now()) {
                            error!("Failed to advance timer: {}", e);
                        }
                    }
                    _ = state.schedule_changed.notified() => {
                        debug!("Countdown schedule changed while waiting for tick");
                    }
                }
            }
            None => {
                debug!("Countdown idle, waiting for start");
                state.schedule_changed.notified().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        state::{Phase, Settings},
        storage::MemoryStorage,
    };

    #[tokio::test(start_paused = true)]
    async fn drives_ticks_and_phase_switches() {
        let state = Arc::new(AppState::new(
            0,
            "127.0.0.1".to_string(),
            Settings::new(1, 1, 1, 2),
            Box::new(MemoryStorage::new()),
        ));
        state
            .with_timer("test", |timer| {
                timer.set_time(3);
                timer.start();
            })
            .unwrap();

        let task = tokio::spawn(countdown_task(Arc::clone(&state)));

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert_eq!(state.get_status().unwrap().time, 1);

        tokio::time::sleep(Duration::from_secs(1)).await;
        let status = state.get_status().unwrap();
        assert_eq!(status.state.phase, Phase::Break);
        assert_eq!(status.state.cycle, 1);
        assert_eq!(status.time, 60);

        state.stop().unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(state.get_status().unwrap().time, 60);
        task.abort();
    }
}
