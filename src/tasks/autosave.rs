//! Periodic snapshot persistence

use std::{sync::Arc, time::Duration};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::state::AppState;

/// Background task that saves the timer snapshot every `period`, so a crash
/// loses at most one period of progress
pub async fn autosave_task(state: Arc<AppState>, period: Duration) {
    info!("Starting autosave task every {}s", period.as_secs());

    let mut interval = interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; nothing has changed yet.
    interval.tick().await;

    loop {
        interval.tick().await;

        match state.save() {
            Ok(snapshot) => debug!("Autosaved snapshot: {:?}", snapshot),
            Err(e) => warn!("Autosave failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state::Settings, storage::MemoryStorage};

    #[tokio::test(start_paused = true)]
    async fn saves_on_each_period() {
        let storage = MemoryStorage::new();
        let state = Arc::new(AppState::new(
            0,
            "127.0.0.1".to_string(),
            Settings::default(),
            Box::new(storage.clone()),
        ));

        let task = tokio::spawn(autosave_task(Arc::clone(&state), Duration::from_secs(30)));

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(storage.is_empty());

        tokio::time::sleep(Duration::from_secs(25)).await;
        assert_eq!(storage.get("time").as_deref(), Some("1500"));
        task.abort();
    }
}
