//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, Notify};
use tracing::{debug, info};

use super::{LoadedSnapshot, Settings, SettingsPatch, Snapshot, StatePatch};
use crate::{
    storage::Storage,
    timer::{PomodoroTimer, TimerEvent, TimerEvents, TimerStatus},
};

/// The timer as held by the daemon: storage is chosen at startup
pub type SharedTimer = PomodoroTimer<Box<dyn Storage + Send>>;

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Main application state shared by the countdown task, the HTTP handlers and
/// the shutdown path
pub struct AppState {
    /// The one Pomodoro timer
    pub timer: Arc<Mutex<SharedTimer>>,
    /// Woken whenever start/stop/reset/load change the countdown schedule
    pub schedule_changed: Notify,
    /// Every timer event, for the SSE stream and the notifier
    pub events_tx: broadcast::Sender<TimerEvent>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Create the state and a stopped timer wired to the event channel
    pub fn new(port: u16, host: String, settings: Settings, storage: Box<dyn Storage + Send>) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let events = TimerEvents::broadcasting(events_tx.clone());

        Self {
            timer: Arc::new(Mutex::new(PomodoroTimer::new(settings, storage, events))),
            schedule_changed: Notify::new(),
            events_tx,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Run `f` against the locked timer, record it as the last action, and wake
    /// the countdown task in case the schedule moved
    pub fn with_timer<T, F>(&self, action: &str, f: F) -> Result<T, String>
    where
        F: FnOnce(&mut SharedTimer) -> T,
    {
        let mut timer = self.timer.lock()
            .map_err(|e| format!("Failed to lock timer: {}", e))?;

        let result = f(&mut *timer);
        drop(timer); // Release the lock early

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        self.schedule_changed.notify_one();
        Ok(result)
    }

    /// Read-only access that is not recorded as an action
    pub fn inspect_timer<T, F>(&self, f: F) -> Result<T, String>
    where
        F: FnOnce(&SharedTimer) -> T,
    {
        self.timer.lock()
            .map(|timer| f(&*timer))
            .map_err(|e| format!("Failed to lock timer: {}", e))
    }

    pub fn start(&self) -> Result<TimerStatus, String> {
        self.with_timer("start", |timer| {
            timer.start();
            timer.status()
        })
    }

    pub fn stop(&self) -> Result<TimerStatus, String> {
        self.with_timer("stop", |timer| {
            timer.stop();
            timer.status()
        })
    }

    pub fn reset(&self) -> Result<TimerStatus, String> {
        self.with_timer("reset", |timer| {
            timer.reset();
            timer.status()
        })
    }

    pub fn restart_phase(&self) -> Result<TimerStatus, String> {
        self.with_timer("restart-phase", |timer| {
            timer.restart_phase();
            timer.status()
        })
    }

    pub fn update_settings(&self, patch: SettingsPatch) -> Result<Settings, String> {
        info!("Updating settings: {:?}", patch);
        self.with_timer("settings", |timer| timer.set_settings(patch))
    }

    pub fn update_state(&self, patch: StatePatch) -> Result<TimerStatus, String> {
        info!("Updating timer state: {:?}", patch);
        self.with_timer("state", |timer| {
            timer.set_state(patch);
            timer.status()
        })
    }

    /// Persist the snapshot. Storage failures come back as the error string.
    pub fn save(&self) -> Result<Snapshot, String> {
        self.with_timer("save", |timer| timer.save_data())?
            .map_err(|e| format!("Failed to save timer data: {}", e))
    }

    /// `Ok(None)` when storage held nothing usable
    pub fn load(&self) -> Result<Option<LoadedSnapshot>, String> {
        self.with_timer("load", |timer| timer.load_data())
    }

    pub fn clear(&self) -> Result<Snapshot, String> {
        self.with_timer("clear", |timer| timer.clear_data())?
            .map_err(|e| format!("Failed to clear timer data: {}", e))
    }

    /// Get current timer status
    pub fn get_status(&self) -> Result<TimerStatus, String> {
        self.inspect_timer(|timer| timer.status())
    }

    pub fn get_settings(&self) -> Result<Settings, String> {
        self.inspect_timer(|timer| *timer.settings())
    }

    /// Handle due ticks. Called by the countdown task only, so not recorded as an action.
    pub fn poll_timer(&self, now: tokio::time::Instant) -> Result<usize, String> {
        let handled = self.timer.lock()
            .map(|mut timer| timer.poll(now))
            .map_err(|e| format!("Failed to lock timer: {}", e))?;
        if handled == 0 {
            debug!("Countdown task woke up with no tick due");
        }
        Ok(handled)
    }

    pub fn next_deadline(&self) -> Result<Option<tokio::time::Instant>, String> {
        self.inspect_timer(|timer| timer.next_deadline())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
