//! Pomodoro state machine
//!
//! Turns ticker expiries into work/break/rest transitions, keeps the `{h, m, s}`
//! view of the remaining time in step with the ticker, persists itself through a
//! [`Storage`] backend and reports every substantive change through
//! [`TimerEvents`].
//!
//! ## Phase cycle
//!
//! ```text
//! Work --(cycle += 1)--> Break | Rest --> Work
//! ```
//!
//! The off-phase is a Rest when the new cycle is a positive multiple of
//! `rest_periodicity`, otherwise a Break.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::{
    events::TimerEvents,
    ticker::{Tick, Ticker},
};
use crate::{
    error::StorageError,
    state::{
        DetailedTime, LoadedSnapshot, Settings, SettingsPatch, Snapshot, StatePatch, TimerState,
        SETTINGS_KEY, STATE_KEY, TIME_KEY,
    },
    storage::Storage,
    utils::coerce_u64,
};

/// Everything a UI needs to render the timer in one go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerStatus {
    pub running: bool,
    /// Stopped partway through a phase, as opposed to stopped at its full length
    pub paused: bool,
    pub time: u64,
    pub detailed_time: DetailedTime,
    pub state: TimerState,
    pub settings: Settings,
}

pub struct PomodoroTimer<S: Storage> {
    settings: Settings,
    state: TimerState,
    detailed_time: DetailedTime,
    ticker: Ticker,
    storage: S,
    events: TimerEvents,
}

impl<S: Storage> PomodoroTimer<S> {
    /// New stopped timer at cycle 0, at the start of a work phase.
    pub fn new(settings: Settings, storage: S, events: TimerEvents) -> Self {
        let time = settings.phase_seconds(TimerState::default().phase);
        Self {
            settings,
            state: TimerState::default(),
            detailed_time: DetailedTime::from_seconds(time),
            ticker: Ticker::new(time),
            storage,
            events,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Merge `patch` into the settings.
    ///
    /// The running countdown keeps its length; the new durations take effect at
    /// the next phase switch, or immediately through [`Self::restart_phase`].
    pub fn set_settings(&mut self, patch: SettingsPatch) -> Settings {
        self.settings = patch.apply(&self.settings);
        debug!("Settings updated: {:?}", self.settings);
        self.settings
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn set_state(&mut self, patch: StatePatch) -> TimerState {
        let previous = self.state;
        self.state = patch.apply(&previous);
        if self.state.cycle != previous.cycle {
            self.events.cycle_change(self.state.cycle);
        }
        if self.state.phase != previous.phase {
            self.events.phase_change(self.state.phase);
        }
        self.state
    }

    /// Remaining seconds in the current phase
    pub fn time(&self) -> u64 {
        self.ticker.time()
    }

    pub fn set_time(&mut self, seconds: u64) {
        self.ticker.set_time(seconds);
        self.detailed_time = DetailedTime::from_seconds(seconds);
        self.events.tick(seconds);
        self.emit_detailed_time();
    }

    pub fn detailed_time(&self) -> &DetailedTime {
        &self.detailed_time
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_running()
    }

    /// When the next tick is due, if the countdown is running
    pub fn next_deadline(&self) -> Option<Instant> {
        self.ticker.next_deadline()
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Start (or restart) counting down from `now`.
    ///
    /// Emits the full current picture first so a fresh subscriber can render
    /// without waiting for the first tick.
    pub fn start_at(&mut self, now: Instant) {
        self.events.cycle_change(self.state.cycle);
        self.events.phase_change(self.state.phase);
        self.emit_detailed_time();
        self.ticker.start_at(now);
        info!(
            "Timer started: cycle {} {} with {}s left",
            self.state.cycle,
            self.state.phase,
            self.time()
        );
    }

    /// Pause the countdown. Cycle, phase and remaining time are kept.
    pub fn stop(&mut self) {
        if !self.ticker.is_running() {
            return;
        }
        self.ticker.stop();
        info!("Timer stopped with {}s left", self.time());
        self.events.stop();
    }

    /// Back to cycle 0, work phase, full work duration. Leaves the timer stopped.
    pub fn reset(&mut self) {
        self.stop();
        self.state = TimerState::default();
        self.events.cycle_change(self.state.cycle);
        self.events.phase_change(self.state.phase);
        self.set_time(self.settings.phase_seconds(self.state.phase));
        info!("Timer reset");
    }

    /// Restart the current phase at its full length under the current settings.
    pub fn restart_phase(&mut self) {
        let time = self.settings.phase_seconds(self.state.phase);
        self.set_time(time);
        info!("Restarted {} phase with {}s", self.state.phase, time);
    }

    /// Handle every tick that is due at `now`. Returns how many were handled.
    pub fn poll(&mut self, now: Instant) -> usize {
        let mut handled = 0;
        while let Some(tick) = self.ticker.poll(now) {
            handled += 1;
            match tick {
                Tick::Remaining(remaining) => self.handle_tick(remaining),
                Tick::Expired { at } => self.switch_phase(at),
            }
        }
        if handled > 1 {
            debug!("Caught up {} ticks", handled);
        }
        handled
    }

    fn handle_tick(&mut self, remaining: u64) {
        let changes = self.detailed_time.count_down();
        if self.detailed_time.as_seconds() != remaining {
            warn!(
                "Detailed time drifted from ticker ({}s vs {}s), resyncing",
                self.detailed_time.as_seconds(),
                remaining
            );
            self.detailed_time = DetailedTime::from_seconds(remaining);
            self.events.tick(remaining);
            self.emit_detailed_time();
            return;
        }

        self.events.tick(remaining);
        if changes.hours {
            self.events.hours_change(self.detailed_time.hours);
        }
        if changes.minutes {
            self.events.minutes_change(self.detailed_time.minutes);
        }
        if changes.seconds {
            self.events.seconds_change(self.detailed_time.seconds);
        }
    }

    fn switch_phase(&mut self, at: Instant) {
        let previous = self.state;
        self.state = previous.advance(self.settings.rest_periodicity);
        let time = self.settings.phase_seconds(self.state.phase);

        self.ticker.set_time(time);
        self.detailed_time = DetailedTime::from_seconds(time);
        info!(
            "Phase switch: {} -> {} (cycle {}, {}s)",
            previous.phase, self.state.phase, self.state.cycle, time
        );

        self.events.phase_started(self.state.phase);
        if self.state.cycle != previous.cycle {
            self.events.cycle_change(self.state.cycle);
        }
        self.events.phase_change(self.state.phase);
        self.events.tick(time);
        self.emit_detailed_time();

        self.ticker.start_at(at);
    }

    fn emit_detailed_time(&mut self) {
        let DetailedTime {
            hours,
            minutes,
            seconds,
        } = self.detailed_time;
        self.events.hours_change(hours);
        self.events.minutes_change(minutes);
        self.events.seconds_change(seconds);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            time: self.time(),
            state: self.state,
            settings: self.settings,
        }
    }

    pub fn status(&self) -> TimerStatus {
        let running = self.is_running();
        TimerStatus {
            running,
            paused: !running && self.time() < self.settings.phase_seconds(self.state.phase),
            time: self.time(),
            detailed_time: self.detailed_time,
            state: self.state,
            settings: self.settings,
        }
    }

    /// Write time, state and settings as three records in one batch.
    pub fn save_data(&mut self) -> Result<Snapshot, StorageError> {
        let snapshot = self.snapshot();
        self.storage.save_all(&[
            (TIME_KEY, serde_json::to_string(&snapshot.time)?),
            (STATE_KEY, serde_json::to_string(&snapshot.state)?),
            (SETTINGS_KEY, serde_json::to_string(&snapshot.settings)?),
        ])?;
        debug!("Saved snapshot: {:?}", snapshot);
        self.events.save(&snapshot);
        Ok(snapshot)
    }

    /// Restore whatever usable records storage holds.
    ///
    /// Each record is parsed on its own; an absent or malformed one is reported
    /// as `None` and leaves that part of the timer untouched. Returns `None`
    /// without touching anything or emitting when no record was usable.
    pub fn load_data(&mut self) -> Option<LoadedSnapshot> {
        let time = self.read_record(TIME_KEY, coerce_u64);
        let state = self.read_record(STATE_KEY, StatePatch::from_json);
        let settings = self.read_record(SETTINGS_KEY, SettingsPatch::from_json);

        if time.is_none() && state.is_none() && settings.is_none() {
            warn!("No usable timer data in storage");
            return None;
        }

        let loaded = LoadedSnapshot {
            settings: settings.map(|patch| self.set_settings(patch)),
            state: state.map(|patch| self.set_state(patch)),
            time: time.map(|seconds| {
                self.set_time(seconds);
                seconds
            }),
        };
        info!("Loaded timer data: {:?}", loaded);
        self.events.load(&loaded);
        Some(loaded)
    }

    /// Erase the stored records. Returns the in-memory snapshot as it was.
    pub fn clear_data(&mut self) -> Result<Snapshot, StorageError> {
        let snapshot = self.snapshot();
        self.storage.clear()?;
        info!("Cleared stored timer data");
        self.events.clear(&snapshot);
        Ok(snapshot)
    }

    fn read_record<T>(&self, key: &str, parse: impl FnOnce(&Value) -> Option<T>) -> Option<T> {
        let raw = match self.storage.load(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read '{}' from storage: {}", key, e);
                return None;
            }
        };
        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Stored '{}' is not valid JSON: {}", key, e);
                return None;
            }
        };
        let parsed = parse(&value);
        if parsed.is_none() {
            warn!("Stored '{}' holds no usable value: {}", key, raw);
        }
        parsed
    }
}
