//! Event callbacks exposed by the Pomodoro timer
//!
//! Every hook is optional; an unset hook is skipped silently. UIs either
//! register closures directly or use [`TimerEvents::broadcasting`] to receive
//! every event as a serializable [`TimerEvent`] on a tokio broadcast channel.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::state::{LoadedSnapshot, Phase, Snapshot};

type Hook<T> = Option<Box<dyn FnMut(T) + Send>>;
type SnapshotHook<T> = Option<Box<dyn FnMut(&T) + Send>>;
type Signal = Option<Box<dyn FnMut() + Send>>;

#[derive(Default)]
pub struct TimerEvents {
    on_tick: Hook<u64>,
    on_seconds_change: Hook<u64>,
    on_minutes_change: Hook<u64>,
    on_hours_change: Hook<u64>,
    on_cycle_change: Hook<u32>,
    on_phase_change: Hook<Phase>,
    on_work: Signal,
    on_break: Signal,
    on_rest: Signal,
    on_save: SnapshotHook<Snapshot>,
    on_load: SnapshotHook<LoadedSnapshot>,
    on_clear: SnapshotHook<Snapshot>,
    on_stop: Signal,
}

macro_rules! hook_setter {
    ($name:ident, $arg:ty) => {
        pub fn $name(mut self, f: impl FnMut($arg) + Send + 'static) -> Self {
            self.$name = Some(Box::new(f));
            self
        }
    };
    ($name:ident) => {
        pub fn $name(mut self, f: impl FnMut() + Send + 'static) -> Self {
            self.$name = Some(Box::new(f));
            self
        }
    };
}

macro_rules! snapshot_setter {
    ($name:ident, $arg:ty) => {
        pub fn $name(mut self, f: impl FnMut(&$arg) + Send + 'static) -> Self {
            self.$name = Some(Box::new(f));
            self
        }
    };
}

impl TimerEvents {
    pub fn new() -> Self {
        Self::default()
    }

    hook_setter!(on_tick, u64);
    hook_setter!(on_seconds_change, u64);
    hook_setter!(on_minutes_change, u64);
    hook_setter!(on_hours_change, u64);
    hook_setter!(on_cycle_change, u32);
    hook_setter!(on_phase_change, Phase);
    hook_setter!(on_work);
    hook_setter!(on_break);
    hook_setter!(on_rest);
    snapshot_setter!(on_save, Snapshot);
    snapshot_setter!(on_load, LoadedSnapshot);
    snapshot_setter!(on_clear, Snapshot);
    hook_setter!(on_stop);

    /// Forward every event into `tx`. Send errors (no subscribers) are ignored.
    pub fn broadcasting(tx: broadcast::Sender<TimerEvent>) -> Self {
        let send = move |event: TimerEvent| {
            let _ = tx.send(event);
        };
        let s = send.clone();
        let events = Self::new().on_tick(move |t| s(TimerEvent::Tick(t)));
        let s = send.clone();
        let events = events.on_seconds_change(move |v| s(TimerEvent::SecondsChange(v)));
        let s = send.clone();
        let events = events.on_minutes_change(move |v| s(TimerEvent::MinutesChange(v)));
        let s = send.clone();
        let events = events.on_hours_change(move |v| s(TimerEvent::HoursChange(v)));
        let s = send.clone();
        let events = events.on_cycle_change(move |c| s(TimerEvent::CycleChange(c)));
        let s = send.clone();
        let events = events.on_phase_change(move |p| s(TimerEvent::PhaseChange(p)));
        let s = send.clone();
        let events = events.on_work(move || s(TimerEvent::Work));
        let s = send.clone();
        let events = events.on_break(move || s(TimerEvent::Break));
        let s = send.clone();
        let events = events.on_rest(move || s(TimerEvent::Rest));
        let s = send.clone();
        let events = events.on_save(move |snap| s(TimerEvent::Save(*snap)));
        let s = send.clone();
        let events = events.on_load(move |snap| s(TimerEvent::Load(*snap)));
        let s = send.clone();
        let events = events.on_clear(move |snap| s(TimerEvent::Clear(*snap)));
        events.on_stop(move || send(TimerEvent::Stop))
    }

    pub(crate) fn tick(&mut self, remaining: u64) {
        if let Some(f) = self.on_tick.as_mut() {
            f(remaining);
        }
    }

    pub(crate) fn seconds_change(&mut self, seconds: u64) {
        if let Some(f) = self.on_seconds_change.as_mut() {
            f(seconds);
        }
    }

    pub(crate) fn minutes_change(&mut self, minutes: u64) {
        if let Some(f) = self.on_minutes_change.as_mut() {
            f(minutes);
        }
    }

    pub(crate) fn hours_change(&mut self, hours: u64) {
        if let Some(f) = self.on_hours_change.as_mut() {
            f(hours);
        }
    }

    pub(crate) fn cycle_change(&mut self, cycle: u32) {
        if let Some(f) = self.on_cycle_change.as_mut() {
            f(cycle);
        }
    }

    pub(crate) fn phase_change(&mut self, phase: Phase) {
        if let Some(f) = self.on_phase_change.as_mut() {
            f(phase);
        }
    }

    /// Fires exactly one of `on_work`, `on_break`, `on_rest`
    pub(crate) fn phase_started(&mut self, phase: Phase) {
        let hook = match phase {
            Phase::Work => self.on_work.as_mut(),
            Phase::Break => self.on_break.as_mut(),
            Phase::Rest => self.on_rest.as_mut(),
        };
        if let Some(f) = hook {
            f();
        }
    }

    pub(crate) fn save(&mut self, snapshot: &Snapshot) {
        if let Some(f) = self.on_save.as_mut() {
            f(snapshot);
        }
    }

    pub(crate) fn load(&mut self, loaded: &LoadedSnapshot) {
        if let Some(f) = self.on_load.as_mut() {
            f(loaded);
        }
    }

    pub(crate) fn clear(&mut self, snapshot: &Snapshot) {
        if let Some(f) = self.on_clear.as_mut() {
            f(snapshot);
        }
    }

    pub(crate) fn stop(&mut self) {
        if let Some(f) = self.on_stop.as_mut() {
            f();
        }
    }
}

/// Serializable form of every timer event, as streamed to UIs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "camelCase")]
pub enum TimerEvent {
    Tick(u64),
    SecondsChange(u64),
    MinutesChange(u64),
    HoursChange(u64),
    CycleChange(u32),
    PhaseChange(Phase),
    Work,
    Break,
    Rest,
    Save(Snapshot),
    Load(LoadedSnapshot),
    Clear(Snapshot),
    Stop,
}

impl TimerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            TimerEvent::Tick(_) => "tick",
            TimerEvent::SecondsChange(_) => "secondsChange",
            TimerEvent::MinutesChange(_) => "minutesChange",
            TimerEvent::HoursChange(_) => "hoursChange",
            TimerEvent::CycleChange(_) => "cycleChange",
            TimerEvent::PhaseChange(_) => "phaseChange",
            TimerEvent::Work => "work",
            TimerEvent::Break => "break",
            TimerEvent::Rest => "rest",
            TimerEvent::Save(_) => "save",
            TimerEvent::Load(_) => "load",
            TimerEvent::Clear(_) => "clear",
            TimerEvent::Stop => "stop",
        }
    }
}
