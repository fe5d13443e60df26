//! One-second countdown ticker
//!
//! The ticker owns the remaining-seconds counter and the single pending
//! one-second deadline. It never sleeps on its own: whoever drives it calls
//! [`Ticker::poll`] with the current instant and gets back at most one tick
//! per call. Holding the schedule in one `Option` field means a restart always
//! replaces the previous interval, so two countdowns can never overlap.

use std::{fmt, time::Duration};

use tokio::time::Instant;

/// Spacing between ticks
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// What a due tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Counter decremented and is still above zero
    Remaining(u64),
    /// Counter hit zero; the ticker stopped itself. `at` is the deadline that fired.
    Expired { at: Instant },
}

type TickFn = Box<dyn FnMut(u64) + Send>;
type StopFn = Box<dyn FnMut() + Send>;

/// Optional observers fired from inside [`Ticker::poll`]
#[derive(Default)]
pub struct TickerCallbacks {
    pub on_tick: Option<TickFn>,
    pub on_stop: Option<StopFn>,
}

impl TickerCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_tick(mut self, f: impl FnMut(u64) + Send + 'static) -> Self {
        self.on_tick = Some(Box::new(f));
        self
    }

    pub fn on_stop(mut self, f: impl FnMut() + Send + 'static) -> Self {
        self.on_stop = Some(Box::new(f));
        self
    }
}

pub struct Ticker {
    remaining: u64,
    next_deadline: Option<Instant>,
    callbacks: TickerCallbacks,
}

impl Ticker {
    pub fn new(seconds: u64) -> Self {
        Self {
            remaining: seconds,
            next_deadline: None,
            callbacks: TickerCallbacks::default(),
        }
    }

    /// Replace the remaining time. Running/stopped status is left alone.
    pub fn set_time(&mut self, seconds: u64) {
        self.remaining = seconds;
    }

    pub fn time(&self) -> u64 {
        self.remaining
    }

    /// Replace both callbacks at once
    pub fn set_callbacks(&mut self, callbacks: TickerCallbacks) {
        self.callbacks = callbacks;
    }

    pub fn is_running(&self) -> bool {
        self.next_deadline.is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_deadline
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    /// Cancel any pending countdown, then schedule the first tick one period after `now`.
    pub fn start_at(&mut self, now: Instant) {
        self.stop();
        self.next_deadline = Some(now + TICK_PERIOD);
    }

    /// Cancel the countdown. No-op when already stopped.
    pub fn stop(&mut self) {
        self.next_deadline = None;
    }

    /// Run the next tick if it is due at `now`.
    ///
    /// Decrements first, then checks: a counter that lands on zero stops the
    /// ticker and fires `on_stop` without an `on_tick(0)`. A counter already at
    /// zero when the tick falls due stops without decrementing.
    pub fn poll(&mut self, now: Instant) -> Option<Tick> {
        let deadline = self.next_deadline.filter(|deadline| *deadline <= now)?;

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.next_deadline = None;
            if let Some(on_stop) = self.callbacks.on_stop.as_mut() {
                on_stop();
            }
            return Some(Tick::Expired { at: deadline });
        }

        self.next_deadline = Some(deadline + TICK_PERIOD);
        if let Some(on_tick) = self.callbacks.on_tick.as_mut() {
            on_tick(self.remaining);
        }
        Some(Tick::Remaining(self.remaining))
    }
}

impl fmt::Debug for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ticker")
            .field("remaining", &self.remaining)
            .field("next_deadline", &self.next_deadline)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, PartialEq)]
    enum Seen {
        Tick(u64),
        Stop,
    }

    fn recording(ticker: &mut Ticker) -> Arc<Mutex<Vec<Seen>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let ticks = Arc::clone(&seen);
        let stops = Arc::clone(&seen);
        ticker.set_callbacks(
            TickerCallbacks::new()
                .on_tick(move |t| ticks.lock().unwrap().push(Seen::Tick(t)))
                .on_stop(move || stops.lock().unwrap().push(Seen::Stop)),
        );
        seen
    }

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn two_seconds_tick_once_then_stop() {
        let mut ticker = Ticker::new(2);
        let seen = recording(&mut ticker);
        let t0 = Instant::now();
        ticker.start_at(t0);

        assert_eq!(ticker.poll(t0 + secs(1)), Some(Tick::Remaining(1)));
        assert_eq!(
            ticker.poll(t0 + secs(2)),
            Some(Tick::Expired { at: t0 + secs(2) })
        );
        assert!(!ticker.is_running());
        assert_eq!(ticker.poll(t0 + secs(10)), None);

        assert_eq!(*seen.lock().unwrap(), vec![Seen::Tick(1), Seen::Stop]);
    }

    #[test]
    fn nothing_happens_before_the_deadline() {
        let mut ticker = Ticker::new(5);
        let t0 = Instant::now();
        ticker.start_at(t0);
        assert_eq!(ticker.poll(t0), None);
        assert_eq!(ticker.poll(t0 + Duration::from_millis(999)), None);
        assert_eq!(ticker.time(), 5);
    }

    #[test]
    fn restart_replaces_the_pending_interval() {
        let mut ticker = Ticker::new(10);
        let t0 = Instant::now();
        ticker.start_at(t0);
        ticker.start_at(t0);
        ticker.start_at(t0 + Duration::from_millis(500));

        assert_eq!(ticker.poll(t0 + secs(1)), None);
        assert_eq!(
            ticker.poll(t0 + Duration::from_millis(1500)),
            Some(Tick::Remaining(9))
        );
        assert_eq!(ticker.poll(t0 + Duration::from_millis(1500)), None);
        assert_eq!(ticker.time(), 9);
    }

    #[test]
    fn catches_up_one_tick_per_poll() {
        let mut ticker = Ticker::new(10);
        let t0 = Instant::now();
        ticker.start_at(t0);

        let late = t0 + secs(3);
        let mut ticks = Vec::new();
        while let Some(tick) = ticker.poll(late) {
            ticks.push(tick);
        }
        assert_eq!(
            ticks,
            vec![Tick::Remaining(9), Tick::Remaining(8), Tick::Remaining(7)]
        );
    }

    #[test]
    fn zero_expires_on_first_tick_without_underflow() {
        let mut ticker = Ticker::new(0);
        let seen = recording(&mut ticker);
        let t0 = Instant::now();
        ticker.start_at(t0);

        assert!(matches!(ticker.poll(t0 + secs(1)), Some(Tick::Expired { .. })));
        assert_eq!(ticker.time(), 0);
        assert_eq!(*seen.lock().unwrap(), vec![Seen::Stop]);
    }

    #[test]
    fn stop_is_idempotent_and_freezes_time() {
        let mut ticker = Ticker::new(3);
        ticker.stop();
        let t0 = Instant::now();
        ticker.start_at(t0);
        ticker.stop();
        ticker.stop();
        assert_eq!(ticker.poll(t0 + secs(5)), None);
        assert_eq!(ticker.time(), 3);
    }

    #[test]
    fn set_time_keeps_running_status() {
        let mut ticker = Ticker::new(3);
        let t0 = Instant::now();
        ticker.start_at(t0);
        ticker.set_time(100);
        assert!(ticker.is_running());
        assert_eq!(ticker.poll(t0 + secs(1)), Some(Tick::Remaining(99)));

        ticker.stop();
        ticker.set_time(7);
        assert!(!ticker.is_running());
    }

    #[test]
    fn missing_callbacks_are_silent() {
        let mut ticker = Ticker::new(1);
        ticker.set_callbacks(TickerCallbacks::new());
        let t0 = Instant::now();
        ticker.start_at(t0);
        assert!(matches!(ticker.poll(t0 + secs(1)), Some(Tick::Expired { .. })));
    }
}
