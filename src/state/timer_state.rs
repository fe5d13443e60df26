//! Phase/cycle state and the transition rule between phases

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::utils::{coerce_u32, coerce_u64};

/// Which countdown is currently active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Work,
    Break,
    Rest,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::Break => "break",
            Phase::Rest => "rest",
        }
    }

    /// Accepts `"work" | "break" | "rest"` (any case) or `0 | 1 | 2`.
    pub fn from_json(value: &Value) -> Option<Self> {
        if let Some(name) = value.as_str() {
            if let Ok(phase) = name.trim().parse() {
                return Some(phase);
            }
        }
        match coerce_u64(value)? {
            0 => Some(Phase::Work),
            1 => Some(Phase::Break),
            2 => Some(Phase::Rest),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Phase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "work" => Ok(Phase::Work),
            "break" => Ok(Phase::Break),
            "rest" => Ok(Phase::Rest),
            other => Err(format!("unknown phase: {}", other)),
        }
    }
}

/// Highest cycle accepted from outside. Far beyond any real session, and far
/// enough below `u32::MAX` that counting up from it never saturates.
pub const MAX_CYCLE: u32 = 1_000_000;

/// Whether the off-phase after work block number `cycle` is a long rest.
///
/// Cycle 0 never rests, so no rest can happen before any work was completed.
pub fn is_rest_due(cycle: u32, rest_periodicity: u32) -> bool {
    cycle > 0 && rest_periodicity > 0 && cycle % rest_periodicity == 0
}

/// Current phase plus the number of completed work blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimerState {
    pub cycle: u32,
    pub phase: Phase,
}

impl TimerState {
    pub fn new(cycle: u32, phase: Phase) -> Self {
        Self { cycle, phase }
    }

    /// State after the current phase runs out.
    ///
    /// Leaving work completes a block: the cycle is bumped and the rest rule is
    /// checked against the new value. Leaving a break or rest only returns to work.
    /// The cycle saturates at `u32::MAX`, which is unreachable from a cycle
    /// within [`MAX_CYCLE`].
    pub fn advance(&self, rest_periodicity: u32) -> Self {
        match self.phase {
            Phase::Work => {
                let cycle = self.cycle.saturating_add(1);
                let phase = if is_rest_due(cycle, rest_periodicity) {
                    Phase::Rest
                } else {
                    Phase::Break
                };
                Self { cycle, phase }
            }
            Phase::Break | Phase::Rest => Self {
                cycle: self.cycle,
                phase: Phase::Work,
            },
        }
    }
}

/// Partial state update. `None` keeps the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatePatch {
    pub cycle: Option<u32>,
    pub phase: Option<Phase>,
}

impl StatePatch {
    /// A cycle above [`MAX_CYCLE`] is dropped. Returns `None` when `value` is
    /// not an object or carries no usable field.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let patch = Self {
            cycle: object
                .get("cycle")
                .and_then(coerce_u32)
                .filter(|cycle| cycle_in_range(*cycle)),
            phase: object.get("phase").and_then(Phase::from_json),
        };
        (!patch.is_empty()).then_some(patch)
    }

    pub fn is_empty(&self) -> bool {
        self.cycle.is_none() && self.phase.is_none()
    }

    pub fn apply(&self, base: &TimerState) -> TimerState {
        TimerState {
            cycle: self
                .cycle
                .filter(|cycle| cycle_in_range(*cycle))
                .unwrap_or(base.cycle),
            phase: self.phase.unwrap_or(base.phase),
        }
    }
}

fn cycle_in_range(cycle: u32) -> bool {
    let valid = cycle <= MAX_CYCLE;
    if !valid {
        warn!("Ignoring out-of-range cycle = {} (max {})", cycle, MAX_CYCLE);
    }
    valid
}
