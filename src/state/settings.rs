//! Pomodoro settings and partial updates

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::Phase;
use crate::utils::coerce_u32;

pub const DEFAULT_WORK_TIME: u32 = 25;
pub const DEFAULT_BREAK_TIME: u32 = 5;
pub const DEFAULT_REST_TIME: u32 = 25;
pub const DEFAULT_REST_PERIODICITY: u32 = 3;

/// Upper bound for any phase duration, in minutes (one day)
pub const MAX_DURATION_MINUTES: u32 = 1440;
/// Upper bound for the number of work blocks between rests
pub const MAX_REST_PERIODICITY: u32 = 100;

/// Phase durations (minutes) and rest periodicity (work blocks)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub work_time: u32,
    pub break_time: u32,
    pub rest_time: u32,
    pub rest_periodicity: u32,
}

impl Settings {
    /// Build settings from raw values, replacing each invalid field with its default.
    pub fn new(work_time: u32, break_time: u32, rest_time: u32, rest_periodicity: u32) -> Self {
        SettingsPatch {
            work_time: Some(work_time),
            break_time: Some(break_time),
            rest_time: Some(rest_time),
            rest_periodicity: Some(rest_periodicity),
        }
        .apply(&Self::default())
    }

    /// Full length of `phase` in seconds
    pub fn phase_seconds(&self, phase: Phase) -> u64 {
        let minutes = match phase {
            Phase::Work => self.work_time,
            Phase::Break => self.break_time,
            Phase::Rest => self.rest_time,
        };
        u64::from(minutes) * 60
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_time: DEFAULT_WORK_TIME,
            break_time: DEFAULT_BREAK_TIME,
            rest_time: DEFAULT_REST_TIME,
            rest_periodicity: DEFAULT_REST_PERIODICITY,
        }
    }
}

/// Partial settings update. `None` keeps the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub work_time: Option<u32>,
    pub break_time: Option<u32>,
    pub rest_time: Option<u32>,
    pub rest_periodicity: Option<u32>,
}

impl SettingsPatch {
    /// Read a patch out of loosely-typed JSON (`{"workTime": "30", ...}`).
    ///
    /// Out-of-range numbers are dropped like unreadable ones. Returns `None`
    /// when `value` is not an object or carries no usable field.
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let field = |name: &str, max: u32| {
            object
                .get(name)
                .and_then(coerce_u32)
                .filter(|value| in_range(name, *value, max))
        };
        let patch = Self {
            work_time: field("workTime", MAX_DURATION_MINUTES),
            break_time: field("breakTime", MAX_DURATION_MINUTES),
            rest_time: field("restTime", MAX_DURATION_MINUTES),
            rest_periodicity: field("restPeriodicity", MAX_REST_PERIODICITY),
        };
        (!patch.is_empty()).then_some(patch)
    }

    pub fn is_empty(&self) -> bool {
        self.work_time.is_none()
            && self.break_time.is_none()
            && self.rest_time.is_none()
            && self.rest_periodicity.is_none()
    }

    /// Merge onto `base`. Out-of-range values are dropped in favour of `base`.
    pub fn apply(&self, base: &Settings) -> Settings {
        Settings {
            work_time: pick("workTime", self.work_time, base.work_time, MAX_DURATION_MINUTES),
            break_time: pick("breakTime", self.break_time, base.break_time, MAX_DURATION_MINUTES),
            rest_time: pick("restTime", self.rest_time, base.rest_time, MAX_DURATION_MINUTES),
            rest_periodicity: pick(
                "restPeriodicity",
                self.rest_periodicity,
                base.rest_periodicity,
                MAX_REST_PERIODICITY,
            ),
        }
    }
}

fn in_range(name: &str, value: u32, max: u32) -> bool {
    let valid = (1..=max).contains(&value);
    if !valid {
        warn!("Ignoring out-of-range {} = {} (expected 1..={})", name, value, max);
    }
    valid
}

fn pick(name: &str, candidate: Option<u32>, previous: u32, max: u32) -> u32 {
    candidate
        .filter(|value| in_range(name, *value, max))
        .unwrap_or(previous)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn defaults_match_classic_pomodoro() {
        let settings = Settings::default();
        assert_eq!(settings, Settings::new(25, 5, 25, 3));
        assert_eq!(settings.phase_seconds(Phase::Work), 1500);
        assert_eq!(settings.phase_seconds(Phase::Break), 300);
        assert_eq!(settings.phase_seconds(Phase::Rest), 1500);
    }

    #[test]
    fn invalid_construction_falls_back_to_defaults() {
        let settings = Settings::new(0, 10, 5000, 0);
        assert_eq!(settings.work_time, DEFAULT_WORK_TIME);
        assert_eq!(settings.break_time, 10);
        assert_eq!(settings.rest_time, DEFAULT_REST_TIME);
        assert_eq!(settings.rest_periodicity, DEFAULT_REST_PERIODICITY);
    }

    #[test]
    fn patch_merges_only_valid_fields() {
        let base = Settings::new(50, 10, 30, 4);
        let patch = SettingsPatch {
            work_time: Some(20),
            break_time: Some(0),
            rest_time: None,
            rest_periodicity: Some(101),
        };
        assert_eq!(patch.apply(&base), Settings::new(20, 10, 30, 4));
    }

    #[test]
    fn patch_from_lenient_json() {
        let patch = SettingsPatch::from_json(&json!({
            "workTime": "30",
            "breakTime": "soon",
            "restTime": 15.0,
        }))
        .unwrap();
        assert_eq!(patch.work_time, Some(30));
        assert_eq!(patch.break_time, None);
        assert_eq!(patch.rest_time, Some(15));
        assert_eq!(patch.rest_periodicity, None);
    }

    #[test]
    fn patch_from_unusable_json_is_none() {
        assert!(SettingsPatch::from_json(&json!("settings")).is_none());
        assert!(SettingsPatch::from_json(&json!({"workTime": null})).is_none());
        assert!(SettingsPatch::from_json(&json!({})).is_none());
    }

    #[test]
    fn out_of_range_json_fields_are_dropped() {
        let patch = SettingsPatch::from_json(&json!({"workTime": 0, "breakTime": "1441", "restTime": 10}))
            .unwrap();
        assert_eq!(patch, SettingsPatch { rest_time: Some(10), ..SettingsPatch::default() });

        assert!(SettingsPatch::from_json(&json!({"workTime": 0, "restPeriodicity": 5000})).is_none());
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let value = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(
            value,
            json!({"workTime": 25, "breakTime": 5, "restTime": 25, "restPeriodicity": 3})
        );
    }
}
