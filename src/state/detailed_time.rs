//! Remaining time split into hours, minutes and seconds

use serde::{Deserialize, Serialize};

/// `{h, m, s}` view of the remaining seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DetailedTime {
    #[serde(rename = "h")]
    pub hours: u64,
    #[serde(rename = "m")]
    pub minutes: u64,
    #[serde(rename = "s")]
    pub seconds: u64,
}

/// Which units moved during a one-second count-down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnitChanges {
    pub hours: bool,
    pub minutes: bool,
    pub seconds: bool,
}

impl DetailedTime {
    pub fn from_seconds(total: u64) -> Self {
        Self {
            hours: total / 3600,
            minutes: total % 3600 / 60,
            seconds: total % 60,
        }
    }

    pub fn as_seconds(&self) -> u64 {
        self.hours * 3600 + self.minutes * 60 + self.seconds
    }

    /// Step back one second by borrowing from minutes, then hours.
    ///
    /// Stays at zero once there.
    pub fn count_down(&mut self) -> UnitChanges {
        let mut changes = UnitChanges::default();
        if self.seconds > 0 {
            self.seconds -= 1;
            changes.seconds = true;
        } else if self.minutes > 0 {
            self.minutes -= 1;
            self.seconds = 59;
            changes.minutes = true;
            changes.seconds = true;
        } else if self.hours > 0 {
            self.hours -= 1;
            self.minutes = 59;
            self.seconds = 59;
            changes = UnitChanges {
                hours: true,
                minutes: true,
                seconds: true,
            };
        }
        changes
    }
}
