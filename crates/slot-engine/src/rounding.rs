//! Rounding procedure durations onto the scheduling grid.

use chrono::Duration;

use crate::error::{Result, ScheduleError};

/// Width of one bookable slot. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotGranularity(u32);

impl SlotGranularity {
    pub const DEFAULT_MINUTES: u32 = 30;

    pub fn new(minutes: u32) -> Result<Self> {
        if minutes == 0 {
            return Err(ScheduleError::InvalidGranularity(minutes));
        }
        Ok(SlotGranularity(minutes))
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }

    pub fn as_duration(&self) -> Duration {
        Duration::minutes(i64::from(self.0))
    }
}

impl Default for SlotGranularity {
    fn default() -> Self {
        SlotGranularity(Self::DEFAULT_MINUTES)
    }
}

/// Round `duration` to the nearest multiple of `granularity`.
///
/// The duration is first truncated to whole minutes. Ties go to the even
/// multiple, so at a 30-minute grid 45 minutes becomes 60 and 75 becomes 60.
/// Returns `None` when the rounded value no longer fits in a [`Duration`].
pub fn round_to_granularity(duration: Duration, granularity: SlotGranularity) -> Option<Duration> {
    let minutes = duration.num_minutes();
    let step = i64::from(granularity.minutes());

    let mut quotient = minutes.div_euclid(step);
    let twice_remainder = 2 * minutes.rem_euclid(step);
    if twice_remainder > step || (twice_remainder == step && quotient % 2 != 0) {
        quotient += 1;
    }

    quotient.checked_mul(step).and_then(Duration::try_minutes)
}
