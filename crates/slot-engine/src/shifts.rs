//! Per-doctor shift cache with day lookup.
//!
//! The held shifts are an immutable `Arc<[Shift]>` snapshot. A reload builds the
//! new list completely and swaps the pointer, so a concurrent query sees either
//! the old list or the new one, never a mix.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::error::{Result, ScheduleError};
use crate::model::{DoctorId, Shift};
use crate::provider::ShiftProvider;

#[derive(Debug, Default)]
pub struct ShiftRepository {
    snapshot: RwLock<Arc<[Shift]>>,
}

impl ShiftRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shifts(shifts: Vec<Shift>) -> Self {
        ShiftRepository {
            snapshot: RwLock::new(shifts.into()),
        }
    }

    /// Replace the held shifts wholesale.
    pub fn replace(&self, shifts: Vec<Shift>) {
        let fresh: Arc<[Shift]> = shifts.into();
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = fresh;
    }

    /// Fetch a doctor's shifts from `provider` and swap them in. Returns the
    /// number of shifts now held. On error the previous snapshot is kept.
    pub fn load<P: ShiftProvider + ?Sized>(
        &self,
        provider: &P,
        doctor_id: DoctorId,
    ) -> Result<usize> {
        let shifts = provider.shifts_for_doctor(doctor_id)?;
        let count = shifts.len();
        self.replace(shifts);
        debug!(doctor_id, count, "loaded shifts");
        Ok(count)
    }

    /// The current snapshot. Later reloads do not affect it.
    pub fn snapshot(&self) -> Arc<[Shift]> {
        Arc::clone(&self.snapshot.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// The shift whose date is exactly `day`.
    ///
    /// # Errors
    /// Returns `ScheduleError::ShiftNotFound` when no held shift starts on `day`.
    pub fn shift_for_day(&self, day: NaiveDate) -> Result<Shift> {
        self.snapshot()
            .iter()
            .find(|shift| shift.date() == day)
            .cloned()
            .ok_or(ScheduleError::ShiftNotFound(day))
    }

    /// Calendar dates touched by the held shifts, sorted and de-duplicated.
    /// An overnight shift also marks the day it ends on.
    pub fn shift_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .snapshot()
            .iter()
            .flat_map(|shift| {
                let next = shift
                    .is_overnight()
                    .then(|| shift.date().checked_add_days(Days::new(1)))
                    .flatten();
                std::iter::once(shift.date()).chain(next)
            })
            .collect();
        dates.sort();
        dates.dedup();
        dates
    }
}
