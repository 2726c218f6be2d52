//! Booking conflict checks against existing appointments.
//!
//! The default check only compares start instants: a new appointment conflicts
//! when an existing one for the same doctor (or patient) starts at exactly the
//! same moment. [`ConflictCheck::Overlap`] is the stricter interval test, where
//! two appointments conflict when `a.start < b.end && b.start < a.end`.
//! Adjacent appointments (one ends exactly when the next starts) never conflict.

use chrono::{Duration, NaiveDateTime};

use crate::model::{Appointment, DoctorId, PatientId};

/// How a requested appointment is compared with existing ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictCheck {
    /// Conflict only on an identical start instant.
    #[default]
    ExactStart,
    /// Conflict on any overlap of the half-open `[start, end)` intervals.
    Overlap,
}

impl ConflictCheck {
    /// Does a request for `[start, start + duration)` collide with `existing`?
    pub fn collides(
        &self,
        start: NaiveDateTime,
        duration: Duration,
        existing: &Appointment,
    ) -> bool {
        match self {
            ConflictCheck::ExactStart => existing.date_and_time == start,
            ConflictCheck::Overlap => {
                // A request ending past the calendar range runs forever.
                let ends_after = start
                    .checked_add_signed(duration)
                    .is_none_or(|end| existing.date_and_time < end);
                // An instantaneous request still collides with an appointment
                // starting at the same moment.
                existing.date_and_time == start || (start < existing.end() && ends_after)
            }
        }
    }
}

/// True if any of `existing` belongs to `doctor_id` and starts exactly at
/// `requested_start`.
pub fn has_conflict(
    doctor_id: DoctorId,
    requested_start: NaiveDateTime,
    existing: &[Appointment],
) -> bool {
    existing
        .iter()
        .any(|a| a.doctor_id == doctor_id && a.date_and_time == requested_start)
}

/// Patient-side counterpart of [`has_conflict`]: catches a patient booking two
/// doctors for the same instant.
pub fn patient_has_conflict(
    patient_id: PatientId,
    requested_start: NaiveDateTime,
    existing: &[Appointment],
) -> bool {
    existing
        .iter()
        .any(|a| a.patient_id == patient_id && a.date_and_time == requested_start)
}

/// Every appointment in `existing` that collides with the requested interval
/// under `check`.
pub fn find_conflicts<'a>(
    requested_start: NaiveDateTime,
    requested_duration: Duration,
    existing: &'a [Appointment],
    check: ConflictCheck,
) -> Vec<&'a Appointment> {
    existing
        .iter()
        .filter(|a| check.collides(requested_start, requested_duration, a))
        .collect()
}
