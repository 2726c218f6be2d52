//! Bookable start times within a single shift.
//!
//! Walks a cursor from the shift start through the already-booked appointments
//! in start order. Before each appointment every grid step that still leaves room
//! for the requested procedure is emitted; the cursor then jumps past the
//! appointment's rounded end. Whatever remains up to the shift end is emitted last.
//!
//! All times are [`TimeOfDay`] offsets from midnight of the shift's date, so an
//! overnight shift simply continues past 24:00 instead of wrapping back to zero.

use chrono::Duration;
use tracing::{debug, trace};

use crate::config::SlotPolicy;
use crate::error::{Result, ScheduleError};
use crate::model::{Appointment, Shift, TimeOfDay};
use crate::rounding::round_to_granularity;

/// Busy span of one existing appointment, as offsets from the shift date.
#[derive(Debug, Clone, Copy)]
struct BusySpan {
    start: Duration,
    rounded_end: Duration,
}

/// Compute every start time at which a procedure of `requested_duration` fits
/// into `shift` without running into `existing` appointments.
///
/// `requested_duration` and each appointment end are rounded onto the policy's
/// granularity before use. A full-day shift (start == end) offers only
/// `policy.full_day_window` from its start.
///
/// # Errors
/// Returns `ScheduleError::InvalidDuration` if the requested duration or any
/// appointment duration is negative, or if rounding it leaves the range of
/// [`Duration`].
pub fn compute_available_start_times(
    shift: &Shift,
    existing: &[Appointment],
    requested_duration: Duration,
    policy: &SlotPolicy,
) -> Result<Vec<TimeOfDay>> {
    if requested_duration < Duration::zero() {
        return Err(ScheduleError::InvalidDuration(format!(
            "requested duration is negative ({} minutes)",
            requested_duration.num_minutes()
        )));
    }

    let step = policy.granularity.as_duration();
    let duration = round_to_granularity(requested_duration, policy.granularity)
        .ok_or_else(|| out_of_range("requested duration", requested_duration))?;

    let shift_start = TimeOfDay::between(shift.date(), shift.start()).offset();
    let window = if shift.is_full_day() {
        policy.full_day_window
    } else {
        shift.length()
    };
    let shift_end = shift_start
        .checked_add(&window)
        .ok_or_else(|| out_of_range("shift window", window))?;

    let busy = busy_spans(shift, existing, policy)?;

    debug!(
        shift_id = shift.id(),
        duration_minutes = duration.num_minutes(),
        booked = busy.len(),
        "computing available start times"
    );

    let mut starts = Vec::new();
    let mut current = shift_start;

    for span in &busy {
        let limit = span.start.min(shift_end);
        while fits(current, duration, limit) {
            starts.push(TimeOfDay::from_minutes(current.num_minutes()));
            current += step;
        }
        current = current.max(span.rounded_end);
        trace!(cursor_minutes = current.num_minutes(), "skipped past appointment");
    }

    while fits(current, duration, shift_end) {
        starts.push(TimeOfDay::from_minutes(current.num_minutes()));
        current += step;
    }

    Ok(starts)
}

/// Does a procedure of `duration` starting at `current` end by `limit`?
/// An end past the representable range never fits.
fn fits(current: Duration, duration: Duration, limit: Duration) -> bool {
    current.checked_add(&duration).is_some_and(|end| end <= limit)
}

fn out_of_range(what: &str, duration: Duration) -> ScheduleError {
    ScheduleError::InvalidDuration(format!(
        "{} out of range ({} minutes)",
        what,
        duration.num_minutes()
    ))
}

/// Appointments as busy spans relative to the shift date, sorted by start.
fn busy_spans(
    shift: &Shift,
    existing: &[Appointment],
    policy: &SlotPolicy,
) -> Result<Vec<BusySpan>> {
    let mut spans = existing
        .iter()
        .map(|appointment| {
            if appointment.procedure_duration < Duration::zero() {
                return Err(ScheduleError::InvalidDuration(format!(
                    "appointment {} has a negative duration",
                    appointment.id
                )));
            }
            let start = TimeOfDay::between(shift.date(), appointment.date_and_time).offset();
            let rounded_end = start
                .checked_add(&appointment.procedure_duration)
                .and_then(|end| round_to_granularity(end, policy.granularity))
                .ok_or_else(|| {
                    ScheduleError::InvalidDuration(format!(
                        "appointment {} ends out of range",
                        appointment.id
                    ))
                })?;
            Ok(BusySpan { start, rounded_end })
        })
        .collect::<Result<Vec<_>>>()?;

    spans.sort_by_key(|span| span.start);
    Ok(spans)
}
