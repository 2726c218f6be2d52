//! Booking-time rules: conflict rejection, cancellation notice, booking horizon,
//! and the patient's upcoming-appointment list.

use chrono::{Duration, Months, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::conflict::ConflictCheck;
use crate::error::{ConflictParty, Result, ScheduleError};
use crate::model::{Appointment, DoctorId, PatientId, ProcedureId};
use crate::provider::AppointmentProvider;

/// A not-yet-persisted appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub doctor_id: DoctorId,
    pub patient_id: PatientId,
    pub procedure_id: ProcedureId,
    pub start: NaiveDateTime,
    pub duration: Duration,
}

/// Reject `request` if it collides with the doctor's or the patient's existing
/// appointments. The doctor is checked first.
///
/// Only appointments belonging to the request's doctor (respectively patient)
/// are considered, so callers may pass unfiltered lists.
pub fn check_booking(
    request: &BookingRequest,
    doctor_appointments: &[Appointment],
    patient_appointments: &[Appointment],
    check: ConflictCheck,
) -> Result<()> {
    let collides = |a: &Appointment| check.collides(request.start, request.duration, a);

    if doctor_appointments
        .iter()
        .any(|a| a.doctor_id == request.doctor_id && collides(a))
    {
        return Err(ScheduleError::AppointmentConflict {
            party: ConflictParty::Doctor,
            message: format!(
                "the selected time slot is already booked for doctor with id {}",
                request.doctor_id
            ),
        });
    }

    if patient_appointments
        .iter()
        .any(|a| a.patient_id == request.patient_id && collides(a))
    {
        return Err(ScheduleError::AppointmentConflict {
            party: ConflictParty::Patient,
            message: format!(
                "the patient with id {} already has an appointment at {}",
                request.patient_id, request.start
            ),
        });
    }

    Ok(())
}

/// [`check_booking`] with both appointment lists fetched from `provider`.
pub fn check_booking_with<P: AppointmentProvider + ?Sized>(
    provider: &P,
    request: &BookingRequest,
    check: ConflictCheck,
) -> Result<()> {
    let doctor_appointments =
        provider.appointments_for_doctor_on(request.doctor_id, request.start.date())?;
    let patient_appointments = provider.appointments_for_patient(request.patient_id)?;
    debug!(
        doctor_id = request.doctor_id,
        patient_id = request.patient_id,
        start = %request.start,
        "checking booking request"
    );
    check_booking(request, &doctor_appointments, &patient_appointments, check)
}

/// True when `appointment` starts at least `notice` after `now`.
pub fn can_cancel(appointment: &Appointment, now: NaiveDateTime, notice: Duration) -> bool {
    appointment.date_and_time - now >= notice
}

pub fn ensure_cancellable(
    appointment: &Appointment,
    now: NaiveDateTime,
    notice: Duration,
) -> Result<()> {
    if can_cancel(appointment, now, notice) {
        Ok(())
    } else {
        Err(ScheduleError::CancellationNotAllowed(format!(
            "appointment {} starts within {} hours",
            appointment.id,
            notice.num_hours()
        )))
    }
}

/// Unfinished appointments strictly after `now`, earliest first.
pub fn upcoming_for_patient(appointments: &[Appointment], now: NaiveDateTime) -> Vec<Appointment> {
    let mut upcoming: Vec<Appointment> = appointments
        .iter()
        .filter(|a| a.date_and_time > now && !a.finished)
        .cloned()
        .collect();
    upcoming.sort_by_key(|a| a.date_and_time);
    upcoming
}

/// Range of calendar dates open for booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

impl BookingWindow {
    /// From `today` through the same day `months` months later. Month-end dates
    /// clamp to the last day of the target month.
    pub fn starting(today: NaiveDate, months: u32) -> Self {
        let last = today
            .checked_add_months(Months::new(months))
            .unwrap_or(NaiveDate::MAX);
        BookingWindow { first: today, last }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.first && date <= self.last
    }
}
