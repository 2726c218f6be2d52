//! Seams to the storage layer that owns shifts and appointments.
//!
//! The engine never performs I/O itself. Implementors map their own storage
//! errors into [`ScheduleError::Provider`](crate::error::ScheduleError::Provider).

use chrono::NaiveDate;

use crate::error::Result;
use crate::model::{Appointment, DoctorId, PatientId, Shift};

pub trait ShiftProvider {
    /// All shifts of one doctor.
    fn shifts_for_doctor(&self, doctor_id: DoctorId) -> Result<Vec<Shift>>;
}

pub trait AppointmentProvider {
    /// Appointments of one doctor starting on `date`.
    fn appointments_for_doctor_on(&self, doctor_id: DoctorId, date: NaiveDate)
        -> Result<Vec<Appointment>>;

    /// Every appointment of one patient, any doctor, any date.
    fn appointments_for_patient(&self, patient_id: PatientId) -> Result<Vec<Appointment>>;
}
