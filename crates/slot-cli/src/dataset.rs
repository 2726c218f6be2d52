//! JSON dataset standing in for the clinic database.
//!
//! ```json
//! {
//!   "doctors": [
//!     { "id": 1, "name": "Dr. Adams",
//!       "shifts": [{ "id": 1, "date": "2025-04-15", "start_time": "22:00:00", "end_time": "02:00:00" }] }
//!   ],
//!   "appointments": [
//!     { "id": 1, "doctor_id": 1, "patient_id": 7, "procedure_id": 3, "procedure_name": "X-Ray",
//!       "date_and_time": "2025-04-15T23:00:00", "procedure_duration_minutes": 30, "finished": false }
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use slot_engine::model::{AppointmentId, DoctorId, PatientId};
use slot_engine::{Appointment, AppointmentProvider, ScheduleError, Shift, ShiftProvider};

#[derive(Debug, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    #[serde(default)]
    pub shifts: Vec<Shift>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub doctors: Vec<Doctor>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

impl Dataset {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse dataset JSON")
    }

    pub fn appointment(&self, id: AppointmentId) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    fn doctor(&self, id: DoctorId) -> slot_engine::error::Result<&Doctor> {
        self.doctors
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| ScheduleError::Provider(format!("unknown doctor {}", id)))
    }
}

impl ShiftProvider for Dataset {
    fn shifts_for_doctor(&self, doctor_id: DoctorId) -> slot_engine::error::Result<Vec<Shift>> {
        Ok(self.doctor(doctor_id)?.shifts.clone())
    }
}

impl AppointmentProvider for Dataset {
    fn appointments_for_doctor_on(
        &self,
        doctor_id: DoctorId,
        date: NaiveDate,
    ) -> slot_engine::error::Result<Vec<Appointment>> {
        Ok(self
            .appointments
            .iter()
            .filter(|a| a.doctor_id == doctor_id && a.date_and_time.date() == date)
            .cloned()
            .collect())
    }

    fn appointments_for_patient(
        &self,
        patient_id: PatientId,
    ) -> slot_engine::error::Result<Vec<Appointment>> {
        Ok(self
            .appointments
            .iter()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect())
    }
}
