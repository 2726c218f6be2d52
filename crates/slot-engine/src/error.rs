//! Error types for slot-engine operations.

use chrono::NaiveDate;
use thiserror::Error;

/// Which side of a booking collided with an existing appointment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictParty {
    Doctor,
    Patient,
}

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Shift not found for date {0}")]
    ShiftNotFound(NaiveDate),

    #[error("Appointment conflict: {message}")]
    AppointmentConflict {
        party: ConflictParty,
        message: String,
    },

    #[error("Cancellation not allowed: {0}")]
    CancellationNotAllowed(String),

    #[error("Invalid duration: {0}")]
    InvalidDuration(String),

    #[error("Invalid slot granularity: {0} minutes")]
    InvalidGranularity(u32),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
