//! # slot-engine
//!
//! Shift-aware appointment slot generation for clinic schedules.
//!
//! Given a doctor's shifts and the appointments already booked, the engine
//! answers two questions: what does a doctor's day look like on a fixed
//! half-hour grid, and at which times can a procedure of a given length still
//! be booked. Overnight shifts (end time at or before start time) are handled
//! by storing every shift as a start instant plus a length.
//!
//! ## Modules
//!
//! - [`model`] — shifts, appointments, time-of-day offsets
//! - [`grid`] — the 48-slot day grid with booked/available status
//! - [`availability`] — bookable start times for a procedure within a shift
//! - [`rounding`] — procedure-duration rounding onto the slot granularity
//! - [`conflict`] — exact-start and interval-overlap booking conflicts
//! - [`booking`] — booking checks, cancellation notice, booking horizon
//! - [`shifts`] — per-doctor shift cache with day lookup
//! - [`provider`] — storage seams for shifts and appointments
//! - [`config`] — deployment settings
//! - [`error`] — Error types

pub mod availability;
pub mod booking;
pub mod config;
pub mod conflict;
pub mod error;
pub mod grid;
pub mod model;
pub mod provider;
pub mod rounding;
pub mod shifts;

pub use availability::compute_available_start_times;
pub use booking::{check_booking, check_booking_with, BookingRequest, BookingWindow};
pub use config::{EngineConfig, SlotPolicy};
pub use conflict::{has_conflict, patient_has_conflict, ConflictCheck};
pub use error::{ConflictParty, ScheduleError};
pub use grid::{generate_day_slots, SlotStatus, TimeSlot};
pub use model::{Appointment, Shift, TimeOfDay};
pub use provider::{AppointmentProvider, ShiftProvider};
pub use rounding::{round_to_granularity, SlotGranularity};
pub use shifts::ShiftRepository;
