//! Fixed 30-minute day grid for schedule views.
//!
//! Partitions a calendar day into 48 half-hour slots and classifies each one as
//! outside every shift (`None`), inside a shift (`Available`), or inside a shift
//! and starting exactly when an appointment starts (`Booked`).

use chrono::format::{Item, StrftimeItems};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::{midnight, Appointment, Shift};

/// Width of one grid slot, in minutes.
pub const GRID_SLOT_MINUTES: i64 = 30;

/// Number of grid slots in a day.
pub const SLOTS_PER_DAY: usize = 48;

/// Default label format, e.g. `09:00 AM`.
pub const DEFAULT_LABEL_FORMAT: &str = "%I:%M %p";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlotStatus {
    /// Outside every shift.
    #[default]
    None,
    /// Inside a shift, nothing booked at this start.
    Available,
    /// Inside a shift, an appointment starts here.
    Booked,
}

/// One cell of the day grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub slot_start: NaiveDateTime,
    pub label: String,
    /// Procedure name of the appointment starting here, or empty.
    pub occupant_procedure_name: String,
    pub status: SlotStatus,
}

/// Generate the 48-slot grid for `day` with the default label format.
pub fn generate_day_slots(
    day: NaiveDate,
    shifts: &[Shift],
    appointments: &[Appointment],
) -> Vec<TimeSlot> {
    generate_day_slots_with_format(day, shifts, appointments, DEFAULT_LABEL_FORMAT)
}

/// Generate the 48-slot grid for `day`, labelling slots with `label_format`.
///
/// Only shifts whose `[start, end)` interval intersects the day and appointments
/// starting on the day are considered. An appointment that starts outside every
/// shift leaves its slot as `None`.
pub fn generate_day_slots_with_format(
    day: NaiveDate,
    shifts: &[Shift],
    appointments: &[Appointment],
    label_format: &str,
) -> Vec<TimeSlot> {
    let day_start = midnight(day);
    let day_end = day_start + Duration::days(1);

    let day_shifts: Vec<&Shift> = shifts
        .iter()
        .filter(|shift| shift.overlaps(day_start, day_end))
        .collect();

    let day_appointments: Vec<&Appointment> = appointments
        .iter()
        .filter(|appointment| appointment.date_and_time.date() == day)
        .collect();

    let mut label_items: Vec<Item<'_>> = StrftimeItems::new(label_format).collect();
    if label_items.contains(&Item::Error) {
        warn!(label_format, "invalid slot label format, using default");
        label_items = StrftimeItems::new(DEFAULT_LABEL_FORMAT).collect();
    }

    debug!(
        %day,
        shifts = day_shifts.len(),
        appointments = day_appointments.len(),
        "generating day grid"
    );

    (0..SLOTS_PER_DAY)
        .map(|index| {
            let slot_start = day_start + Duration::minutes(index as i64 * GRID_SLOT_MINUTES);
            let in_shift = day_shifts.iter().any(|shift| shift.covers(slot_start));

            let occupant = day_appointments
                .iter()
                .find(|appointment| in_shift && appointment.date_and_time == slot_start);

            let (status, occupant_procedure_name) = match occupant {
                Some(appointment) => (SlotStatus::Booked, appointment.procedure_name.clone()),
                None if in_shift => (SlotStatus::Available, String::new()),
                None => (SlotStatus::None, String::new()),
            };

            TimeSlot {
                slot_start,
                label: slot_start.format_with_items(label_items.iter()).to_string(),
                occupant_procedure_name,
                status,
            }
        })
        .collect()
}
