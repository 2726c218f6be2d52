//! Shift, appointment, and time-of-day types shared by every engine module.
//!
//! A [`Shift`] is stored as a start instant plus a length rather than a date with
//! two times of day, so the end of an overnight shift is always `start + length`
//! and never needs a separate "does it wrap?" test at the call site.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub type ShiftId = i64;
pub type DoctorId = i64;
pub type PatientId = i64;
pub type ProcedureId = i64;
pub type AppointmentId = i64;

pub(crate) const MINUTES_PER_DAY: i64 = 24 * 60;

/// Midnight at the start of `date`.
pub(crate) fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// One work period of one doctor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ShiftRecord", into = "ShiftRecord")]
pub struct Shift {
    id: ShiftId,
    start: NaiveDateTime,
    length: Duration,
}

/// Stored form of a shift: a calendar date and two times of day.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ShiftRecord {
    id: ShiftId,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
}

impl From<ShiftRecord> for Shift {
    fn from(record: ShiftRecord) -> Self {
        Shift::new(record.id, record.date, record.start_time, record.end_time)
    }
}

impl From<Shift> for ShiftRecord {
    fn from(shift: Shift) -> Self {
        ShiftRecord {
            id: shift.id,
            date: shift.date(),
            start_time: shift.start_time(),
            end_time: shift.end_time(),
        }
    }
}

impl Shift {
    /// Build a shift from its stored `(date, start, end)` form.
    ///
    /// When `end_time <= start_time` the shift crosses midnight and ends on the
    /// following day. Equal times therefore describe a 24-hour shift.
    pub fn new(id: ShiftId, date: NaiveDate, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        let mut length = end_time - start_time;
        if end_time <= start_time {
            length += Duration::hours(24);
        }
        Shift {
            id,
            start: date.and_time(start_time),
            length,
        }
    }

    /// Build a shift directly from its start instant and length.
    pub fn with_length(id: ShiftId, start: NaiveDateTime, length: Duration) -> Self {
        Shift { id, start, length }
    }

    pub fn id(&self) -> ShiftId {
        self.id
    }

    /// Calendar day the shift starts on.
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn start_time(&self) -> NaiveTime {
        self.start.time()
    }

    pub fn end_time(&self) -> NaiveTime {
        self.end().time()
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.start + self.length
    }

    pub fn length(&self) -> Duration {
        self.length
    }

    /// True when the shift ends on a later calendar day than it starts.
    pub fn is_overnight(&self) -> bool {
        self.end().date() > self.date() && self.end().time() != NaiveTime::MIN
    }

    /// True for the degenerate "start == end" shift, which spans a whole day.
    pub fn is_full_day(&self) -> bool {
        self.length == Duration::hours(24)
    }

    /// Half-open containment: `start <= instant < end`.
    pub fn covers(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start && instant < self.end()
    }

    /// True when `[start, end)` intersects `[from, to)`.
    pub fn overlaps(&self, from: NaiveDateTime, to: NaiveDateTime) -> bool {
        self.start < to && self.end() > from
    }
}

/// A booked procedure joined with the fields the scheduling views need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub doctor_id: DoctorId,
    pub patient_id: PatientId,
    pub procedure_id: ProcedureId,
    pub procedure_name: String,
    pub date_and_time: NaiveDateTime,
    #[serde(rename = "procedure_duration_minutes", with = "duration_minutes")]
    pub procedure_duration: Duration,
    #[serde(default)]
    pub finished: bool,
}

impl Appointment {
    pub fn end(&self) -> NaiveDateTime {
        self.date_and_time + self.procedure_duration
    }
}

mod duration_minutes {
    use chrono::Duration;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(duration.num_minutes())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let minutes = i64::deserialize(deserializer)?;
        Duration::try_minutes(minutes)
            .ok_or_else(|| D::Error::custom(format!("duration out of range: {} minutes", minutes)))
    }
}

/// Minutes past midnight of a shift's calendar date.
///
/// Values of 24:00 or later belong to the following day; they appear when an
/// overnight shift runs past midnight. `Display` renders the wall-clock `HH:MM`;
/// the serialized form appends the day offset, e.g. `"01:00+1"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    minutes: i64,
}

impl TimeOfDay {
    pub fn from_minutes(minutes: i64) -> Self {
        TimeOfDay { minutes }
    }

    pub fn from_hm(hours: i64, minutes: i64) -> Self {
        TimeOfDay {
            minutes: hours * 60 + minutes,
        }
    }

    /// Offset of `instant` from midnight of `date`, truncated to whole minutes.
    pub fn between(date: NaiveDate, instant: NaiveDateTime) -> Self {
        TimeOfDay {
            minutes: (instant - midnight(date)).num_minutes(),
        }
    }

    pub fn minutes(&self) -> i64 {
        self.minutes
    }

    pub fn offset(&self) -> Duration {
        Duration::minutes(self.minutes)
    }

    pub fn next_day(&self) -> bool {
        self.minutes >= MINUTES_PER_DAY
    }

    pub fn as_naive_time(&self) -> NaiveTime {
        let seconds = self.minutes.rem_euclid(MINUTES_PER_DAY) * 60;
        NaiveTime::from_num_seconds_from_midnight_opt(seconds as u32, 0).unwrap_or_default()
    }

    /// Absolute instant of this offset relative to `date`.
    pub fn on(&self, date: NaiveDate) -> NaiveDateTime {
        midnight(date) + self.offset()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let wrapped = self.minutes.rem_euclid(MINUTES_PER_DAY);
        write!(f, "{:02}:{:02}", wrapped / 60, wrapped % 60)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.minutes.div_euclid(MINUTES_PER_DAY) {
            0 => serializer.collect_str(self),
            days => serializer.collect_str(&format_args!("{}{:+}", self, days)),
        }
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let (clock, days) = match raw.find(['+', '-']) {
            Some(at) => {
                let days = raw[at..]
                    .parse::<i64>()
                    .map_err(|_| D::Error::custom(format!("invalid day offset in {:?}", raw)))?;
                (&raw[..at], days)
            }
            None => (raw.as_str(), 0),
        };
        let time = NaiveTime::parse_from_str(clock, "%H:%M").map_err(D::Error::custom)?;
        let minutes = days
            .checked_mul(MINUTES_PER_DAY)
            .and_then(|m| m.checked_add(i64::from(time.num_seconds_from_midnight() / 60)))
            .ok_or_else(|| D::Error::custom(format!("time of day out of range: {:?}", raw)))?;
        Ok(TimeOfDay { minutes })
    }
}
