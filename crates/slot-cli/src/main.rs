//! `slots` CLI — inspect a doctor's day grid and bookable start times.
//!
//! ## Usage
//!
//! ```sh
//! # Half-hour day grid for doctor 1
//! slots grid --date 2025-04-15 --doctor 1 -i clinic.json
//!
//! # Start times for a 45-minute procedure, as JSON
//! slots starts --date 2025-04-15 --doctor 1 --duration 45 -i clinic.json --json
//!
//! # Would a booking collide with an existing appointment?
//! slots check --doctor 1 --patient 7 --at 2025-04-15T23:00:00 -i clinic.json
//!
//! # Dates to highlight in the booking calendar
//! slots shifts --doctor 1 -i clinic.json
//!
//! # Settings from a file instead of the environment
//! slots --config engine.json grid --date 2025-04-15 --doctor 1 < clinic.json
//! ```

mod dataset;

use std::io::{self, Read};

use anyhow::{Context, Result};
use chrono::{Days, Duration, NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use serde::Serialize;
use slot_engine::booking::{ensure_cancellable, upcoming_for_patient};
use slot_engine::grid::generate_day_slots_with_format;
use slot_engine::{
    check_booking_with, compute_available_start_times, AppointmentProvider, BookingRequest,
    BookingWindow, ConflictCheck, EngineConfig, ScheduleError, ShiftRepository, SlotStatus,
    TimeOfDay,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::dataset::Dataset;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Doctor day grids and bookable appointment start times"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine settings as JSON (defaults to environment variables)
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the 48-slot half-hour grid of one day
    Grid {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        doctor: i64,
        /// Dataset file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// List start times at which a procedure still fits into the day's shift
    Starts {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        doctor: i64,
        /// Procedure duration in minutes
        #[arg(long)]
        duration: i64,
        #[arg(short, long)]
        input: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Check a booking request against existing appointments
    Check {
        #[arg(long)]
        doctor: i64,
        #[arg(long)]
        patient: i64,
        #[arg(long, default_value_t = 0)]
        procedure: i64,
        /// Requested start, e.g. 2025-04-15T09:00:00
        #[arg(long)]
        at: NaiveDateTime,
        /// Procedure duration in minutes
        #[arg(long, default_value_t = 30)]
        duration: i64,
        /// Reject any interval overlap instead of only identical starts
        #[arg(long)]
        overlap: bool,
        /// Reject dates outside the booking horizon counted from this day
        #[arg(long)]
        today: Option<NaiveDate>,
        #[arg(short, long)]
        input: Option<String>,
    },
    /// List calendar dates covered by a doctor's shifts
    Shifts {
        #[arg(long)]
        doctor: i64,
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Check whether an appointment may still be cancelled
    Cancel {
        #[arg(long)]
        appointment: i64,
        /// Current time, e.g. 2025-04-14T09:00:00
        #[arg(long)]
        now: NaiveDateTime,
        #[arg(short, long)]
        input: Option<String>,
    },
    /// List a patient's upcoming, unfinished appointments
    Upcoming {
        #[arg(long)]
        patient: i64,
        #[arg(long)]
        now: NaiveDateTime,
        #[arg(short, long)]
        input: Option<String>,
    },
}

/// One bookable start time in `starts --json` output.
#[derive(Serialize)]
struct StartTime {
    time: TimeOfDay,
    starts_at: NaiveDateTime,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    debug!(?config, "engine configuration");

    match cli.command {
        Commands::Grid {
            date,
            doctor,
            input,
            json,
        } => {
            let dataset = read_dataset(input.as_deref())?;
            let shifts = ShiftRepository::new();
            shifts
                .load(&dataset, doctor)
                .context("Failed to load shifts")?;
            let appointments = dataset.appointments_for_doctor_on(doctor, date)?;

            let slots = generate_day_slots_with_format(
                date,
                &shifts.snapshot(),
                &appointments,
                &config.label_format,
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&slots)?);
            } else {
                for slot in &slots {
                    let status = match slot.status {
                        SlotStatus::None => "-",
                        SlotStatus::Available => "available",
                        SlotStatus::Booked => "booked",
                    };
                    println!(
                        "{}  {:<9}  {}",
                        slot.label, status, slot.occupant_procedure_name
                    )
                }
            }
        }
        Commands::Starts {
            date,
            doctor,
            duration,
            input,
            json,
        } => {
            let dataset = read_dataset(input.as_deref())?;
            let policy = config.policy()?;
            let shifts = ShiftRepository::new();
            shifts
                .load(&dataset, doctor)
                .context("Failed to load shifts")?;

            let starts = match shifts.shift_for_day(date) {
                Ok(shift) => {
                    // An overnight shift may hold appointments on the following day.
                    let mut appointments = dataset.appointments_for_doctor_on(doctor, date)?;
                    if let Some(next) = date.checked_add_days(Days::new(1)) {
                        appointments.extend(dataset.appointments_for_doctor_on(doctor, next)?);
                    }
                    compute_available_start_times(
                        &shift,
                        &appointments,
                        minutes(duration)?,
                        &policy,
                    )?
                }
                Err(ScheduleError::ShiftNotFound(day)) => {
                    info!(%day, doctor, "no shift, day fully unavailable");
                    Vec::new()
                }
                Err(other) => return Err(other.into()),
            };

            if json {
                let out: Vec<StartTime> = starts
                    .iter()
                    .map(|t| StartTime {
                        time: *t,
                        starts_at: t.on(date),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                for t in &starts {
                    if t.next_day() {
                        println!("{} (+1)", t);
                    } else {
                        println!("{}", t);
                    }
                }
            }
        }
        Commands::Check {
            doctor,
            patient,
            procedure,
            at,
            duration,
            overlap,
            today,
            input,
        } => {
            if let Some(today) = today {
                let window = BookingWindow::starting(today, config.booking_horizon_months);
                if !window.contains(at.date()) {
                    anyhow::bail!(
                        "{} is outside the booking window {} to {}",
                        at.date(),
                        window.first,
                        window.last
                    );
                }
            }

            let dataset = read_dataset(input.as_deref())?;
            let request = BookingRequest {
                doctor_id: doctor,
                patient_id: patient,
                procedure_id: procedure,
                start: at,
                duration: minutes(duration)?,
            };
            let check = if overlap {
                ConflictCheck::Overlap
            } else {
                ConflictCheck::ExactStart
            };

            check_booking_with(&dataset, &request, check).context("Booking rejected")?;
            println!("available");
        }
        Commands::Shifts { doctor, input } => {
            let dataset = read_dataset(input.as_deref())?;
            let shifts = ShiftRepository::new();
            shifts
                .load(&dataset, doctor)
                .context("Failed to load shifts")?;
            for date in shifts.shift_dates() {
                println!("{}", date);
            }
        }
        Commands::Cancel {
            appointment,
            now,
            input,
        } => {
            let dataset = read_dataset(input.as_deref())?;
            let found = dataset
                .appointment(appointment)
                .with_context(|| format!("Appointment {} not found", appointment))?;
            ensure_cancellable(found, now, config.cancellation_notice())
                .context("Cancellation rejected")?;
            println!("cancellable");
        }
        Commands::Upcoming {
            patient,
            now,
            input,
        } => {
            let dataset = read_dataset(input.as_deref())?;
            let appointments = dataset.appointments_for_patient(patient)?;
            for a in upcoming_for_patient(&appointments, now) {
                println!("{}  {}", a.date_and_time, a.procedure_name);
            }
        }
    }

    Ok(())
}

fn minutes(value: i64) -> Result<Duration> {
    Duration::try_minutes(value)
        .with_context(|| format!("Duration out of range: {} minutes", value))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            EngineConfig::from_json_str(&json)
                .with_context(|| format!("Invalid config file: {}", path))
        }
        None => Ok(EngineConfig::from_env()),
    }
}

fn read_dataset(path: Option<&str>) -> Result<Dataset> {
    let json = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            buf
        }
    };
    Dataset::from_json(&json)
}
