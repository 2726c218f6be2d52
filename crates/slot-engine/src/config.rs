//! Deployment settings for slot generation and booking.
//!
//! Settings are plain values passed to the engine by the caller. They can be read
//! from a JSON document or from environment variables; anything missing or
//! unparsable falls back to its default.

use std::env;
use std::str::FromStr;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::rounding::SlotGranularity;

/// Raw deployment configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Width of a bookable slot, in minutes.
    pub slot_granularity_minutes: u32,
    /// Booking window used for a shift whose start and end times coincide.
    pub full_day_window_hours: u32,
    /// Minimum notice before an appointment can still be cancelled.
    pub cancellation_notice_hours: u32,
    /// How far ahead of today appointments may be booked.
    pub booking_horizon_months: u32,
    /// `chrono` format string for day-grid slot labels.
    pub label_format: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            slot_granularity_minutes: SlotGranularity::DEFAULT_MINUTES,
            full_day_window_hours: 12,
            cancellation_notice_hours: 24,
            booking_horizon_months: 1,
            label_format: "%I:%M %p".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_env() -> Self {
        let defaults = EngineConfig::default();
        EngineConfig {
            slot_granularity_minutes: env_or(
                "SLOT_GRANULARITY_MINUTES",
                defaults.slot_granularity_minutes,
            ),
            full_day_window_hours: env_or("FULL_DAY_WINDOW_HOURS", defaults.full_day_window_hours),
            cancellation_notice_hours: env_or(
                "CANCELLATION_NOTICE_HOURS",
                defaults.cancellation_notice_hours,
            ),
            booking_horizon_months: env_or(
                "BOOKING_HORIZON_MONTHS",
                defaults.booking_horizon_months,
            ),
            label_format: env::var("SLOT_LABEL_FORMAT").unwrap_or(defaults.label_format),
        }
    }

    /// Validated slot policy for start-time generation.
    pub fn policy(&self) -> Result<SlotPolicy> {
        Ok(SlotPolicy {
            granularity: SlotGranularity::new(self.slot_granularity_minutes)?,
            full_day_window: Duration::hours(i64::from(self.full_day_window_hours)),
        })
    }

    pub fn cancellation_notice(&self) -> Duration {
        Duration::hours(i64::from(self.cancellation_notice_hours))
    }
}

fn env_or<T: FromStr + Copy + std::fmt::Display>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

/// Parameters of booking start-time generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPolicy {
    pub granularity: SlotGranularity,
    /// Window assumed for a full-day (start == end) shift.
    pub full_day_window: Duration,
}

impl Default for SlotPolicy {
    fn default() -> Self {
        SlotPolicy {
            granularity: SlotGranularity::default(),
            full_day_window: Duration::hours(12),
        }
    }
}
