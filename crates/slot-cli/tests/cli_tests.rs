//! Integration tests for the `slots` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to run the grid, starts, check,
//! shifts, cancel, and upcoming subcommands against a JSON fixture clinic.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to the clinic.json fixture.
fn clinic_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/clinic.json")
}

/// Helper: path to the hourly.json engine config fixture.
fn hourly_config_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/hourly.json")
}

/// Helper: path to a config fixture with a zero slot granularity.
fn zero_granularity_config_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/zero_granularity.json")
}

fn slots() -> Command {
    let mut cmd = Command::cargo_bin("slots").unwrap();
    cmd.env_remove("SLOT_GRANULARITY_MINUTES")
        .env_remove("SLOT_LABEL_FORMAT")
        .env_remove("FULL_DAY_WINDOW_HOURS")
        .env_remove("CANCELLATION_NOTICE_HOURS")
        .env_remove("BOOKING_HORIZON_MONTHS")
        .env_remove("RUST_LOG");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// grid
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn grid_table_shows_overnight_booking() {
    slots()
        .args(["grid", "--date", "2025-04-15", "--doctor", "1", "-i", clinic_json_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains("11:00 PM  booked     X-Ray"))
        .stdout(predicate::str::contains("10:00 PM  available"))
        .stdout(predicate::str::contains("09:00 PM  -"));
}

#[test]
fn grid_table_has_48_rows() {
    let output = slots()
        .args(["grid", "--date", "2025-04-15", "--doctor", "1", "-i", clinic_json_path()])
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.lines().count(), 48);
}

#[test]
fn grid_json_is_machine_readable() {
    let output = slots()
        .args([
            "grid", "--date", "2025-04-15", "--doctor", "1", "-i", clinic_json_path(), "--json",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let slots: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let slots = slots.as_array().unwrap();
    assert_eq!(slots.len(), 48);
    assert_eq!(slots[46]["slot_start"], "2025-04-15T23:00:00");
    assert_eq!(slots[46]["status"], "Booked");
    assert_eq!(slots[46]["occupant_procedure_name"], "X-Ray");
    assert_eq!(slots[0]["status"], "None");
}

#[test]
fn grid_reads_dataset_from_stdin() {
    let dataset = std::fs::read_to_string(clinic_json_path()).unwrap();

    slots()
        .args(["grid", "--date", "2025-04-16", "--doctor", "1"])
        .write_stdin(dataset)
        .assert()
        .success()
        .stdout(predicate::str::contains("12:30 AM  booked     MRI"))
        .stdout(predicate::str::contains("01:30 AM  available"));
}

#[test]
fn grid_uses_label_format_from_config() {
    slots()
        .args([
            "--config", hourly_config_path(),
            "grid", "--date", "2025-04-15", "--doctor", "1", "-i", clinic_json_path(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("23:00  booked"));
}

// ─────────────────────────────────────────────────────────────────────────────
// starts
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn starts_skip_booked_appointment() {
    slots()
        .args([
            "starts", "--date", "2025-04-17", "--doctor", "1", "--duration", "30", "-i",
            clinic_json_path(),
        ])
        .assert()
        .success()
        .stdout("08:00\n08:30\n09:30\n10:00\n10:30\n11:00\n11:30\n");
}

#[test]
fn starts_in_overnight_shift_mark_next_day() {
    slots()
        .args([
            "starts", "--date", "2025-04-15", "--doctor", "1", "--duration", "30", "-i",
            clinic_json_path(),
        ])
        .assert()
        .success()
        .stdout("22:00\n22:30\n23:30\n00:00 (+1)\n01:30 (+1)\n");
}

#[test]
fn starts_json_carries_absolute_instants() {
    let output = slots()
        .args([
            "starts", "--date", "2025-04-15", "--doctor", "1", "--duration", "60", "-i",
            clinic_json_path(), "--json",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let starts: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        starts,
        serde_json::json!([
            { "time": "22:00", "starts_at": "2025-04-15T22:00:00" },
            { "time": "23:30", "starts_at": "2025-04-15T23:30:00" }
        ])
    );
}

#[test]
fn starts_without_shift_prints_nothing() {
    slots()
        .args([
            "starts", "--date", "2025-04-16", "--doctor", "1", "--duration", "30", "-i",
            clinic_json_path(),
        ])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn starts_honour_configured_granularity() {
    slots()
        .args([
            "--config", hourly_config_path(),
            "starts", "--date", "2025-04-17", "--doctor", "1", "--duration", "60", "-i",
            clinic_json_path(),
        ])
        .assert()
        .success()
        .stdout("08:00\n10:00\n11:00\n");
}

#[test]
fn zero_granularity_config_is_rejected() {
    slots()
        .args([
            "--config", zero_granularity_config_path(),
            "starts", "--date", "2025-04-17", "--doctor", "1", "--duration", "30", "-i",
            clinic_json_path(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid slot granularity"));
}

#[test]
fn env_config_falls_back_on_unparsable_value() {
    slots()
        .env("SLOT_GRANULARITY_MINUTES", "abc")
        .args([
            "starts", "--date", "2025-04-17", "--doctor", "1", "--duration", "30", "-i",
            clinic_json_path(),
        ])
        .assert()
        .success()
        .stdout("08:00\n08:30\n09:30\n10:00\n10:30\n11:00\n11:30\n")
        .stderr(predicate::str::contains("SLOT_GRANULARITY_MINUTES has invalid value"));
}

#[test]
fn env_config_applies_valid_values_next_to_invalid_ones() {
    // 14 hours before appointment 1: rejected with the default 24-hour notice.
    slots()
        .env("SLOT_GRANULARITY_MINUTES", "abc")
        .env("CANCELLATION_NOTICE_HOURS", "12")
        .args([
            "cancel", "--appointment", "1", "--now", "2025-04-15T09:00:00", "-i",
            clinic_json_path(),
        ])
        .assert()
        .success()
        .stdout("cancellable\n");
}

#[test]
fn env_config_granularity_override() {
    slots()
        .env("SLOT_GRANULARITY_MINUTES", "60")
        .args([
            "starts", "--date", "2025-04-17", "--doctor", "1", "--duration", "60", "-i",
            clinic_json_path(),
        ])
        .assert()
        .success()
        .stdout("08:00\n10:00\n11:00\n");
}

#[test]
fn huge_duration_is_an_error_not_a_crash() {
    slots()
        .args([
            "starts", "--date", "2025-04-17", "--doctor", "1", "--duration",
            "200000000000000", "-i", clinic_json_path(),
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Duration out of range"));
}

// ─────────────────────────────────────────────────────────────────────────────
// check
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn check_accepts_free_slot() {
    slots()
        .args([
            "check", "--doctor", "1", "--patient", "9", "--at", "2025-04-15T23:30:00", "-i",
            clinic_json_path(),
        ])
        .assert()
        .success()
        .stdout("available\n");
}

#[test]
fn check_rejects_doctor_conflict() {
    slots()
        .args([
            "check", "--doctor", "1", "--patient", "9", "--at", "2025-04-15T23:00:00", "-i",
            clinic_json_path(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Booking rejected"))
        .stderr(predicate::str::contains("already booked for doctor with id 1"));
}

#[test]
fn check_rejects_patient_double_booking() {
    slots()
        .args([
            "check", "--doctor", "2", "--patient", "7", "--at", "2025-04-15T23:00:00", "-i",
            clinic_json_path(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("patient with id 7"));
}

#[test]
fn check_overlap_flag_catches_offset_start() {
    let args = [
        "check", "--doctor", "1", "--patient", "9", "--at", "2025-04-15T23:15:00", "-i",
        clinic_json_path(),
    ];

    slots().args(args).assert().success().stdout("available\n");
    slots().args(args).arg("--overlap").assert().failure();
}

#[test]
fn check_rejects_date_beyond_booking_horizon() {
    slots()
        .args([
            "check", "--doctor", "1", "--patient", "9", "--at", "2025-04-15T23:30:00", "--today",
            "2025-03-01", "-i", clinic_json_path(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside the booking window"));
}

// ─────────────────────────────────────────────────────────────────────────────
// shifts, cancel, upcoming
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn shifts_list_includes_overnight_end_date() {
    slots()
        .args(["shifts", "--doctor", "1", "-i", clinic_json_path()])
        .assert()
        .success()
        .stdout("2025-04-15\n2025-04-16\n2025-04-17\n");
}

#[test]
fn cancel_respects_notice_period() {
    slots()
        .args([
            "cancel", "--appointment", "1", "--now", "2025-04-14T09:00:00", "-i",
            clinic_json_path(),
        ])
        .assert()
        .success()
        .stdout("cancellable\n");

    slots()
        .args([
            "cancel", "--appointment", "1", "--now", "2025-04-15T09:00:00", "-i",
            clinic_json_path(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cancellation rejected"));
}

#[test]
fn cancel_unknown_appointment_fails() {
    slots()
        .args([
            "cancel", "--appointment", "99", "--now", "2025-04-14T09:00:00", "-i",
            clinic_json_path(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Appointment 99 not found"));
}

#[test]
fn upcoming_lists_future_appointments_in_order() {
    slots()
        .args([
            "upcoming", "--patient", "7", "--now", "2025-04-15T12:00:00", "-i", clinic_json_path(),
        ])
        .assert()
        .success()
        .stdout("2025-04-15 23:00:00  X-Ray\n2025-04-16 00:30:00  MRI\n");
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn missing_input_file_fails() {
    slots()
        .args(["grid", "--date", "2025-04-15", "--doctor", "1", "-i", "/nonexistent/clinic.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn unknown_doctor_fails() {
    slots()
        .args(["shifts", "--doctor", "42", "-i", clinic_json_path()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown doctor 42"));
}

#[test]
fn malformed_dataset_fails() {
    slots()
        .args(["shifts", "--doctor", "1"])
        .write_stdin("{ not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse dataset JSON"));
}
