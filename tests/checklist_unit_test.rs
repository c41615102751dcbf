//! Unit tests for checklist duration and status reporting.
//!
//! Run with: cargo test --test checklist_unit_test

use chrono::{NaiveDate, NaiveTime};
use fleet_db::entity::checklists::UnitStatus;
use fleet_db::entity::inverters::InverterStatus;
use fleet_db::routes::checklists::{fleet_status_for, reported_status, test_duration_minutes};

fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn duration_within_one_day() {
    assert_eq!(test_duration_minutes(time(10, 0), time(11, 45)), 105);
    assert_eq!(test_duration_minutes(time(9, 30), time(9, 30)), 0);
}

#[test]
fn duration_wraps_past_midnight() {
    // Overnight soak test: 23:00 to 01:30 is 2.5 hours, not negative
    assert_eq!(test_duration_minutes(time(23, 0), time(1, 30)), 150);
    assert_eq!(test_duration_minutes(time(23, 59), time(0, 0)), 1);
}

#[test]
fn fresh_checklist_reports_the_stored_status() {
    let status = reported_status(
        date(2026, 7, 20),
        date(2026, 8, 6),
        Some(InverterStatus::ReadyToHire),
    );
    assert_eq!(status.as_deref(), Some("Ready to Hire"));

    let status = reported_status(
        date(2026, 7, 20),
        date(2026, 8, 6),
        Some(InverterStatus::Breakdown),
    );
    assert_eq!(status.as_deref(), Some("Breakdown"));
}

#[test]
fn expired_checklist_reverts_to_testing() {
    // 30-day validity: day 31 after the test no longer vouches for the unit
    let status = reported_status(
        date(2026, 6, 1),
        date(2026, 8, 6),
        Some(InverterStatus::ReadyToHire),
    );
    assert_eq!(status.as_deref(), Some("Testing"));
}

#[test]
fn expiry_boundary_is_inclusive() {
    // Exactly 30 days old still reports the stored status
    let status = reported_status(
        date(2026, 7, 7),
        date(2026, 8, 6),
        Some(InverterStatus::ReadyToHire),
    );
    assert_eq!(status.as_deref(), Some("Ready to Hire"));

    // One day past the window flips to Testing
    let status = reported_status(
        date(2026, 7, 6),
        date(2026, 8, 6),
        Some(InverterStatus::ReadyToHire),
    );
    assert_eq!(status.as_deref(), Some("Testing"));
}

#[test]
fn missing_inverter_yields_no_status_while_fresh() {
    assert_eq!(reported_status(date(2026, 8, 1), date(2026, 8, 6), None), None);
}

#[test]
fn test_outcome_drives_the_fleet_status() {
    assert_eq!(
        fleet_status_for(UnitStatus::ReadyForHire),
        InverterStatus::ReadyToHire
    );
    assert_eq!(
        fleet_status_for(UnitStatus::UnderMaintenance),
        InverterStatus::Breakdown
    );
}
