//! Unit tests for the bulk usage CSV parser.
//!
//! Run with: cargo test --test import_unit_test

use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use fleet_db::entity::inverters::InverterStatus;
use fleet_db::entity::{inverters, orders};
use fleet_db::error::AppError;
use fleet_db::routes::usages::{UsageRow, parse_csv, parse_date, resolve_rows};

const HEADER: &str = "inverter_unit_id,po_number,date,kw_consumed,generator_run_hour,site_run_hour";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn parses_a_well_formed_row() {
    let body = format!("{HEADER}\nH70,PO123,2026-01-05,120.5,6,24\n");
    let rows = parse_csv(body.as_bytes()).unwrap();

    assert_eq!(rows.len(), 1);
    let (row_no, row) = &rows[0];
    assert_eq!(*row_no, 2);
    let row = row.as_ref().unwrap();
    assert_eq!(row.unit_id, "H70");
    // PO numbers are matched case-insensitively downstream
    assert_eq!(row.po_number.as_deref(), Some("po123"));
    assert_eq!(row.date, date(2026, 1, 5));
    assert_eq!(row.kw_consumed, 120.5);
    assert_eq!(row.generator_run_hours, 6.0);
    assert_eq!(row.site_run_hours, 24.0);
}

#[test]
fn site_run_hour_defaults_to_24_when_column_is_absent() {
    let body = "inverter_unit_id,po_number,date,kw_consumed,generator_run_hour\nH70,PO123,2026-01-05,120.5,6\n";
    let rows = parse_csv(body.as_bytes()).unwrap();

    assert_eq!(rows[0].1.as_ref().unwrap().site_run_hours, 24.0);
}

#[test]
fn empty_po_number_imports_without_order_linkage() {
    let body = format!("{HEADER}\nH70,,2026-01-05,120.5,6,24\n");
    let rows = parse_csv(body.as_bytes()).unwrap();

    assert_eq!(rows[0].1.as_ref().unwrap().po_number, None);
}

#[test]
fn missing_required_column_fails_the_whole_file() {
    // No date column
    let body = "inverter_unit_id,po_number,kw_consumed,generator_run_hour\nH70,PO123,120.5,6\n";
    let err = parse_csv(body.as_bytes()).unwrap_err();

    match err {
        AppError::BadRequest(msg) => assert!(msg.contains("date"), "unexpected message: {msg}"),
        other => panic!("expected BadRequest, got {other:?}"),
    }
}

#[test]
fn bad_rows_are_skipped_with_reasons_not_fatal() {
    let body = format!(
        "{HEADER}\n\
         H70,PO123,not-a-date,120.5,6,24\n\
         H71,PO124,2026-01-05,abc,6,24\n\
         H72,PO125,2026-01-06,100,5,24\n"
    );
    let rows = parse_csv(body.as_bytes()).unwrap();
    assert_eq!(rows.len(), 3);

    let reason = rows[0].1.as_ref().unwrap_err();
    assert!(reason.contains("row 2"), "unexpected reason: {reason}");
    assert!(reason.contains("unparseable date"), "unexpected reason: {reason}");

    let reason = rows[1].1.as_ref().unwrap_err();
    assert!(reason.contains("row 3"), "unexpected reason: {reason}");
    assert!(reason.contains("kw_consumed"), "unexpected reason: {reason}");

    // The good row after the bad ones still parses
    assert!(rows[2].1.is_ok());
}

#[test]
fn headers_are_matched_case_insensitively() {
    // Sheets exported from the office template capitalize the unit column
    let body = "Inverter_unit_id,po_number,date,kw_consumed,generator_run_hour\nH70,PO123,2026-01-05,120.5,6\n";
    let rows = parse_csv(body.as_bytes()).unwrap();

    assert!(rows[0].1.is_ok());
}

fn inverter(unit_id: &str) -> inverters::Model {
    inverters::Model {
        id: Uuid::new_v4(),
        unit_id: unit_id.to_string(),
        model: "10/46".to_string(),
        given_name: unit_id.to_string(),
        given_start_name: unit_id.to_string(),
        serial_no: format!("HZE-{unit_id}"),
        status: InverterStatus::Hired,
        remarks: None,
        vrm_installation_id: None,
        location_id: None,
    }
}

fn order(po_number: &str) -> orders::Model {
    orders::Model {
        id: Uuid::new_v4(),
        po_number: po_number.to_string(),
        contract_no: "C-1".to_string(),
        issued_to_id: None,
        location_id: None,
        inverter_id: None,
        generator_id: None,
        site_contact_id: None,
        start_date: None,
        end_date: None,
        purchase_date: None,
        remarks: None,
        fuel_price: None,
        co2_emission_per_litre: None,
        created_by: None,
    }
}

fn usage_row(unit_id: &str, po: Option<&str>, day: u32) -> UsageRow {
    UsageRow {
        unit_id: unit_id.to_string(),
        po_number: po.map(str::to_string),
        date: date(2026, 1, day),
        kw_consumed: 100.0,
        generator_run_hours: 6.0,
        site_run_hours: 24.0,
    }
}

#[test]
fn unknown_inverter_is_skipped_and_recorded_not_fatal() {
    let h70 = inverter("H70");
    let inverter_map = HashMap::from([("H70".to_string(), h70)]);
    let order_map = HashMap::new();

    let rows = vec![
        (2, Ok(usage_row("GHOST", None, 5))),
        (3, Ok(usage_row("H70", None, 5))),
    ];

    let outcome = resolve_rows(rows, &inverter_map, &order_map, &HashSet::new());

    assert_eq!(outcome.success_count, 1);
    assert_eq!(outcome.new_usages.len(), 1);
    assert_eq!(outcome.skipped_rows, vec!["Inverter not found: GHOST"]);
}

#[test]
fn existing_triple_is_a_silent_no_op() {
    let h70 = inverter("H70");
    let po = order("17888");
    let existing = HashSet::from([(h70.id, Some(po.id), date(2026, 1, 5))]);
    let inverter_map = HashMap::from([("H70".to_string(), h70)]);
    let order_map = HashMap::from([("17888".to_string(), po)]);

    let rows = vec![
        (2, Ok(usage_row("H70", Some("17888"), 5))), // already persisted
        (3, Ok(usage_row("H70", Some("17888"), 6))), // new day
    ];

    let outcome = resolve_rows(rows, &inverter_map, &order_map, &existing);

    // The duplicate is dropped without an error entry
    assert_eq!(outcome.success_count, 1);
    assert!(outcome.skipped_rows.is_empty());
}

#[test]
fn duplicate_rows_within_one_file_collapse_to_one() {
    let h70 = inverter("H70");
    let inverter_map = HashMap::from([("H70".to_string(), h70)]);

    let rows = vec![
        (2, Ok(usage_row("H70", None, 5))),
        (3, Ok(usage_row("H70", None, 5))),
    ];

    let outcome = resolve_rows(rows, &inverter_map, &HashMap::new(), &HashSet::new());

    assert_eq!(outcome.success_count, 1);
    assert!(outcome.skipped_rows.is_empty());
}

#[test]
fn unmatched_po_imports_without_order_linkage() {
    let h70 = inverter("H70");
    let inverter_map = HashMap::from([("H70".to_string(), h70)]);

    let rows = vec![(2, Ok(usage_row("H70", Some("no-such-po"), 5)))];

    let outcome = resolve_rows(rows, &inverter_map, &HashMap::new(), &HashSet::new());

    assert_eq!(outcome.success_count, 1);
    assert!(outcome.skipped_rows.is_empty());
}

#[test]
fn skip_reasons_keep_row_order() {
    let h70 = inverter("H70");
    let inverter_map = HashMap::from([("H70".to_string(), h70)]);

    let rows = vec![
        (2, Err("Invalid data format at row 2: unparseable date 'x'".to_string())),
        (3, Ok(usage_row("GHOST", None, 5))),
        (4, Ok(usage_row("H70", None, 6))),
    ];

    let outcome = resolve_rows(rows, &inverter_map, &HashMap::new(), &HashSet::new());

    assert_eq!(
        outcome.skipped_rows,
        vec![
            "Invalid data format at row 2: unparseable date 'x'".to_string(),
            "Inverter not found: GHOST".to_string(),
        ]
    );
    assert_eq!(outcome.success_count, 1);
}

#[test]
fn date_formats_from_the_site_sheets_parse() {
    assert_eq!(parse_date("2026-01-05"), Some(date(2026, 1, 5)));
    assert_eq!(parse_date("05/01/2026"), Some(date(2026, 1, 5)));
    assert_eq!(parse_date("2026/01/05"), Some(date(2026, 1, 5)));
    // Datetime exports carry a midnight component
    assert_eq!(parse_date("2026-01-05 00:00:00"), Some(date(2026, 1, 5)));
    assert_eq!(parse_date(" 2026-01-05 "), Some(date(2026, 1, 5)));

    assert_eq!(parse_date("garbage"), None);
    assert_eq!(parse_date("2026-13-40"), None);
    assert_eq!(parse_date(""), None);
}
