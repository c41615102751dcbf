//! Unit tests for the usage report fold.
//!
//! Run with: cargo test --test report_unit_test

use chrono::NaiveDate;
use fleet_db::entity::inverters::InverterStatus;
use fleet_db::entity::{generators, inverters, orders, usages};
use fleet_db::routes::reports::build_report;
use uuid::Uuid;

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

fn inverter() -> inverters::Model {
    inverters::Model {
        id: Uuid::new_v4(),
        unit_id: "H70".to_string(),
        model: "10/46".to_string(),
        given_name: "H70 Walls Murphystown".to_string(),
        given_start_name: "H70".to_string(),
        serial_no: "HZE-10/46-070".to_string(),
        status: InverterStatus::Hired,
        remarks: None,
        vrm_installation_id: None,
        location_id: None,
    }
}

fn order(inverter_id: Uuid) -> orders::Model {
    orders::Model {
        id: Uuid::new_v4(),
        po_number: "17888".to_string(),
        contract_no: "49044".to_string(),
        issued_to_id: None,
        location_id: None,
        inverter_id: Some(inverter_id),
        generator_id: None,
        site_contact_id: None,
        start_date: Some(date(1)),
        end_date: None,
        purchase_date: None,
        remarks: None,
        fuel_price: Some(1.25),
        co2_emission_per_litre: None,
        created_by: None,
    }
}

fn usage(inverter_id: Uuid, order_id: Uuid, day: u32, gen_hours: f64) -> usages::Model {
    usages::Model {
        id: Uuid::new_v4(),
        inverter_id,
        order_id: Some(order_id),
        is_yard: false,
        date: date(day),
        kw_consumed: 100.0,
        generator_run_hours: gen_hours,
        site_run_hours: 24.0,
        created_at: None,
        updated_at: None,
    }
}

#[test]
fn report_sums_daily_metrics_and_averages_battery_percentage() {
    let inv = inverter();
    let ord = order(inv.id);
    let generator = generators::Model {
        id: Uuid::new_v4(),
        generator_no: "G-42".to_string(),
        generator_size: 100,
        fuel_consumption: 10.0,
    };
    let rows = vec![
        usage(inv.id, ord.id, 1, 6.0),  // 18h saved, 75%
        usage(inv.id, ord.id, 2, 12.0), // 12h saved, 50%
    ];

    let report = build_report(
        &inv,
        &ord,
        Some("Walls".to_string()),
        Some("Murphystown".to_string()),
        Some(&generator),
        &rows,
    );

    assert_eq!(report.po_number, "17888");
    assert_eq!(report.client_name.as_deref(), Some("Walls"));
    assert_eq!(report.location_name.as_deref(), Some("Murphystown"));
    assert_eq!(report.generator.generator_no, "G-42");
    assert_eq!(report.generator.fuel_consumption, 10.0);
    assert_eq!(report.inverter_unit_id, "H70");
    assert_eq!(report.fuel_price, 1.25);
    // Order carries no CO2 factor, the default applies
    assert_eq!(report.co2_per_litre, 2.68);

    assert_eq!(report.daily_usage.len(), 2);
    assert_eq!(report.daily_usage[0].hours_saved, 18.0);
    assert_eq!(report.daily_usage[0].battery_percentage, 75.0);
    assert_eq!(report.daily_usage[0].fuel_saved, 180.0);
    assert_eq!(report.daily_usage[1].hours_saved, 12.0);
    assert_eq!(report.daily_usage[1].battery_percentage, 50.0);
    assert_eq!(report.daily_usage[1].fuel_saved, 120.0);

    assert_eq!(report.total_kw, 200.0);
    assert_eq!(report.total_hours_saved, 30.0);
    assert_eq!(report.total_fuel_saved, 300.0);
    assert_eq!(report.fuel_cost_saved, 375.0);
    assert_eq!(report.co2_saved, 804.0);
    assert_eq!(report.avg_usage_percent, 62.5);
}

#[test]
fn report_without_generator_assumes_the_large_generator_fallback() {
    let inv = inverter();
    let ord = order(inv.id);
    let rows = vec![usage(inv.id, ord.id, 1, 6.0)];

    let report = build_report(&inv, &ord, None, None, None, &rows);

    // No generator on the order: the report path assumes 12 L/h
    assert_eq!(report.generator.fuel_consumption, 12.0);
    assert_eq!(report.generator.generator_no, "");
    assert_eq!(report.daily_usage[0].fuel_saved, 216.0);
    assert_eq!(report.fuel_cost_saved, 270.0);
}

#[test]
fn report_with_no_usage_rows_is_all_zeros() {
    let inv = inverter();
    let ord = order(inv.id);

    let report = build_report(&inv, &ord, None, None, None, &[]);

    assert!(report.daily_usage.is_empty());
    assert_eq!(report.total_kw, 0.0);
    assert_eq!(report.total_hours_saved, 0.0);
    assert_eq!(report.avg_usage_percent, 0.0);
}
