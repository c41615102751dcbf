//! Unit tests for the derived-metrics calculator.
//!
//! Run with: cargo test --test metrics_unit_test

use fleet_db::entity::{generators, orders};
use fleet_db::metrics::{
    self, DEFAULT_CO2_PER_LITRE, DEFAULT_FUEL_PRICE, FuelParams, LIST_FUEL_CONSUMPTION_FALLBACK,
    REPORT_FUEL_CONSUMPTION_FALLBACK, round2,
};
use uuid::Uuid;

fn params(fuel_consumption: f64, fuel_price: f64, co2_per_litre: f64) -> FuelParams {
    FuelParams {
        fuel_consumption,
        fuel_price,
        co2_per_litre,
    }
}

#[test]
fn savings_match_the_reference_day() {
    // 24h site day, 6h on the generator, 10 L/h generator
    let m = metrics::savings(24.0, 6.0, params(10.0, 1.25, 2.68));

    assert_eq!(m.hours_saved, 18.0);
    assert_eq!(m.utilization_fraction, 0.75);
    assert_eq!(m.fuel_saved, 180.0);
    assert_eq!(m.cost_saved, 225.0);
    assert_eq!(m.co2_saved, 482.4);
    assert_eq!(m.battery_percentage, 75.0);
}

#[test]
fn zero_site_hours_yield_zero_utilization_not_a_panic() {
    let m = metrics::savings(0.0, 0.0, params(10.0, 1.25, 2.68));

    assert_eq!(m.hours_saved, 0.0);
    assert_eq!(m.utilization_fraction, 0.0);
    assert_eq!(m.fuel_saved, 0.0);
    assert_eq!(m.cost_saved, 0.0);
    assert_eq!(m.co2_saved, 0.0);
}

#[test]
fn generator_overrun_goes_negative_rather_than_clamping() {
    // More generator hours than site hours: the day reads as a net loss
    let m = metrics::savings(10.0, 12.0, params(10.0, 1.25, 2.68));

    assert_eq!(m.hours_saved, -2.0);
    assert_eq!(m.utilization_fraction, -0.2);
    assert_eq!(m.fuel_saved, -20.0);
}

#[test]
fn outputs_are_rounded_to_two_decimals() {
    let m = metrics::savings(24.0, 6.5, params(6.8, 1.25, 2.68));

    // 17.5 * 6.8 = 119.0; 119.0 * 2.68 = 318.92
    assert_eq!(m.hours_saved, 17.5);
    assert_eq!(m.fuel_saved, 119.0);
    assert_eq!(m.co2_saved, 318.92);
    // Percentage comes from the raw fraction, not the rounded one
    assert_eq!(m.utilization_fraction, 0.73);
    assert_eq!(m.battery_percentage, 72.92);
    assert_eq!(round2(1.005001), 1.01);
    assert_eq!(round2(0.7291666), 0.73);
}

fn bare_order(fuel_price: Option<f64>, co2: Option<f64>) -> orders::Model {
    orders::Model {
        id: Uuid::new_v4(),
        po_number: "PO-1".to_string(),
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
        fuel_price,
        co2_emission_per_litre: co2,
        created_by: None,
    }
}

#[test]
fn missing_operands_resolve_to_defaults() {
    let p = FuelParams::resolve(None, None, LIST_FUEL_CONSUMPTION_FALLBACK);
    assert_eq!(p.fuel_consumption, 6.8);
    assert_eq!(p.fuel_price, DEFAULT_FUEL_PRICE);
    assert_eq!(p.co2_per_litre, DEFAULT_CO2_PER_LITRE);

    let p = FuelParams::resolve(None, None, REPORT_FUEL_CONSUMPTION_FALLBACK);
    assert_eq!(p.fuel_consumption, 12.0);
}

#[test]
fn order_and_generator_values_win_over_defaults() {
    let order = bare_order(Some(1.80), Some(2.5));
    let generator = generators::Model {
        id: Uuid::new_v4(),
        generator_no: "G-42".to_string(),
        generator_size: 100,
        fuel_consumption: 9.5,
    };

    let p = FuelParams::resolve(Some(&order), Some(&generator), REPORT_FUEL_CONSUMPTION_FALLBACK);
    assert_eq!(p.fuel_consumption, 9.5);
    assert_eq!(p.fuel_price, 1.80);
    assert_eq!(p.co2_per_litre, 2.5);
}

#[test]
fn order_without_fuel_price_falls_back_per_field() {
    let order = bare_order(None, Some(2.5));

    let p = FuelParams::resolve(Some(&order), None, LIST_FUEL_CONSUMPTION_FALLBACK);
    assert_eq!(p.fuel_price, DEFAULT_FUEL_PRICE);
    assert_eq!(p.co2_per_litre, 2.5);
}
