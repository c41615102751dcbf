//! Derived fuel-savings metrics.
//!
//! Pure functions over a usage row plus its order's fuel parameters. Missing
//! operands resolve to defaults and a zero site-run day yields zeros, never
//! errors.

use crate::entity::{generators, orders};

/// Fuel price per litre when the order does not carry one.
pub const DEFAULT_FUEL_PRICE: f64 = 1.25;

/// Kilograms of CO₂ per litre of diesel when the order does not carry a factor.
pub const DEFAULT_CO2_PER_LITRE: f64 = 2.68;

/// Generator fuel-consumption fallback (L/h) used by usage list serialization.
/// The report endpoint historically assumes a larger generator; both values
/// are kept until product settles on one.
pub const LIST_FUEL_CONSUMPTION_FALLBACK: f64 = 6.8;

/// Generator fuel-consumption fallback (L/h) used by the usage report.
pub const REPORT_FUEL_CONSUMPTION_FALLBACK: f64 = 12.0;

/// Round to 2 decimal places, the precision of every reported metric.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Fuel parameters resolved from an order and its generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuelParams {
    /// Litres of diesel the displaced generator burns per hour.
    pub fuel_consumption: f64,
    pub fuel_price: f64,
    pub co2_per_litre: f64,
}

impl FuelParams {
    /// Resolve parameters, falling back to defaults for whatever is missing.
    /// `fuel_consumption_fallback` is call-site dependent: see
    /// [`LIST_FUEL_CONSUMPTION_FALLBACK`] and [`REPORT_FUEL_CONSUMPTION_FALLBACK`].
    #[must_use]
    pub fn resolve(
        order: Option<&orders::Model>,
        generator: Option<&generators::Model>,
        fuel_consumption_fallback: f64,
    ) -> Self {
        Self {
            fuel_consumption: generator
                .map(|g| g.fuel_consumption)
                .unwrap_or(fuel_consumption_fallback),
            fuel_price: order
                .and_then(|o| o.fuel_price)
                .unwrap_or(DEFAULT_FUEL_PRICE),
            co2_per_litre: order
                .and_then(|o| o.co2_emission_per_litre)
                .unwrap_or(DEFAULT_CO2_PER_LITRE),
        }
    }
}

/// Savings derived from one day of usage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavingsMetrics {
    /// Hours the site ran on inverter power instead of the generator.
    pub hours_saved: f64,
    /// Share of site runtime covered by the inverter; 0 when the site did not run.
    pub utilization_fraction: f64,
    /// Utilization as a percentage, the "battery percentage" on reports.
    /// Rounded from the raw fraction, not from `utilization_fraction`.
    pub battery_percentage: f64,
    /// Litres of diesel not burned.
    pub fuel_saved: f64,
    pub cost_saved: f64,
    pub co2_saved: f64,
}

/// Compute savings for one usage day. All outputs rounded to 2 decimals.
#[must_use]
pub fn savings(site_run_hours: f64, generator_run_hours: f64, params: FuelParams) -> SavingsMetrics {
    let hours_saved = site_run_hours - generator_run_hours;
    let raw_fraction = if site_run_hours == 0.0 {
        0.0
    } else {
        hours_saved / site_run_hours
    };
    let fuel_saved = round2(hours_saved * params.fuel_consumption);

    SavingsMetrics {
        hours_saved: round2(hours_saved),
        utilization_fraction: round2(raw_fraction),
        battery_percentage: round2(raw_fraction * 100.0),
        fuel_saved,
        cost_saved: round2(fuel_saved * params.fuel_price),
        co2_saved: round2(fuel_saved * params.co2_per_litre),
    }
}
