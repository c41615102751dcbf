//! Unit tests for the role and field-level write gates.
//!
//! Run with: cargo test --test permissions_unit_test

use fleet_db::auth::Role;
use fleet_db::auth::permissions::{check_order_update, require_admin, require_writer};
use fleet_db::error::AppError;

fn is_forbidden<T: std::fmt::Debug>(result: Result<T, AppError>) -> bool {
    matches!(result, Err(AppError::Forbidden(_)))
}

#[test]
fn admin_may_submit_any_field_combination() {
    assert!(check_order_update(Role::Admin, &["po_number", "fuel_price"]).is_ok());
    assert!(check_order_update(Role::Admin, &["contract_no", "issued_to_id"]).is_ok());
    assert!(check_order_update(Role::Admin, &[]).is_ok());
    // Even unknown fields pass the gate for admins; they are dropped later
    assert!(check_order_update(Role::Admin, &["nonsense"]).is_ok());
}

#[test]
fn employee_touching_an_admin_field_is_rejected() {
    assert!(is_forbidden(check_order_update(Role::Employee, &["po_number"])));
    assert!(is_forbidden(check_order_update(
        Role::Employee,
        &["fuel_price", "contract_no"]
    )));
    assert!(is_forbidden(check_order_update(
        Role::Employee,
        &["issued_to_id"]
    )));
}

#[test]
fn employee_within_the_allowed_set_passes() {
    assert!(
        check_order_update(
            Role::Employee,
            &[
                "location_id",
                "start_date",
                "end_date",
                "inverter_id",
                "generator_id",
                "remarks",
                "site_contact_id",
                "fuel_price",
                "co2_emission_per_litre",
            ]
        )
        .is_ok()
    );
}

#[test]
fn employee_submitting_an_unknown_field_is_rejected() {
    assert!(is_forbidden(check_order_update(
        Role::Employee,
        &["remarks", "nonsense"]
    )));
}

#[test]
fn guests_cannot_write_at_all() {
    assert!(is_forbidden(check_order_update(Role::Guest, &["remarks"])));
    assert!(is_forbidden(check_order_update(Role::Guest, &[])));
    assert!(is_forbidden(require_writer(Role::Guest)));
}

#[test]
fn writers_and_admins() {
    assert!(require_writer(Role::Admin).is_ok());
    assert!(require_writer(Role::Employee).is_ok());

    assert!(require_admin(Role::Admin).is_ok());
    assert!(is_forbidden(require_admin(Role::Employee)));
    assert!(is_forbidden(require_admin(Role::Guest)));
}
