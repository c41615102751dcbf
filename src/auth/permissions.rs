//! Role gates and the field-level write gate on order updates.

use super::Role;
use crate::error::{AppError, AppResult};

/// Order fields only admins may change.
pub const ADMIN_ONLY_FIELDS: &[&str] = &["po_number", "contract_no", "issued_to_id"];

/// Order fields employees may change.
pub const EMPLOYEE_FIELDS: &[&str] = &[
    "location_id",
    "start_date",
    "end_date",
    "inverter_id",
    "generator_id",
    "remarks",
    "site_contact_id",
    "fuel_price",
    "co2_emission_per_litre",
];

/// Guests are read-only; admins and employees may write.
///
/// # Errors
///
/// Returns `AppError::Forbidden` for the guest role.
pub fn require_writer(role: Role) -> AppResult<()> {
    match role {
        Role::Admin | Role::Employee => Ok(()),
        Role::Guest => Err(AppError::Forbidden(
            "Guests have read-only access".to_string(),
        )),
    }
}

/// Client records are admin-only, reads included.
///
/// # Errors
///
/// Returns `AppError::Forbidden` for any non-admin role.
pub fn require_admin(role: Role) -> AppResult<()> {
    if role == Role::Admin {
        Ok(())
    } else {
        Err(AppError::Forbidden("Admin access required".to_string()))
    }
}

/// Field-level gate on order updates.
///
/// Admins may submit any combination. Employees must not touch admin-only
/// fields and must stay within the employee-allowed set. Guests cannot write
/// at all.
///
/// # Errors
///
/// Returns `AppError::Forbidden` when the submitted field set violates the
/// actor's role.
pub fn check_order_update(role: Role, submitted_fields: &[&str]) -> AppResult<()> {
    match role {
        Role::Admin => Ok(()),
        Role::Employee => {
            if submitted_fields
                .iter()
                .any(|f| ADMIN_ONLY_FIELDS.contains(f))
            {
                return Err(AppError::Forbidden(
                    "Employees cannot update admin-only fields".to_string(),
                ));
            }
            if !submitted_fields.iter().all(|f| EMPLOYEE_FIELDS.contains(f)) {
                return Err(AppError::Forbidden(
                    "Some fields are not allowed to be updated by employees".to_string(),
                ));
            }
            Ok(())
        }
        Role::Guest => Err(AppError::Forbidden(
            "Guests have read-only access".to_string(),
        )),
    }
}
