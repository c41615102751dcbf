use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use std::collections::HashMap;

use crate::entity::inverters;
use crate::error::AppResult;
use crate::vrm::VrmClient;

/// Sync VRM installation ids onto the fleet.
///
/// Fetches all installations from the VRM portal and fills
/// `vrm_installation_id` on inverters matched by device serial number.
/// Unmatched serials are logged and skipped.
///
/// # Errors
///
/// Returns an error if the VRM API or database operations fail.
pub async fn sync_installations(db: &DatabaseConnection, vrm: &VrmClient) -> AppResult<()> {
    tracing::info!("Fetching installations from VRM...");

    let installations = vrm.get_installations().await?;

    // Build a map of existing inverters by serial number
    let inverter_map: HashMap<String, inverters::Model> = inverters::Entity::find()
        .all(db)
        .await?
        .into_iter()
        .map(|i| (i.serial_no.clone(), i))
        .collect();

    let total = installations.records.len();
    let mut updated = 0;

    for record in installations.records {
        let Some(serial_no) = record.device_serial.filter(|s| !s.is_empty()) else {
            continue;
        };

        let Some(inverter) = inverter_map.get(&serial_no) else {
            tracing::debug!(serial_no, "No inverter found for VRM installation");
            continue;
        };

        let site_id = record.id_site.to_string();
        if inverter.vrm_installation_id.as_deref() == Some(site_id.as_str()) {
            continue;
        }

        let mut model: inverters::ActiveModel = inverter.clone().into();
        model.vrm_installation_id = Set(Some(site_id.clone()));

        match model.update(db).await {
            Ok(_) => {
                updated += 1;
                tracing::debug!(
                    unit_id = inverter.unit_id,
                    site_id,
                    "Linked inverter to VRM installation"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    unit_id = inverter.unit_id,
                    "Failed to update VRM installation id"
                );
            }
        }
    }

    tracing::info!(updated, total, "VRM installation sync complete");

    Ok(())
}
