use serde::{Deserialize, Serialize};

/// Response from the VRM portal's `/installations` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallationsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub records: Vec<InstallationRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallationRecord {
    /// VRM site id, stored on the matched inverter.
    #[serde(rename = "idSite")]
    pub id_site: i64,
    /// Serial number of the installed device, matched against our fleet.
    #[serde(default)]
    pub device_serial: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}
