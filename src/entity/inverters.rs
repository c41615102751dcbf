use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fleet status of an inverter unit.
///
/// Transitions happen only through domain events: order creation hires a
/// unit, offhire sends it to testing, and a checklist outcome moves it to
/// ready-to-hire or breakdown.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum InverterStatus {
    #[sea_orm(string_value = "Ready to Hire")]
    #[serde(rename = "Ready to Hire")]
    ReadyToHire,
    #[sea_orm(string_value = "Hired")]
    Hired,
    #[sea_orm(string_value = "Testing")]
    Testing,
    #[sea_orm(string_value = "Breakdown")]
    Breakdown,
}

impl InverterStatus {
    /// Case-insensitive lookup from a display name, for query-string filters.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "ready to hire" => Some(Self::ReadyToHire),
            "hired" => Some(Self::Hired),
            "testing" => Some(Self::Testing),
            "breakdown" => Some(Self::Breakdown),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReadyToHire => "Ready to Hire",
            Self::Hired => "Hired",
            Self::Testing => "Testing",
            Self::Breakdown => "Breakdown",
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = Inverter)]
#[sea_orm(table_name = "inverters")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub unit_id: String,
    pub model: String,
    pub given_name: String,
    pub given_start_name: String,
    pub serial_no: String,
    pub status: InverterStatus,
    pub remarks: Option<String>,
    /// VRM portal installation id, filled by the background sync.
    pub vrm_installation_id: Option<String>,
    pub location_id: Option<Uuid>,
}

impl Model {
    /// Display string like "H70 10/46 HZE-10/46-070".
    #[must_use]
    pub fn display_name(&self) -> String {
        [
            self.given_start_name.as_str(),
            self.model.as_str(),
            self.serial_no.as_str(),
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::locations::Entity",
        from = "Column::LocationId",
        to = "super::locations::Column::Id"
    )]
    Location,
    #[sea_orm(has_many = "super::orders::Entity")]
    Orders,
    #[sea_orm(has_many = "super::usages::Entity")]
    Usages,
    #[sea_orm(has_many = "super::sim_details::Entity")]
    SimDetails,
    #[sea_orm(has_many = "super::service_records::Entity")]
    ServiceRecords,
    #[sea_orm(has_many = "super::checklists::Entity")]
    Checklists,
}

impl Related<super::locations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Location.def()
    }
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl Related<super::usages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Usages.def()
    }
}

impl Related<super::sim_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SimDetails.def()
    }
}

impl Related<super::service_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceRecords.def()
    }
}

impl Related<super::checklists::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Checklists.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
