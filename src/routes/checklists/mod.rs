mod handlers;
mod types;

pub use handlers::{
    create_checklist, delete_checklist, fleet_status_for, get_checklist, list_checklists,
    reported_status, test_duration_minutes, update_checklist,
};
pub use types::{
    BatteryVoltagePayload, ChecklistItemPayload, ChecklistPayload, ChecklistResponse,
    ChecklistUpdate,
};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_create_checklist, __path_delete_checklist, __path_get_checklist,
    __path_list_checklists, __path_update_checklist,
};
