mod handlers;
mod import;
mod types;

pub use handlers::{create_usage, delete_usage, get_usage, list_usages, update_usage};
pub use import::{ImportOutcome, UsageRow, parse_csv, parse_date, resolve_rows, upload_usages};
pub use types::{ImportResponse, UsagePayload, UsageResponse, UsageUpdate, UsagesQuery};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_create_usage, __path_delete_usage, __path_get_usage, __path_list_usages,
    __path_update_usage,
};
pub use import::__path_upload_usages;
