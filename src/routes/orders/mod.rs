mod handlers;
mod types;

pub use handlers::{
    create_order, delete_order, get_order, list_orders, offhire_order, update_order,
};
pub use types::{OffhireResponse, OrderCreatePayload, OrderResponse, OrderUpdatePayload};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_create_order, __path_delete_order, __path_get_order, __path_list_orders,
    __path_offhire_order, __path_update_order,
};
