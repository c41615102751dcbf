//! Subject and body builders for the domain notifications.

/// Fields shared by the order e-mails.
#[derive(Debug, Clone, Default)]
pub struct OrderSummary {
    pub po_number: String,
    pub contract_no: String,
    pub client_name: Option<String>,
    pub inverter_name: Option<String>,
    pub location_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub remarks: Option<String>,
}

fn or_na(value: &Option<String>) -> &str {
    value.as_deref().filter(|s| !s.is_empty()).unwrap_or("N/A")
}

/// Notification for a freshly created purchase order.
#[must_use]
pub fn order_created(order: &OrderSummary) -> (String, String) {
    let subject = "New Purchase Order Created".to_string();
    let body = format!(
        "A new Purchase Order has been created.\n\
         \n\
         PO Number     : {}\n\
         Contract No   : {}\n\
         Client        : {}\n\
         Start Date    : {}\n\
         Inverter      : {}\n\
         End Date      : {}\n\
         Location      : {}\n\
         Remarks       : {}\n",
        order.po_number,
        order.contract_no,
        or_na(&order.client_name),
        or_na(&order.start_date),
        or_na(&order.inverter_name),
        or_na(&order.end_date),
        or_na(&order.location_name),
        order.remarks.as_deref().filter(|s| !s.is_empty()).unwrap_or("None"),
    );
    (subject, body)
}

/// Notification for an offhired unit, including who performed the action.
#[must_use]
pub fn order_offhired(order: &OrderSummary, offhired_by: &str) -> (String, String) {
    let subject = "Inverter Unit Offhired".to_string();
    let body = format!(
        "The following inverter unit has been offhired:\n\
         \n\
         Unit          : {}\n\
         PO Number     : {}\n\
         Contract No   : {}\n\
         Client        : {}\n\
         End Date      : {}\n\
         Location      : {}\n\
         Remarks       : {}\n\
         Offhired By   : {}\n",
        or_na(&order.inverter_name),
        order.po_number,
        order.contract_no,
        or_na(&order.client_name),
        or_na(&order.end_date),
        or_na(&order.location_name),
        order.remarks.as_deref().filter(|s| !s.is_empty()).unwrap_or("None"),
        offhired_by,
    );
    (subject, body)
}

/// Alert for a unit placed too far from the depot.
#[must_use]
pub fn distance_alert(unit_id: &str, distance_meters: f64) -> (String, String) {
    let subject = "Inverter Distance Alert".to_string();
    let body = format!(
        "Inverter '{unit_id}' is located {distance_meters:.2} meters from the default location."
    );
    (subject, body)
}
