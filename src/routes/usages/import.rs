//! Bulk usage import from a CSV upload.
//!
//! Row-level isolation: a malformed or unresolvable row is recorded and
//! skipped, never fatal to the batch. Only an unreadable file or missing
//! required columns fail the request. Rows already present for the same
//! (inverter, order, date) are silently dropped.

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::auth::{AuthUser, permissions};
use crate::common::AppState;
use crate::entity::{inverters, orders, usages};
use crate::error::{AppError, AppResult};

use super::types::ImportResponse;

/// Batch size for bulk inserts
const BATCH_SIZE: usize = 1000;

const REQUIRED_COLUMNS: &[&str] = &[
    "inverter_unit_id",
    "po_number",
    "date",
    "kw_consumed",
    "generator_run_hour",
];

/// One data row as read from the upload, before database resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageRow {
    pub unit_id: String,
    /// Lowercased PO number; None when the cell was empty
    pub po_number: Option<String>,
    pub date: NaiveDate,
    pub kw_consumed: f64,
    pub generator_run_hours: f64,
    pub site_run_hours: f64,
}

/// Parse a spreadsheet date cell.
///
/// Accepts ISO dates, the day-first format the site sheets use, and a
/// datetime prefix (exports often carry a midnight time component).
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date_part = value.split_whitespace().next().unwrap_or(value);

    for format in ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, format) {
            return Some(date);
        }
    }
    None
}

/// Parse the CSV body into rows, keyed by 1-based sheet row number
/// (row 1 is the header).
///
/// Each data row yields either a parsed [`UsageRow`] or a human-readable
/// skip reason. Column names are trimmed and lowercased before matching.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if the file is not readable as CSV or a
/// required column is missing.
pub fn parse_csv(data: &[u8]) -> AppResult<Vec<(usize, Result<UsageRow, String>)>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::BadRequest(format!("File read error: {e}")))?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let column_index: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.as_str(), i))
        .collect();

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !column_index.contains_key(*c))
        .copied()
        .collect();
    if !missing.is_empty() {
        return Err(AppError::BadRequest(format!(
            "Missing required columns: {}",
            missing.join(", ")
        )));
    }

    let get = |record: &csv::StringRecord, column: &str| -> String {
        column_index
            .get(column)
            .and_then(|&i| record.get(i))
            .unwrap_or_default()
            .trim()
            .to_string()
    };

    let mut rows = Vec::new();

    for (i, record) in reader.records().enumerate() {
        // Sheet row number: 1-based, after the header row
        let row_no = i + 2;

        let record = match record {
            Ok(r) => r,
            Err(e) => {
                rows.push((row_no, Err(format!("Invalid data format at row {row_no}: {e}"))));
                continue;
            }
        };

        let unit_id = get(&record, "inverter_unit_id");
        if unit_id.is_empty() {
            rows.push((
                row_no,
                Err(format!("Invalid data format at row {row_no}: empty inverter_unit_id")),
            ));
            continue;
        }

        let po_cell = get(&record, "po_number");
        let po_number = if po_cell.is_empty() {
            None
        } else {
            Some(po_cell.to_lowercase())
        };

        let date_cell = get(&record, "date");
        let Some(date) = parse_date(&date_cell) else {
            rows.push((
                row_no,
                Err(format!(
                    "Invalid data format at row {row_no}: unparseable date '{date_cell}'"
                )),
            ));
            continue;
        };

        let kw_consumed = match get(&record, "kw_consumed").parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                rows.push((
                    row_no,
                    Err(format!(
                        "Invalid data format at row {row_no}: non-numeric kw_consumed"
                    )),
                ));
                continue;
            }
        };

        let generator_run_hours = match get(&record, "generator_run_hour").parse::<f64>() {
            Ok(v) => v,
            Err(_) => {
                rows.push((
                    row_no,
                    Err(format!(
                        "Invalid data format at row {row_no}: non-numeric generator_run_hour"
                    )),
                ));
                continue;
            }
        };

        // Optional column, default 24
        let site_cell = get(&record, "site_run_hour");
        let site_run_hours = if site_cell.is_empty() {
            24.0
        } else {
            match site_cell.parse::<f64>() {
                Ok(v) => v,
                Err(_) => {
                    rows.push((
                        row_no,
                        Err(format!(
                            "Invalid data format at row {row_no}: non-numeric site_run_hour"
                        )),
                    ));
                    continue;
                }
            }
        };

        rows.push((
            row_no,
            Ok(UsageRow {
                unit_id,
                po_number,
                date,
                kw_consumed,
                generator_run_hours,
                site_run_hours,
            }),
        ));
    }

    Ok(rows)
}

/// Result of resolving parsed rows against the fleet.
#[derive(Debug, Default)]
pub struct ImportOutcome {
    pub new_usages: Vec<usages::ActiveModel>,
    pub skipped_rows: Vec<String>,
    pub success_count: usize,
}

/// Resolve parsed rows against the inverter and order maps, dropping
/// duplicates of keys already persisted or already queued in this batch.
///
/// Skip reasons keep the original row order: a parse failure and an unknown
/// inverter land in the same list, interleaved as they appeared in the file.
#[must_use]
pub fn resolve_rows(
    rows: Vec<(usize, Result<UsageRow, String>)>,
    inverter_map: &HashMap<String, inverters::Model>,
    order_map: &HashMap<String, orders::Model>,
    existing_keys: &HashSet<(Uuid, Option<Uuid>, NaiveDate)>,
) -> ImportOutcome {
    let mut outcome = ImportOutcome::default();
    let mut queued_keys: HashSet<(Uuid, Option<Uuid>, NaiveDate)> = HashSet::new();

    for (_, row) in rows {
        let row = match row {
            Ok(row) => row,
            Err(reason) => {
                outcome.skipped_rows.push(reason);
                continue;
            }
        };

        let Some(inverter) = inverter_map.get(&row.unit_id) else {
            outcome
                .skipped_rows
                .push(format!("Inverter not found: {}", row.unit_id));
            continue;
        };

        // Unmatched PO still imports, just without order linkage
        let order = row.po_number.as_deref().and_then(|po| order_map.get(po));
        let order_id = order.map(|o| o.id);

        let key = (inverter.id, order_id, row.date);
        if existing_keys.contains(&key) || !queued_keys.insert(key) {
            // Silent skip: re-imports of the same sheet are a no-op
            continue;
        }

        outcome.new_usages.push(usages::ActiveModel {
            id: Set(Uuid::new_v4()),
            inverter_id: Set(inverter.id),
            order_id: Set(order_id),
            is_yard: Set(false),
            date: Set(row.date),
            kw_consumed: Set(row.kw_consumed),
            generator_run_hours: Set(row.generator_run_hours),
            site_run_hours: Set(row.site_run_hours),
            created_at: sea_orm::ActiveValue::NotSet,
            updated_at: sea_orm::ActiveValue::NotSet,
        });
        outcome.success_count += 1;
    }

    outcome
}

/// Bulk-import usage rows from a CSV upload
///
/// Malformed rows and unknown inverters are reported in `skipped_rows`;
/// duplicates of already-persisted (inverter, PO, date) triples are silently
/// dropped. The whole request fails only on an unreadable file or missing
/// required columns.
#[utoipa::path(
    post,
    path = "/api/usages/upload",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "File processed", body = ImportResponse),
        (status = 400, description = "No file, unreadable file, or missing columns"),
        (status = 403, description = "Guests have read-only access"),
    ),
    tag = "usages"
)]
pub async fn upload_usages(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<ImportResponse>)> {
    permissions::require_writer(user.role)?;

    let mut data: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("File read error: {e}")))?;
            data = Some(bytes.to_vec());
        }
    }
    let data = data.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;

    let rows = parse_csv(&data)?;

    // Prefetch lookups: avoids a query per row
    let inverter_map: HashMap<String, inverters::Model> = inverters::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|i| (i.unit_id.clone(), i))
        .collect();
    let order_map: HashMap<String, orders::Model> = orders::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|o| (o.po_number.to_lowercase(), o))
        .collect();

    // Existing (inverter, order, date) keys for the inverters in this file,
    // collected in one query up front
    let involved_inverters: Vec<Uuid> = rows
        .iter()
        .filter_map(|(_, row)| row.as_ref().ok())
        .filter_map(|row| inverter_map.get(&row.unit_id).map(|i| i.id))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let existing_keys: HashSet<(Uuid, Option<Uuid>, NaiveDate)> = if involved_inverters.is_empty() {
        HashSet::new()
    } else {
        usages::Entity::find()
            .filter(usages::Column::InverterId.is_in(involved_inverters))
            .all(&state.db)
            .await?
            .into_iter()
            .map(|u| (u.inverter_id, u.order_id, u.date))
            .collect()
    };

    let ImportOutcome {
        new_usages,
        skipped_rows,
        success_count,
    } = resolve_rows(rows, &inverter_map, &order_map, &existing_keys);

    // One bulk insert at the end; residual uniqueness conflicts from
    // concurrent imports are ignored at the storage layer
    for chunk in new_usages.chunks(BATCH_SIZE) {
        if let Err(e) = usages::Entity::insert_many(chunk.to_vec())
            .on_conflict(
                sea_orm::sea_query::OnConflict::columns([
                    usages::Column::InverterId,
                    usages::Column::OrderId,
                    usages::Column::Date,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec(&state.db)
            .await
        {
            // "None of the records are inserted" is expected from
            // ON CONFLICT DO NOTHING when the whole batch already exists
            let msg = e.to_string();
            if !msg.contains("None of the records") && !msg.contains("duplicate") {
                tracing::warn!(
                    error = %e,
                    batch_size = chunk.len(),
                    "Failed to insert usage batch"
                );
                return Err(e.into());
            }
        }
    }

    tracing::info!(
        imported = success_count,
        skipped = skipped_rows.len(),
        "usage import complete"
    );

    Ok((
        StatusCode::CREATED,
        Json(ImportResponse {
            message: format!("{success_count} records processed successfully."),
            skipped_rows,
        }),
    ))
}
