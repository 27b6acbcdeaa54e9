//! ERP snapshot documents.
//!
//! Accepted shapes:
//!
//! ```json
//! [ { "item_id": "SKU-1", "name": "Widget", "cost_price": "100",
//!     "tax_rate": 0.18, "stock_quantity": 4, "last_synced_price": 138.88 } ]
//! ```
//!
//! or the same array under `"records"`, optionally with `"fetched_at"`.
//!
//! Only structural faults fail the document: the wrong top-level shape,
//! a record that is not an object, or a record without `item_id` or
//! `name`. A numeric cell that cannot be read keeps its record in the
//! snapshot with the anomaly attached, so it shows up as a BLOCK row.

use pricesync_core::{CellValue, SnapshotRecord, TaxRate};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::error::InterchangeError;
use crate::number::{parse_cell, parse_decimal, parse_tax_rate};

/// A parsed snapshot, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotDocument {
    /// Fetch timestamp as reported by the fetch collaborator, verbatim.
    pub fetched_at: Option<String>,
    pub records: Vec<SnapshotRecord>,
}

/// Parse a snapshot document.
pub fn parse_snapshot(doc: &Value) -> Result<SnapshotDocument, InterchangeError> {
    let (fetched_at, records) = match doc {
        Value::Array(items) => (None, items),
        Value::Object(obj) => {
            let records = obj
                .get("records")
                .and_then(|r| r.as_array())
                .ok_or_else(|| {
                    InterchangeError::InvalidDocument("missing 'records' array".to_string())
                })?;
            let fetched_at = obj
                .get("fetched_at")
                .and_then(|v| v.as_str())
                .map(str::to_string);
            (fetched_at, records)
        }
        _ => {
            return Err(InterchangeError::InvalidDocument(
                "snapshot must be an array or an object with 'records'".to_string(),
            ))
        }
    };

    let records = records
        .iter()
        .enumerate()
        .map(|(index, value)| parse_record(index, value))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SnapshotDocument {
        fetched_at,
        records,
    })
}

/// Parse a bare array of records (e.g. the payload of a `load_snapshot` action).
pub(crate) fn parse_records(
    value: &Value,
    context: &str,
) -> Result<Vec<SnapshotRecord>, InterchangeError> {
    let items = value.as_array().ok_or_else(|| InterchangeError::Invalid {
        context: context.to_string(),
        message: "'records' must be an array".to_string(),
    })?;
    items
        .iter()
        .enumerate()
        .map(|(index, value)| parse_record(index, value))
        .collect()
}

fn parse_record(index: usize, value: &Value) -> Result<SnapshotRecord, InterchangeError> {
    let obj = value.as_object().ok_or_else(|| InterchangeError::Invalid {
        context: format!("record {}", index),
        message: "record must be an object".to_string(),
    })?;

    let item_id = item_id_of(obj).ok_or_else(|| InterchangeError::MissingField {
        context: format!("record {}", index),
        field: "item_id".to_string(),
    })?;
    let context = format!("record {} '{}'", index, item_id);

    let name = match obj.get("name") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => {
            return Err(InterchangeError::MissingField {
                context,
                field: "name".to_string(),
            })
        }
        Some(other) => other.to_string(),
    };

    let cost_price = required_cell(obj, "cost_price", &context);
    let stock_quantity = required_cell(obj, "stock_quantity", &context);
    let tax_rate = tax_rate_of(obj, &context);
    let last_synced_price = last_synced_price_of(obj, &context);

    Ok(SnapshotRecord {
        item_id,
        name,
        cost_price,
        tax_rate,
        stock_quantity,
        last_synced_price,
    })
}

/// Item identifiers may arrive as strings or as bare numbers.
fn item_id_of(obj: &Map<String, Value>) -> Option<String> {
    match obj.get("item_id")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// An absent or unreadable cell is kept as an anomaly for validation.
fn required_cell(obj: &Map<String, Value>, field: &str, context: &str) -> CellValue {
    let cell = optional_cell(obj, field).unwrap_or_else(|| CellValue::Unreadable(String::new()));
    if let CellValue::Unreadable(raw) = &cell {
        tracing::warn!(context, field, value = %raw, "cell is not a number");
    }
    cell
}

pub(crate) fn optional_cell(obj: &Map<String, Value>, field: &str) -> Option<CellValue> {
    match obj.get(field) {
        None | Some(Value::Null) => None,
        Some(value) => Some(parse_cell(value)),
    }
}

fn tax_rate_of(obj: &Map<String, Value>, context: &str) -> TaxRate {
    let rate = obj.get("tax_rate").and_then(parse_tax_rate);
    rate.unwrap_or_else(|| {
        tracing::warn!(context, field = "tax_rate", "tax rate is not a number");
        TaxRate::Unreadable
    })
}

/// An unreadable previous price is treated as never synced.
fn last_synced_price_of(obj: &Map<String, Value>, context: &str) -> Option<Decimal> {
    let value = obj.get("last_synced_price").filter(|v| !v.is_null())?;
    let price = parse_decimal(value);
    if price.is_none() {
        tracing::warn!(context, value = %value, "ignoring unreadable last_synced_price");
    }
    price
}
