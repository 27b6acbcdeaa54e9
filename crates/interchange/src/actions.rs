//! Edit sets and action logs, both read as sequences of core [`Action`]s.
//!
//! Edit set:
//!
//! ```json
//! { "SKU-1": { "cost_price": "110" }, "SKU-2": { "stock_quantity": 0 } }
//! ```
//!
//! Action log:
//!
//! ```json
//! [ { "type": "update_cell", "item_id": "SKU-1", "field": "cost_price", "value": 110 },
//!   { "type": "reset_row", "item_id": "SKU-1" },
//!   { "type": "reset_all" } ]
//! ```

use pricesync_core::{Action, EditableField};
use serde_json::{Map, Value};

use crate::error::InterchangeError;
use crate::number::parse_cell;
use crate::snapshot::{optional_cell, parse_records};

/// Turn an edit set into `UpdateCell` actions.
///
/// Items follow key order; within an item cost price precedes stock
/// quantity. Keys are trimmed like snapshot identifiers. Unknown keys
/// inside an edit are rejected so a typo cannot silently drop an intended
/// change; a value that is not a number is kept as typed and validation
/// blocks it.
pub fn parse_edits(doc: &Value) -> Result<Vec<Action>, InterchangeError> {
    let obj = doc.as_object().ok_or_else(|| {
        InterchangeError::InvalidDocument("edits must be an object keyed by item_id".to_string())
    })?;

    let mut actions = Vec::new();
    for (key, edit) in obj {
        let item_id = key.trim();
        let context = format!("edit '{}'", item_id);
        if item_id.is_empty() {
            return Err(InterchangeError::MissingField {
                context,
                field: "item_id".to_string(),
            });
        }
        let fields = edit.as_object().ok_or_else(|| InterchangeError::Invalid {
            context: context.clone(),
            message: "edit must be an object".to_string(),
        })?;
        if let Some(unknown) = fields.keys().find(|k| field_from_str(k).is_none()) {
            return Err(InterchangeError::Invalid {
                context,
                message: format!("'{}' is not an editable field", unknown),
            });
        }
        for field in [EditableField::CostPrice, EditableField::StockQuantity] {
            if let Some(value) = optional_cell(fields, field.as_str()) {
                actions.push(Action::UpdateCell {
                    item_id: item_id.to_string(),
                    field,
                    value,
                });
            }
        }
    }
    Ok(actions)
}

/// Parse an ordered action log.
pub fn parse_action_log(doc: &Value) -> Result<Vec<Action>, InterchangeError> {
    let items = doc.as_array().ok_or_else(|| {
        InterchangeError::InvalidDocument("action log must be an array".to_string())
    })?;
    items
        .iter()
        .enumerate()
        .map(|(index, value)| parse_action(index, value))
        .collect()
}

fn parse_action(index: usize, value: &Value) -> Result<Action, InterchangeError> {
    let context = format!("action {}", index);
    let obj = value.as_object().ok_or_else(|| InterchangeError::Invalid {
        context: context.clone(),
        message: "action must be an object".to_string(),
    })?;
    let kind = required_str(obj, "type", &context)?;

    match kind {
        "load_snapshot" => {
            let records = obj.get("records").ok_or_else(|| InterchangeError::MissingField {
                context: context.clone(),
                field: "records".to_string(),
            })?;
            Ok(Action::LoadSnapshot(parse_records(records, &context)?))
        }
        "update_cell" => {
            let item_id = required_str(obj, "item_id", &context)?.trim().to_string();
            let field_name = required_str(obj, "field", &context)?;
            let field = field_from_str(field_name).ok_or_else(|| InterchangeError::Invalid {
                context: context.clone(),
                message: format!("'{}' is not an editable field", field_name),
            })?;
            let raw = obj.get("value").ok_or_else(|| InterchangeError::MissingField {
                context: context.clone(),
                field: "value".to_string(),
            })?;
            Ok(Action::UpdateCell {
                item_id,
                field,
                value: parse_cell(raw),
            })
        }
        "reset_row" => Ok(Action::ResetRow {
            item_id: required_str(obj, "item_id", &context)?.trim().to_string(),
        }),
        "reset_all" => Ok(Action::ResetAll),
        other => Err(InterchangeError::Invalid {
            context,
            message: format!("unknown action type '{}'", other),
        }),
    }
}

fn field_from_str(name: &str) -> Option<EditableField> {
    match name {
        "cost_price" => Some(EditableField::CostPrice),
        "stock_quantity" => Some(EditableField::StockQuantity),
        _ => None,
    }
}

fn required_str<'a>(
    obj: &'a Map<String, Value>,
    field: &str,
    context: &str,
) -> Result<&'a str, InterchangeError> {
    obj.get(field)
        .and_then(|v| v.as_str())
        .ok_or_else(|| InterchangeError::MissingField {
            context: context.to_string(),
            field: field.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricesync_core::{CellValue, Decimal, SnapshotRecord, TaxRate};
    use serde_json::json;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn update(id: &str, field: EditableField, value: &str) -> Action {
        Action::UpdateCell {
            item_id: id.to_string(),
            field,
            value: d(value).into(),
        }
    }

    #[test]
    fn edits_become_update_cells_in_key_order() {
        let doc = json!({
            "B": { "stock_quantity": "3", "cost_price": 9.5 },
            "A": { "stock_quantity": 0 },
            "C": {}
        });
        let actions = parse_edits(&doc).unwrap();
        assert_eq!(
            actions,
            vec![
                update("A", EditableField::StockQuantity, "0"),
                update("B", EditableField::CostPrice, "9.5"),
                update("B", EditableField::StockQuantity, "3"),
            ]
        );
    }

    #[test]
    fn edits_reject_non_editable_fields() {
        let doc = json!({ "A": { "tax_rate": 0.05 } });
        let err = parse_edits(&doc).unwrap_err();
        assert_eq!(err.to_string(), "edit 'A': 'tax_rate' is not an editable field");
    }

    #[test]
    fn unreadable_edit_values_become_anomalies() {
        let doc = json!({ "A": { "cost_price": "abc" } });
        assert_eq!(
            parse_edits(&doc).unwrap(),
            vec![Action::UpdateCell {
                item_id: "A".to_string(),
                field: EditableField::CostPrice,
                value: CellValue::Unreadable("abc".to_string()),
            }]
        );
    }

    #[test]
    fn edit_keys_are_trimmed() {
        let doc = json!({ " SKU-1 ": { "stock_quantity": 2 } });
        assert_eq!(
            parse_edits(&doc).unwrap(),
            vec![update("SKU-1", EditableField::StockQuantity, "2")]
        );

        let blank = json!({ "  ": { "stock_quantity": 2 } });
        assert!(matches!(
            parse_edits(&blank),
            Err(InterchangeError::MissingField { ref field, .. }) if field == "item_id"
        ));
    }

    #[test]
    fn action_log_round_trips_every_kind() {
        let doc = json!([
            {
                "type": "load_snapshot",
                "records": [
                    { "item_id": "A", "name": "A", "cost_price": 10, "tax_rate": 0.05, "stock_quantity": 2 }
                ]
            },
            { "type": "update_cell", "item_id": "A", "field": "cost_price", "value": "11" },
            { "type": "reset_row", "item_id": "A" },
            { "type": "reset_all" }
        ]);
        let actions = parse_action_log(&doc).unwrap();
        assert_eq!(
            actions,
            vec![
                Action::LoadSnapshot(vec![SnapshotRecord {
                    item_id: "A".to_string(),
                    name: "A".to_string(),
                    cost_price: d("10").into(),
                    tax_rate: TaxRate::Reduced,
                    stock_quantity: d("2").into(),
                    last_synced_price: None,
                }]),
                update("A", EditableField::CostPrice, "11"),
                Action::ResetRow {
                    item_id: "A".to_string()
                },
                Action::ResetAll,
            ]
        );
    }

    #[test]
    fn action_log_rejects_unknown_type() {
        let doc = json!([{ "type": "sync_now" }]);
        let err = parse_action_log(&doc).unwrap_err();
        assert_eq!(err.to_string(), "action 0: unknown action type 'sync_now'");
    }

    #[test]
    fn action_log_keeps_unreadable_values_and_trims_ids() {
        let doc = json!([
            { "type": "update_cell", "item_id": " A ", "field": "stock_quantity", "value": "many" }
        ]);
        assert_eq!(
            parse_action_log(&doc).unwrap(),
            vec![Action::UpdateCell {
                item_id: "A".to_string(),
                field: EditableField::StockQuantity,
                value: CellValue::Unreadable("many".to_string()),
            }]
        );
    }

    #[test]
    fn action_log_requires_value_for_update() {
        let doc = json!([{ "type": "update_cell", "item_id": "A", "field": "stock_quantity" }]);
        assert!(matches!(
            parse_action_log(&doc),
            Err(InterchangeError::MissingField { ref field, .. }) if field == "value"
        ));
    }
}
