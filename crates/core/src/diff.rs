//! Minimal write-back diff between the snapshot and the computed rows.
//!
//! Only rows that carry a working edit are considered, and for those only
//! fields whose externally observable value moved are emitted. This is the
//! sole source of what the ERP write receives.

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::numeric::{format_money, format_quantity, ratio};
use crate::row::ComputedRow;
use crate::types::{ItemId, SnapshotRecord};

/// Price moves at or below this many currency units are not changes.
pub const PRICE_EPSILON: Decimal = ratio(1, 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeField {
    Price,
    Stock,
}

impl fmt::Display for ChangeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeField::Price => f.write_str("price"),
            ChangeField::Stock => f.write_str("stock"),
        }
    }
}

/// One externally meaningful delta. Prices render with two decimals,
/// stock as a plain integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeRecord {
    pub item_id: ItemId,
    pub name: String,
    pub field: ChangeField,
    pub before: String,
    pub after: String,
}

/// Build the ordered change list, following the order of `rows`.
///
/// Rows are matched to snapshot records by identifier. A row without a
/// snapshot counterpart has nothing to diff against and is skipped.
pub fn build_diff(snapshot: &[SnapshotRecord], rows: &[ComputedRow]) -> Vec<ChangeRecord> {
    let by_id: HashMap<&str, &SnapshotRecord> = snapshot
        .iter()
        .map(|r| (r.item_id.as_str(), r))
        .collect();

    let mut changes = Vec::new();
    for row in rows.iter().filter(|r| r.is_modified) {
        let Some(record) = by_id.get(row.item_id.as_str()) else {
            tracing::warn!(item_id = %row.item_id, "modified row has no snapshot record");
            continue;
        };

        if let Some(pricing) = &row.pricing {
            let before = record.last_synced_price.unwrap_or(Decimal::ZERO);
            let after = pricing.base_selling_price;
            let moved = before
                .checked_sub(after)
                .map_or(true, |delta| delta.abs() > PRICE_EPSILON);
            if moved {
                changes.push(ChangeRecord {
                    item_id: row.item_id.clone(),
                    name: row.name.clone(),
                    field: ChangeField::Price,
                    before: format_money(before),
                    after: format_money(after),
                });
            }
        }

        if record.stock_quantity != row.stock_quantity {
            changes.push(ChangeRecord {
                item_id: row.item_id.clone(),
                name: row.name.clone(),
                field: ChangeField::Stock,
                before: record.stock_quantity.format_with(format_quantity),
                after: row.stock_quantity.format_with(format_quantity),
            });
        }
    }
    changes
}
