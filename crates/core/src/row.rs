//! Merge one snapshot record with its optional working edit.

use serde::Serialize;

use crate::pricing::{calculate_pricing, DerivedPricing};
use crate::types::{CellValue, ItemId, SnapshotRecord, TaxRate, WorkingEdit};
use crate::validation::{validate_row, ValidationResult};

/// A fully-derived row, recomputed on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComputedRow {
    pub item_id: ItemId,
    pub name: String,
    pub cost_price: CellValue,
    pub stock_quantity: CellValue,
    pub tax_rate: TaxRate,
    /// `None` when the formula could not produce a result.
    pub pricing: Option<DerivedPricing>,
    pub validation: ValidationResult,
    /// True iff an edit exists for the item, even one that changes nothing.
    pub is_modified: bool,
}

/// Compute the displayable row for `record` with `edit` applied.
///
/// Never fails: an unreadable cost or a formula error becomes
/// `pricing: None`, and validation then reports the row as BLOCK.
pub fn compute_row(record: &SnapshotRecord, edit: Option<&WorkingEdit>) -> ComputedRow {
    let cost_price = edit
        .and_then(|e| e.cost_price.as_ref())
        .unwrap_or(&record.cost_price)
        .clone();
    let stock_quantity = edit
        .and_then(|e| e.stock_quantity.as_ref())
        .unwrap_or(&record.stock_quantity)
        .clone();

    let pricing = cost_price.number().and_then(|cost| {
        calculate_pricing(cost, record.tax_rate)
            .inspect_err(|e| {
                tracing::trace!(item_id = %record.item_id, error = %e, "pricing unavailable");
            })
            .ok()
    });

    let validation = validate_row(
        cost_price.number(),
        record.tax_rate,
        stock_quantity.number(),
        pricing.as_ref(),
        record.last_synced_price,
    );

    ComputedRow {
        item_id: record.item_id.clone(),
        name: record.name.clone(),
        cost_price,
        stock_quantity,
        tax_rate: record.tax_rate,
        pricing,
        validation,
        is_modified: edit.is_some(),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::EditableField;
    use crate::validation::{
        ValidationStatus, MSG_COST_NOT_POSITIVE, MSG_STOCK_INVALID, MSG_TAX_RATE_INVALID,
    };

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn record() -> SnapshotRecord {
        SnapshotRecord {
            item_id: "SKU-1".to_string(),
            name: "Widget".to_string(),
            cost_price: d("100").into(),
            tax_rate: TaxRate::Standard,
            stock_quantity: d("4").into(),
            last_synced_price: Some(d("138.88")),
        }
    }

    #[test]
    fn unedited_row_uses_snapshot_values() {
        let row = compute_row(&record(), None);
        assert_eq!(row.cost_price, d("100"));
        assert_eq!(row.stock_quantity, d("4"));
        assert!(!row.is_modified);
        assert_eq!(row.pricing.unwrap().base_selling_price, d("138.88"));
        assert_eq!(row.validation.status, ValidationStatus::Pass);
    }

    #[test]
    fn edit_overrides_only_present_fields() {
        let edit = WorkingEdit::default().with(EditableField::StockQuantity, d("9"));
        let row = compute_row(&record(), Some(&edit));
        assert_eq!(row.cost_price, d("100"));
        assert_eq!(row.stock_quantity, d("9"));
        assert!(row.is_modified);
    }

    #[test]
    fn empty_edit_still_marks_row_modified() {
        let row = compute_row(&record(), Some(&WorkingEdit::default()));
        assert!(row.is_modified);
        assert_eq!(row, ComputedRow { is_modified: true, ..compute_row(&record(), None) });
    }

    #[test]
    fn cost_edit_flows_through_formula() {
        let edit = WorkingEdit::default().with(EditableField::CostPrice, d("110"));
        let row = compute_row(&record(), Some(&edit));
        let pricing = row.pricing.unwrap();
        // 110 × 1.09 × 1.012 × 1.259 = 152.7655...
        assert_eq!(pricing.base_selling_price, d("152.77"));
    }

    #[test]
    fn formula_failure_becomes_absent_pricing() {
        let edit = WorkingEdit::default().with(EditableField::CostPrice, Decimal::ZERO);
        let row = compute_row(&record(), Some(&edit));
        assert!(row.pricing.is_none());
        assert_eq!(row.validation.messages, vec![MSG_COST_NOT_POSITIVE]);
    }

    #[test]
    fn unsupported_tax_rate_keeps_row_renderable() {
        let mut rec = record();
        rec.tax_rate = TaxRate::Unsupported(d("0.12"));
        let row = compute_row(&rec, None);
        assert!(row.pricing.is_none());
        assert_eq!(row.validation.messages, vec![MSG_TAX_RATE_INVALID]);
        assert_eq!(row.name, "Widget");
    }

    #[test]
    fn unreadable_snapshot_cost_blocks_without_pricing() {
        let mut rec = record();
        rec.cost_price = CellValue::Unreadable("n/a".to_string());
        let row = compute_row(&rec, None);
        assert!(row.pricing.is_none());
        assert_eq!(row.cost_price.to_string(), "n/a");
        assert_eq!(row.validation.status, ValidationStatus::Block);
        assert_eq!(row.validation.messages, vec![MSG_COST_NOT_POSITIVE]);
    }

    #[test]
    fn unreadable_stock_edit_blocks_but_keeps_pricing() {
        let edit = WorkingEdit::default()
            .with(EditableField::StockQuantity, CellValue::Unreadable("abc".to_string()));
        let row = compute_row(&record(), Some(&edit));
        assert_eq!(row.pricing.unwrap().base_selling_price, d("138.88"));
        assert_eq!(row.validation.messages, vec![MSG_STOCK_INVALID]);
    }

    #[test]
    fn unreadable_tax_rate_blocks() {
        let mut rec = record();
        rec.tax_rate = TaxRate::Unreadable;
        let row = compute_row(&rec, None);
        assert!(row.pricing.is_none());
        assert_eq!(row.validation.messages, vec![MSG_TAX_RATE_INVALID]);
    }
}
