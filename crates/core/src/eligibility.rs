//! Sync eligibility: the catalog-wide gate on write-back.
//!
//! Every row is validated, not just edited ones. An untouched row that is
//! already invalid upstream still blocks the sync.

use serde::Serialize;

use crate::row::ComputedRow;
use crate::types::ItemId;
use crate::validation::ValidationStatus;

/// Read-only projection of the current state; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncEligibility {
    pub can_sync: bool,
    pub row_count: usize,
    pub modified_count: usize,
    pub block_count: usize,
    pub warn_count: usize,
    /// Items currently in BLOCK, in snapshot order.
    pub blocked_items: Vec<ItemId>,
}

impl SyncEligibility {
    /// Nothing to sync: empty snapshot or no modified rows. Rows are not
    /// validated in this case, so the tallies are zero.
    pub(crate) fn idle(row_count: usize, modified_count: usize) -> Self {
        SyncEligibility {
            can_sync: false,
            row_count,
            modified_count,
            block_count: 0,
            warn_count: 0,
            blocked_items: Vec::new(),
        }
    }
}

/// Tally validation over all `rows`.
pub(crate) fn tally(rows: &[ComputedRow], modified_count: usize) -> SyncEligibility {
    let mut warn_count = 0;
    let mut blocked_items = Vec::new();
    for row in rows {
        if row.validation.is_blocked() {
            blocked_items.push(row.item_id.clone());
        } else if row.validation.status == ValidationStatus::Warn {
            warn_count += 1;
        }
    }
    let block_count = blocked_items.len();
    SyncEligibility {
        can_sync: block_count == 0 && modified_count > 0,
        row_count: rows.len(),
        modified_count,
        block_count,
        warn_count,
        blocked_items,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::state::WorkingState;
    use crate::types::{CellValue, EditableField, SnapshotRecord, TaxRate};

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn record(id: &str, stock: &str, last: &str) -> SnapshotRecord {
        SnapshotRecord {
            item_id: id.to_string(),
            name: id.to_string(),
            cost_price: d("100").into(),
            tax_rate: TaxRate::Standard,
            stock_quantity: d(stock).into(),
            last_synced_price: Some(d(last)),
        }
    }

    #[test]
    fn empty_snapshot_is_never_eligible() {
        let e = WorkingState::new().sync_eligibility();
        assert!(!e.can_sync);
        assert_eq!(e.row_count, 0);
    }

    #[test]
    fn nothing_modified_is_not_eligible() {
        let s = WorkingState::new()
            .load_snapshot(vec![record("A", "5", "138.88")])
            .unwrap();
        let e = s.sync_eligibility();
        assert!(!e.can_sync);
        assert_eq!(e.modified_count, 0);
    }

    #[test]
    fn valid_edit_is_eligible() {
        let s = WorkingState::new()
            .load_snapshot(vec![record("A", "5", "138.88")])
            .unwrap()
            .update_cell("A", EditableField::StockQuantity, d("6"))
            .unwrap();
        let e = s.sync_eligibility();
        assert!(e.can_sync);
        assert_eq!(e.modified_count, 1);
        assert_eq!(e.block_count, 0);
    }

    #[test]
    fn unedited_invalid_row_blocks_sync_of_other_rows() {
        let s = WorkingState::new()
            .load_snapshot(vec![record("A", "-2", "138.88"), record("B", "5", "138.88")])
            .unwrap()
            .update_cell("B", EditableField::StockQuantity, d("6"))
            .unwrap();
        let e = s.sync_eligibility();
        assert!(!e.can_sync);
        assert_eq!(e.block_count, 1);
        assert_eq!(e.blocked_items, vec!["A".to_string()]);
    }

    #[test]
    fn warnings_do_not_block() {
        // 138.88 against a last sync of 100 is a 38.88% move: WARN only.
        let s = WorkingState::new()
            .load_snapshot(vec![record("A", "5", "100")])
            .unwrap()
            .update_cell("A", EditableField::StockQuantity, d("6"))
            .unwrap();
        let e = s.sync_eligibility();
        assert!(e.can_sync);
        assert_eq!(e.warn_count, 1);
    }

    #[test]
    fn unreadable_cell_in_snapshot_blocks_sync() {
        let mut bad = record("A", "5", "138.88");
        bad.stock_quantity = CellValue::Unreadable("lots".to_string());
        let s = WorkingState::new()
            .load_snapshot(vec![bad, record("B", "5", "138.88")])
            .unwrap()
            .update_cell("B", EditableField::StockQuantity, d("6"))
            .unwrap();
        assert_eq!(s.computed_rows().len(), 2);
        let e = s.sync_eligibility();
        assert!(!e.can_sync);
        assert_eq!(e.blocked_items, vec!["A".to_string()]);
    }
}
