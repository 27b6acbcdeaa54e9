use pricesync_core::{ChangeRecord, WorkingState};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::SyncError;
use crate::record::{SyncGate, SyncPayload};

#[derive(Serialize)]
struct EtagInput<'a> {
    changes: &'a [ChangeRecord],
    reason: Option<&'a str>,
}

/// Compute the SHA-256 etag of a change list and reason.
///
/// Equal diffs with equal reasons always produce equal etags, so a payload
/// recomputed after a re-fetch can be compared with one already attempted.
pub fn compute_etag(
    changes: &[ChangeRecord],
    reason: Option<&str>,
) -> Result<String, serde_json::Error> {
    let canonical = serde_json::to_string(&EtagInput { changes, reason })?;
    let hash = Sha256::digest(canonical.as_bytes());
    Ok(format!("{:x}", hash))
}

/// Build the write-back payload for the current state, or explain why not.
///
/// Checks run in order: activation flag, read-only flag, catalog-wide
/// eligibility, then a non-empty diff. A blank reason is dropped.
pub fn prepare_sync(
    state: &WorkingState,
    gate: SyncGate,
    reason: Option<&str>,
) -> Result<SyncPayload, SyncError> {
    if !gate.activated {
        return Err(SyncError::NotActivated);
    }
    if gate.read_only {
        return Err(SyncError::ReadOnly);
    }

    let eligibility = state.sync_eligibility();
    if !eligibility.can_sync {
        tracing::warn!(
            blocked = eligibility.block_count,
            modified = eligibility.modified_count,
            "sync refused by eligibility gate"
        );
        return Err(SyncError::NotEligible {
            block_count: eligibility.block_count,
            modified_count: eligibility.modified_count,
            blocked_items: eligibility.blocked_items,
        });
    }

    let changes = state.diff();
    if changes.is_empty() {
        return Err(SyncError::NothingToSync);
    }

    let reason = reason.map(str::trim).filter(|r| !r.is_empty());
    let etag = compute_etag(&changes, reason)?;
    tracing::info!(changes = changes.len(), etag = %etag, "prepared sync payload");

    Ok(SyncPayload {
        changes,
        reason: reason.map(str::to_string),
        etag,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricesync_core::{Decimal, EditableField, SnapshotRecord, TaxRate};

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn record(id: &str, stock: &str) -> SnapshotRecord {
        SnapshotRecord {
            item_id: id.to_string(),
            name: id.to_string(),
            cost_price: d("100").into(),
            tax_rate: TaxRate::Standard,
            stock_quantity: d(stock).into(),
            last_synced_price: Some(d("138.88")),
        }
    }

    fn edited() -> WorkingState {
        WorkingState::new()
            .load_snapshot(vec![record("A", "5"), record("B", "5")])
            .unwrap()
            .update_cell("A", EditableField::StockQuantity, d("2"))
            .unwrap()
    }

    #[test]
    fn prepares_payload_with_reason_and_etag() {
        let payload = prepare_sync(&edited(), SyncGate::default(), Some("  recount ")).unwrap();
        assert_eq!(payload.changes.len(), 1);
        assert_eq!(payload.reason.as_deref(), Some("recount"));
        assert_eq!(payload.etag.len(), 64);
        assert_eq!(payload.item_ids(), vec!["A"]);
    }

    #[test]
    fn etag_is_stable_and_reason_sensitive() {
        let a = prepare_sync(&edited(), SyncGate::default(), None).unwrap();
        let b = prepare_sync(&edited(), SyncGate::default(), Some("")).unwrap();
        let c = prepare_sync(&edited(), SyncGate::default(), Some("audit")).unwrap();
        assert_eq!(a.etag, b.etag);
        assert_ne!(a.etag, c.etag);
    }

    #[test]
    fn closed_gate_refuses_before_eligibility() {
        let off = SyncGate {
            activated: false,
            read_only: false,
        };
        assert!(matches!(
            prepare_sync(&edited(), off, None),
            Err(SyncError::NotActivated)
        ));

        let frozen = SyncGate {
            activated: true,
            read_only: true,
        };
        assert!(matches!(
            prepare_sync(&edited(), frozen, None),
            Err(SyncError::ReadOnly)
        ));
    }

    #[test]
    fn blocked_catalog_is_not_eligible() {
        let state = WorkingState::new()
            .load_snapshot(vec![record("A", "5"), record("B", "-1")])
            .unwrap()
            .update_cell("A", EditableField::StockQuantity, d("2"))
            .unwrap();
        match prepare_sync(&state, SyncGate::default(), None) {
            Err(SyncError::NotEligible {
                block_count,
                blocked_items,
                ..
            }) => {
                assert_eq!(block_count, 1);
                assert_eq!(blocked_items, vec!["B".to_string()]);
            }
            other => panic!("expected NotEligible, got {:?}", other),
        }
    }

    #[test]
    fn touched_but_unchanged_has_nothing_to_sync() {
        let state = WorkingState::new()
            .load_snapshot(vec![record("A", "5")])
            .unwrap()
            .update_cell("A", EditableField::StockQuantity, d("5"))
            .unwrap();
        assert!(matches!(
            prepare_sync(&state, SyncGate::default(), None),
            Err(SyncError::NothingToSync)
        ));
    }
}
