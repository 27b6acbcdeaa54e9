//! Working state: the snapshot plus a sparse overlay of local edits.
//!
//! Transitions never mutate in place; each returns a new `WorkingState`.
//! The snapshot is shared behind an `Arc`, so edit transitions only copy
//! the (small) edit map and modified set.
//!
//! Invariant: the keys of `edits` and the members of `modified` are the
//! same set. Every transition updates both together.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;

use crate::diff::{build_diff, ChangeRecord};
use crate::eligibility::{tally, SyncEligibility};
use crate::error::StateError;
use crate::row::{compute_row, ComputedRow};
use crate::types::{CellValue, EditableField, ItemId, SnapshotRecord, WorkingEdit};

/// The complete set of transitions a host can issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replace the snapshot; pending edits are discarded.
    LoadSnapshot(Vec<SnapshotRecord>),
    UpdateCell {
        item_id: ItemId,
        field: EditableField,
        value: CellValue,
    },
    ResetRow {
        item_id: ItemId,
    },
    ResetAll,
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::LoadSnapshot(_) => "load_snapshot",
            Action::UpdateCell { .. } => "update_cell",
            Action::ResetRow { .. } => "reset_row",
            Action::ResetAll => "reset_all",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingState {
    snapshot: Arc<[SnapshotRecord]>,
    edits: BTreeMap<ItemId, WorkingEdit>,
    modified: BTreeSet<ItemId>,
}

impl Default for WorkingState {
    fn default() -> Self {
        WorkingState {
            snapshot: Arc::from(Vec::new()),
            edits: BTreeMap::new(),
            modified: BTreeSet::new(),
        }
    }
}

impl WorkingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &[SnapshotRecord] {
        &self.snapshot
    }

    pub fn edits(&self) -> &BTreeMap<ItemId, WorkingEdit> {
        &self.edits
    }

    pub fn modified(&self) -> &BTreeSet<ItemId> {
        &self.modified
    }

    pub fn edit_for(&self, item_id: &str) -> Option<&WorkingEdit> {
        self.edits.get(item_id)
    }

    pub fn is_modified(&self, item_id: &str) -> bool {
        self.modified.contains(item_id)
    }

    // ── Transitions ──────────────────────────────────────────────────────────

    pub fn load_snapshot(&self, records: Vec<SnapshotRecord>) -> Result<Self, StateError> {
        reduce(self, Action::LoadSnapshot(records))
    }

    pub fn update_cell(
        &self,
        item_id: &str,
        field: EditableField,
        value: impl Into<CellValue>,
    ) -> Result<Self, StateError> {
        reduce(
            self,
            Action::UpdateCell {
                item_id: item_id.to_string(),
                field,
                value: value.into(),
            },
        )
    }

    pub fn reset_row(&self, item_id: &str) -> Self {
        self.without_edit(item_id)
    }

    pub fn reset_all(&self) -> Self {
        WorkingState {
            snapshot: Arc::clone(&self.snapshot),
            edits: BTreeMap::new(),
            modified: BTreeSet::new(),
        }
    }

    // ── Read projections ─────────────────────────────────────────────────────

    /// One computed row per snapshot record, in snapshot order.
    pub fn computed_rows(&self) -> Vec<ComputedRow> {
        self.snapshot
            .iter()
            .map(|record| compute_row(record, self.edits.get(&record.item_id)))
            .collect()
    }

    /// The change list a sync would send right now.
    pub fn diff(&self) -> Vec<ChangeRecord> {
        build_diff(&self.snapshot, &self.computed_rows())
    }

    /// Whether a sync may proceed, judged over the whole snapshot.
    pub fn sync_eligibility(&self) -> SyncEligibility {
        if self.snapshot.is_empty() || self.modified.is_empty() {
            return SyncEligibility::idle(self.snapshot.len(), self.modified.len());
        }
        tally(&self.computed_rows(), self.modified.len())
    }

    fn without_edit(&self, item_id: &str) -> Self {
        let mut next = self.clone();
        next.edits.remove(item_id);
        next.modified.remove(item_id);
        next
    }
}

/// Apply one action, producing the next state.
pub fn reduce(state: &WorkingState, action: Action) -> Result<WorkingState, StateError> {
    tracing::debug!(action = action.kind(), "applying working-state transition");
    match action {
        Action::LoadSnapshot(records) => {
            let mut seen = HashSet::with_capacity(records.len());
            for record in &records {
                if !seen.insert(record.item_id.as_str()) {
                    return Err(StateError::DuplicateItem {
                        item_id: record.item_id.clone(),
                    });
                }
            }
            if !state.edits.is_empty() {
                tracing::info!(
                    discarded = state.edits.len(),
                    "fresh snapshot discards pending edits"
                );
            }
            Ok(WorkingState {
                snapshot: Arc::from(records),
                edits: BTreeMap::new(),
                modified: BTreeSet::new(),
            })
        }
        Action::UpdateCell {
            item_id,
            field,
            value,
        } => {
            if !state.snapshot.iter().any(|r| r.item_id == item_id) {
                return Err(StateError::UnknownItem { item_id });
            }
            let mut next = state.clone();
            let edit = next
                .edits
                .get(&item_id)
                .cloned()
                .unwrap_or_default()
                .with(field, value);
            next.edits.insert(item_id.clone(), edit);
            next.modified.insert(item_id);
            Ok(next)
        }
        Action::ResetRow { item_id } => Ok(state.without_edit(&item_id)),
        Action::ResetAll => Ok(state.reset_all()),
    }
}

/// Apply actions in order, stopping at the first rejected transition.
pub fn replay<I>(state: &WorkingState, actions: I) -> Result<WorkingState, StateError>
where
    I: IntoIterator<Item = Action>,
{
    actions
        .into_iter()
        .try_fold(state.clone(), |current, action| reduce(&current, action))
}
