use pricesync_core::{ChangeRecord, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Persisted consent and kill-switch flags, consumed as plain booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncGate {
    pub activated: bool,
    pub read_only: bool,
}

impl Default for SyncGate {
    fn default() -> Self {
        SyncGate {
            activated: true,
            read_only: false,
        }
    }
}

/// Everything handed to the ERP write collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncPayload {
    pub changes: Vec<ChangeRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// SHA-256 over the compact JSON of `changes` and `reason`.
    pub etag: String,
}

impl SyncPayload {
    /// Distinct item identifiers in payload order.
    pub fn item_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for change in &self.changes {
            if !ids.contains(&change.item_id.as_str()) {
                ids.push(&change.item_id);
            }
        }
        ids
    }
}

/// The collaborator's answer to a submitted payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReceipt {
    pub success: bool,
    /// Item identifier -> error message, for items the ERP refused.
    #[serde(default)]
    pub item_errors: BTreeMap<ItemId, String>,
}

impl SyncReceipt {
    pub fn accepted() -> Self {
        SyncReceipt {
            success: true,
            item_errors: BTreeMap::new(),
        }
    }

    pub fn error_for(&self, item_id: &str) -> Option<&str> {
        self.item_errors.get(item_id).map(String::as_str)
    }
}
