use async_trait::async_trait;
use pricesync_core::ItemId;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use crate::error::WriteError;
use crate::record::{SyncPayload, SyncReceipt};
use crate::traits::ErpWriter;

/// Records accepted payloads in memory. Items can be primed to fail,
/// which makes the whole write report `success == false`.
#[derive(Debug, Default)]
pub struct InMemoryWriter {
    failing_items: BTreeMap<ItemId, String>,
    accepted: Mutex<Vec<SyncPayload>>,
}

impl InMemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make any payload touching `item_id` fail with `message`.
    pub fn with_item_failure(mut self, item_id: &str, message: &str) -> Self {
        self.failing_items.insert(item_id.to_string(), message.to_string());
        self
    }

    /// Payloads accepted so far, in submission order.
    pub fn accepted(&self) -> Result<Vec<SyncPayload>, WriteError> {
        self.accepted
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| WriteError::Transport("writer state poisoned".to_string()))
    }
}

#[async_trait]
impl ErpWriter for InMemoryWriter {
    async fn submit(&self, payload: &SyncPayload) -> Result<SyncReceipt, WriteError> {
        let touched: BTreeSet<&str> = payload.item_ids().into_iter().collect();
        let item_errors: BTreeMap<ItemId, String> = self
            .failing_items
            .iter()
            .filter(|(id, _)| touched.contains(id.as_str()))
            .map(|(id, msg)| (id.clone(), msg.clone()))
            .collect();
        if !item_errors.is_empty() {
            return Ok(SyncReceipt {
                success: false,
                item_errors,
            });
        }

        let mut accepted = self
            .accepted
            .lock()
            .map_err(|_| WriteError::Transport("writer state poisoned".to_string()))?;
        if !accepted.iter().any(|p| p.etag == payload.etag) {
            accepted.push(payload.clone());
        }
        Ok(SyncReceipt::accepted())
    }
}
