use async_trait::async_trait;

use crate::error::WriteError;
use crate::record::{SyncPayload, SyncReceipt};

/// The ERP write collaborator.
///
/// Implementations deliver a prepared [`SyncPayload`] and report the
/// outcome. Callers do not retry and do not inspect partial success: a
/// failed write is retried by re-fetching the snapshot and preparing a
/// fresh payload, never by replaying this one.
///
/// ## Idempotence
///
/// Submitting a payload whose `etag` was already accepted must not apply
/// the changes twice; implementations answer with an accepted receipt.
///
/// ## Thread Safety
///
/// Implementations must be `Send + Sync + 'static` so a host can share one
/// writer across tasks.
#[async_trait]
pub trait ErpWriter: Send + Sync + 'static {
    async fn submit(&self, payload: &SyncPayload) -> Result<SyncReceipt, WriteError>;
}
