use pricesync_core::ItemId;

/// Why a sync payload could not be prepared.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The integration has not been activated (consent flag off).
    #[error("sync is not activated")]
    NotActivated,

    /// The kill switch is on; no write-back is allowed.
    #[error("sync is in read-only mode")]
    ReadOnly,

    /// Some row in the snapshot is in BLOCK, or nothing was modified.
    #[error("catalog is not syncable: {block_count} blocked row(s), {modified_count} modified")]
    NotEligible {
        block_count: usize,
        modified_count: usize,
        blocked_items: Vec<ItemId>,
    },

    /// Rows were touched but no externally observable value changed.
    #[error("no changes to sync")]
    NothingToSync,

    #[error("could not encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// All errors that can be returned by an `ErpWriter` implementation.
///
/// A write the ERP answered with item-level failures is not an error; it
/// is a `SyncReceipt` with `success == false`.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// The collaborator could not be reached or answered unintelligibly.
    #[error("write transport error: {0}")]
    Transport(String),

    #[error("outbox I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}
