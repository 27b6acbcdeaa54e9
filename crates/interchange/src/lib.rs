//! pricesync-interchange: wire formats around the pricesync core.
//!
//! Reads ERP snapshot documents, edit sets and action logs from
//! `serde_json::Value`, normalizing loose numeric fields (numbers or
//! numeric strings) into the strict types of `pricesync-core`. A cell that
//! is not a number crosses the boundary as an explicit anomaly, never as
//! a loose string that might be read as one.

pub mod actions;
pub mod error;
pub mod number;
pub mod snapshot;

pub use actions::{parse_action_log, parse_edits};
pub use error::InterchangeError;
pub use snapshot::{parse_snapshot, SnapshotDocument};

/// Parse JSON text; a convenience for callers reading files.
pub fn read_json(text: &str) -> Result<serde_json::Value, InterchangeError> {
    Ok(serde_json::from_str(text)?)
}
