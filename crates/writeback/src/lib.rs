//! pricesync-writeback: the boundary between the pure core and the ERP write.
//!
//! [`prepare_sync`] turns the current working state into a [`SyncPayload`]
//! (or refuses), and [`ErpWriter`] is the seam a transport implements.
//! [`OutboxWriter`] and [`InMemoryWriter`] are local implementations.

pub mod conformance;
mod error;
mod memory;
mod outbox;
mod prepare;
mod record;
mod traits;

pub use error::{SyncError, WriteError};
pub use memory::InMemoryWriter;
pub use outbox::OutboxWriter;
pub use prepare::{compute_etag, prepare_sync};
pub use record::{SyncGate, SyncPayload, SyncReceipt};
pub use traits::ErpWriter;
