//! pricesync-core: reconcile local price/stock edits against an ERP snapshot.
//!
//! Layers, leaves first:
//!
//! - [`pricing`] -- the frozen selling-price formula
//! - [`validation`] -- per-row PASS / WARN / BLOCK rules
//! - [`row`] -- merge a snapshot record with its working edit
//! - [`diff`] -- the minimal change list for write-back
//! - [`state`] -- snapshot + edit overlay with pure transitions, and the
//!   catalog-wide [`SyncEligibility`] gate
//!
//! The crate is synchronous and performs no I/O. Every projection is
//! recomputed from explicit state on each call.

pub mod diff;
pub mod eligibility;
pub mod error;
pub mod numeric;
pub mod pricing;
pub mod row;
pub mod state;
pub mod types;
pub mod validation;

pub use diff::{build_diff, ChangeField, ChangeRecord};
pub use eligibility::SyncEligibility;
pub use error::{PricingError, StateError};
pub use pricing::{calculate_pricing, DerivedPricing};
pub use row::{compute_row, ComputedRow};
pub use state::{reduce, replay, Action, WorkingState};
pub use types::{CellValue, EditableField, ItemId, SnapshotRecord, TaxRate, WorkingEdit};
pub use validation::{validate_row, ValidationResult, ValidationStatus};

pub use rust_decimal::Decimal;
