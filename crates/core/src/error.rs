/// Failures inside the pricing formula.
///
/// These never reach a caller of [`crate::compute_row`]: the row boundary
/// turns them into "pricing absent", which validation reports as BLOCK.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    /// The tax rate is outside the two permitted values.
    #[error("tax rate {rate} is not a permitted rate")]
    UnsupportedTaxRate { rate: rust_decimal::Decimal },

    #[error("tax rate is not a number")]
    UnreadableTaxRate,

    /// A ratio had a zero divisor (e.g. margin over a zero cost price).
    #[error("non-finite ratio while computing {step}")]
    NonFiniteRatio { step: &'static str },

    /// Decimal arithmetic overflowed.
    #[error("arithmetic overflow while computing {step}")]
    Overflow { step: &'static str },
}

/// Transitions a host must not issue against the working state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    /// `UPDATE_CELL` named an item that is not in the current snapshot.
    #[error("item not in snapshot: {item_id}")]
    UnknownItem { item_id: String },

    /// `LOAD_SNAPSHOT` carried the same item identifier twice.
    #[error("duplicate item in snapshot: {item_id}")]
    DuplicateItem { item_id: String },
}
