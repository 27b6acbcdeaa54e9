//! Decimal helpers shared by the pricing formula, validation and diff.
//!
//! All money and ratio arithmetic goes through `rust_decimal::Decimal`.
//! There is no `f64` anywhere in the pricing path, so every result is
//! exact and reproducible across platforms.

use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

use crate::error::PricingError;

/// Build a decimal constant `units × 10^-scale` at compile time.
pub(crate) const fn ratio(units: u32, scale: u32) -> Decimal {
    Decimal::from_parts(units, 0, 0, false, scale)
}

/// Round half-up (toward positive infinity at the midpoint) to 2 decimals.
///
/// `rust_decimal` has no single half-up strategy: away-from-zero matches
/// half-up for non-negative values, toward-zero matches it for negatives.
pub fn round2(value: Decimal) -> Decimal {
    let strategy = if value.is_sign_negative() {
        RoundingStrategy::MidpointTowardZero
    } else {
        RoundingStrategy::MidpointAwayFromZero
    };
    value.round_dp_with_strategy(2, strategy)
}

/// Render a currency value with exactly two decimal places.
pub fn format_money(value: Decimal) -> String {
    let mut rounded = round2(value);
    rounded.rescale(2);
    rounded.to_string()
}

/// Render a quantity without trailing zeros (`5.0` renders as `5`).
pub fn format_quantity(value: Decimal) -> String {
    value.normalize().to_string()
}

pub(crate) fn mul(
    left: Decimal,
    right: Decimal,
    step: &'static str,
) -> Result<Decimal, PricingError> {
    left.checked_mul(right).ok_or(PricingError::Overflow { step })
}

pub(crate) fn add(
    left: Decimal,
    right: Decimal,
    step: &'static str,
) -> Result<Decimal, PricingError> {
    left.checked_add(right).ok_or(PricingError::Overflow { step })
}

pub(crate) fn sub(
    left: Decimal,
    right: Decimal,
    step: &'static str,
) -> Result<Decimal, PricingError> {
    left.checked_sub(right).ok_or(PricingError::Overflow { step })
}

/// Checked division; a zero divisor is reported as a non-finite ratio.
pub(crate) fn div(
    left: Decimal,
    right: Decimal,
    step: &'static str,
) -> Result<Decimal, PricingError> {
    if right.is_zero() {
        return Err(PricingError::NonFiniteRatio { step });
    }
    left.checked_div(right).ok_or(PricingError::Overflow { step })
}
