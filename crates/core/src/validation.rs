//! Per-row safety rules.
//!
//! Rules run in a fixed order and the first BLOCK ends evaluation. WARN
//! messages accumulate until then. Invalid input is never an error here:
//! it is a BLOCK result, and the row stays renderable.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::numeric::ratio;
use crate::pricing::DerivedPricing;
use crate::types::TaxRate;

/// Margin below this is a loss and blocks sync.
pub const MIN_MARGIN: Decimal = Decimal::ZERO;
/// Margin above this (200%) blocks sync.
pub const MAX_MARGIN: Decimal = ratio(2, 0);
/// Margin below this (10%) warns.
pub const LOW_MARGIN: Decimal = ratio(10, 2);
/// Margin above this (80%) warns.
pub const HIGH_MARGIN: Decimal = ratio(80, 2);
/// Relative price move against the last sync that warns (30%).
pub const DELTA_WARN: Decimal = ratio(30, 2);
/// Relative price move against the last sync that blocks (60%).
pub const DELTA_BLOCK: Decimal = ratio(60, 2);

pub const MSG_COST_NOT_POSITIVE: &str = "Cost Price must be positive and non-zero";
pub const MSG_TAX_RATE_INVALID: &str = "Tax Rate must be 5% or 18%";
pub const MSG_STOCK_INVALID: &str = "Stock Quantity must be a non-negative integer";
pub const MSG_PRICING_MISSING: &str = "Pricing calculation missing";
pub const MSG_NEGATIVE_MARGIN: &str = "Negative Margin";
pub const MSG_MARGIN_TOO_HIGH: &str = "Margin too high";
pub const MSG_LOW_MARGIN: &str = "Low Margin Warning";
pub const MSG_HIGH_MARGIN: &str = "High Margin Warning";
pub const MSG_DELTA_BLOCK: &str = "Price change > 60%";
pub const MSG_DELTA_WARN: &str = "Price change > 30%";

/// Ordered by severity: `Pass < Warn < Block`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationStatus {
    Pass,
    Warn,
    Block,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Pass => "PASS",
            ValidationStatus::Warn => "WARN",
            ValidationStatus::Block => "BLOCK",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub status: ValidationStatus,
    pub messages: Vec<String>,
}

impl ValidationResult {
    pub fn pass() -> Self {
        ValidationResult {
            status: ValidationStatus::Pass,
            messages: Vec::new(),
        }
    }

    fn block(message: &str) -> Self {
        ValidationResult {
            status: ValidationStatus::Block,
            messages: vec![message.to_string()],
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.status == ValidationStatus::Block
    }
}

/// Collects WARN messages; a BLOCK consumes it.
struct Findings {
    messages: Vec<String>,
}

impl Findings {
    fn new() -> Self {
        Findings {
            messages: Vec::new(),
        }
    }

    fn warn(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    fn block(mut self, message: &str) -> ValidationResult {
        self.messages.push(message.to_string());
        ValidationResult {
            status: ValidationStatus::Block,
            messages: self.messages,
        }
    }

    fn finish(self) -> ValidationResult {
        let status = if self.messages.is_empty() {
            ValidationStatus::Pass
        } else {
            ValidationStatus::Warn
        };
        ValidationResult {
            status,
            messages: self.messages,
        }
    }
}

/// Validate one row's effective inputs and derived pricing.
///
/// `None` for `cost_price` or `stock_quantity` means the cell did not read
/// as a number; it fails the same rule as an out-of-range value.
/// `previous_price` is the base selling price from the last sync; the
/// delta guard only runs when it is present and positive.
pub fn validate_row(
    cost_price: Option<Decimal>,
    tax_rate: TaxRate,
    stock_quantity: Option<Decimal>,
    pricing: Option<&DerivedPricing>,
    previous_price: Option<Decimal>,
) -> ValidationResult {
    if !cost_price.is_some_and(|cost| cost > Decimal::ZERO) {
        return ValidationResult::block(MSG_COST_NOT_POSITIVE);
    }
    if !tax_rate.is_permitted() {
        return ValidationResult::block(MSG_TAX_RATE_INVALID);
    }
    if !stock_quantity.is_some_and(|stock| stock >= Decimal::ZERO && stock.fract().is_zero()) {
        return ValidationResult::block(MSG_STOCK_INVALID);
    }
    let Some(pricing) = pricing else {
        return ValidationResult::block(MSG_PRICING_MISSING);
    };

    let margin = pricing.effective_margin_percent;
    if margin < MIN_MARGIN {
        return ValidationResult::block(MSG_NEGATIVE_MARGIN);
    }
    if margin > MAX_MARGIN {
        return ValidationResult::block(MSG_MARGIN_TOO_HIGH);
    }

    let mut findings = Findings::new();
    if margin < LOW_MARGIN {
        findings.warn(MSG_LOW_MARGIN);
    }
    if margin > HIGH_MARGIN {
        findings.warn(MSG_HIGH_MARGIN);
    }

    if let Some(previous) = previous_price.filter(|p| *p > Decimal::ZERO) {
        // The quotient only overflows for moves far beyond the block threshold.
        let delta = (pricing.base_selling_price - previous)
            .checked_div(previous)
            .map(|d| d.abs());
        match delta {
            Some(delta) if delta > DELTA_BLOCK => return findings.block(MSG_DELTA_BLOCK),
            None => return findings.block(MSG_DELTA_BLOCK),
            Some(delta) if delta > DELTA_WARN => findings.warn(MSG_DELTA_WARN),
            Some(_) => {}
        }
    }

    findings.finish()
}
