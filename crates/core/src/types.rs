//! Snapshot records, working edits and the tax-rate domain.
//!
//! Everything here is already normalized: numbers are `Decimal`,
//! identifiers are strings. Loose wire values are converted by
//! `pricesync-interchange` before they reach these types. A cell whose
//! text does not read as a number is kept verbatim as an anomaly, never
//! dropped, so the row stays renderable and validation can BLOCK it.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::numeric::ratio;

/// Unique key of an item in the ERP snapshot.
pub type ItemId = String;

// ──────────────────────────────────────────────
// Tax rate
// ──────────────────────────────────────────────

/// The closed tax-rate domain.
///
/// Only `Reduced` (5%) and `Standard` (18%) are permitted. Any other value
/// read from the ERP is kept as `Unsupported`, and a rate that is not a
/// number at all as `Unreadable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxRate {
    Reduced,
    Standard,
    Unsupported(Decimal),
    Unreadable,
}

impl TaxRate {
    pub const REDUCED_RATE: Decimal = ratio(5, 2);
    pub const STANDARD_RATE: Decimal = ratio(18, 2);

    /// Classify a raw rate. Comparison is by value, so `0.180` is `Standard`.
    pub fn from_decimal(rate: Decimal) -> Self {
        if rate == Self::REDUCED_RATE {
            TaxRate::Reduced
        } else if rate == Self::STANDARD_RATE {
            TaxRate::Standard
        } else {
            TaxRate::Unsupported(rate)
        }
    }

    /// The rate as a fraction (`0.18`, not `18`), if it was readable.
    pub fn rate(&self) -> Option<Decimal> {
        match self {
            TaxRate::Reduced => Some(Self::REDUCED_RATE),
            TaxRate::Standard => Some(Self::STANDARD_RATE),
            TaxRate::Unsupported(rate) => Some(*rate),
            TaxRate::Unreadable => None,
        }
    }

    pub fn is_permitted(&self) -> bool {
        matches!(self, TaxRate::Reduced | TaxRate::Standard)
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rate() {
            Some(rate) => write!(f, "{}", rate),
            None => f.write_str("unreadable"),
        }
    }
}

/// Serializes as the fraction string (`"0.18"`), or `null` when unreadable.
impl Serialize for TaxRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.rate() {
            Some(rate) => Serialize::serialize(&rate, serializer),
            None => serializer.serialize_none(),
        }
    }
}

// ──────────────────────────────────────────────
// Numeric cells
// ──────────────────────────────────────────────

/// A cost or stock cell, either as read from the ERP or as typed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Number(Decimal),
    /// The raw text of a value that is not a number, kept for display.
    Unreadable(String),
}

impl CellValue {
    pub fn number(&self) -> Option<Decimal> {
        match self {
            CellValue::Number(value) => Some(*value),
            CellValue::Unreadable(_) => None,
        }
    }

    /// Render a number with `format`; unreadable text is shown as read.
    pub fn format_with(&self, format: fn(Decimal) -> String) -> String {
        match self {
            CellValue::Number(value) => format(*value),
            CellValue::Unreadable(raw) => raw.clone(),
        }
    }
}

impl From<Decimal> for CellValue {
    fn from(value: Decimal) -> Self {
        CellValue::Number(value)
    }
}

impl PartialEq<Decimal> for CellValue {
    fn eq(&self, other: &Decimal) -> bool {
        self.number().as_ref() == Some(other)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(value) => write!(f, "{}", value),
            CellValue::Unreadable(raw) => f.write_str(raw),
        }
    }
}

/// Numbers serialize like any `Decimal`; unreadable cells as their text.
impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Number(value) => Serialize::serialize(value, serializer),
            CellValue::Unreadable(raw) => serializer.serialize_str(raw),
        }
    }
}

// ──────────────────────────────────────────────
// Snapshot
// ──────────────────────────────────────────────

/// One row of the ERP source of truth as of the last fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotRecord {
    pub item_id: ItemId,
    pub name: String,
    pub cost_price: CellValue,
    pub tax_rate: TaxRate,
    pub stock_quantity: CellValue,
    /// Base selling price as of the last successful sync.
    pub last_synced_price: Option<Decimal>,
}

// ──────────────────────────────────────────────
// Working edits
// ──────────────────────────────────────────────

/// The two fields an operator may edit. Tax rate is never editable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditableField {
    CostPrice,
    StockQuantity,
}

impl EditableField {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditableField::CostPrice => "cost_price",
            EditableField::StockQuantity => "stock_quantity",
        }
    }
}

impl fmt::Display for EditableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sparse local override for one item. `None` means "use the snapshot".
///
/// An edit with both fields `None` is still an edit: the item was touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkingEdit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<CellValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<CellValue>,
}

impl WorkingEdit {
    /// Return a copy of this edit with `field` set to `value`.
    pub fn with(&self, field: EditableField, value: impl Into<CellValue>) -> Self {
        let value = value.into();
        let mut next = self.clone();
        match field {
            EditableField::CostPrice => next.cost_price = Some(value),
            EditableField::StockQuantity => next.stock_quantity = Some(value),
        }
        next
    }
}
