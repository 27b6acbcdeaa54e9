//! Loose numeric values from the wire, normalized to `Decimal`.
//!
//! ERP exports and UI cells send numbers as JSON numbers or as strings
//! (`"12.50"`, `" 7 "`, `"12,5"`). Anything that is not recognizably a
//! number yields `None`, or an unreadable [`CellValue`] for editable
//! cells; semantic checks (sign, integrality, permitted tax rate) are left
//! to validation in pricesync-core.

use pricesync_core::{CellValue, TaxRate};
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Read a JSON number or numeric string as a `Decimal`.
pub fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal_str(&n.to_string()),
        Value::String(s) => parse_decimal_str(s),
        _ => None,
    }
}

/// Read a cost or stock cell, keeping text that is not a number.
pub fn parse_cell(value: &Value) -> CellValue {
    match parse_decimal(value) {
        Some(number) => CellValue::Number(number),
        None => CellValue::Unreadable(match value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }),
    }
}

/// Parse a numeric string. Accepts surrounding whitespace, a single
/// decimal comma in place of the point, and scientific notation.
pub fn parse_decimal_str(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let normalized = if !trimmed.contains('.') && trimmed.matches(',').count() == 1 {
        trimmed.replace(',', ".")
    } else {
        trimmed.to_string()
    };
    if normalized.contains(['e', 'E']) {
        return Decimal::from_scientific(&normalized).ok();
    }
    Decimal::from_str(&normalized).ok()
}

/// Read a tax rate. Fractions (`0.18`), percentages (`18`, `"18%"`) and
/// numeric strings are accepted; the result is classified into the closed
/// [`TaxRate`] domain, with anything else kept as `Unsupported`.
pub fn parse_tax_rate(value: &Value) -> Option<TaxRate> {
    let rate = match value {
        Value::String(s) if s.trim_end().ends_with('%') => {
            let digits = s.trim_end().trim_end_matches('%');
            percent(parse_decimal_str(digits)?)?
        }
        other => {
            let raw = parse_decimal(other)?;
            if raw > Decimal::ONE {
                percent(raw)?
            } else {
                raw
            }
        }
    };
    Some(TaxRate::from_decimal(rate))
}

fn percent(value: Decimal) -> Option<Decimal> {
    value.checked_div(Decimal::ONE_HUNDRED)
}
