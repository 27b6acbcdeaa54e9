//! The frozen selling-price formula.
//!
//! Intermediate costs keep full precision; only the three currency
//! outputs (base price, tax amount, final price) are rounded, half-up
//! to two decimals. Changing any constant here changes every price the
//! ERP receives.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::PricingError;
use crate::numeric::{add, div, mul, ratio, round2, sub};
use crate::types::TaxRate;

/// Freight share applied on top of the cost price.
pub const TRANSPORT_RATE: Decimal = ratio(9, 2);
/// Delivery share applied on cost plus transport.
pub const DELIVERY_RATE: Decimal = ratio(12, 3);
/// Markup applied to the adjusted cost.
pub const MARKUP_FACTOR: Decimal = ratio(1259, 3);

/// Full cost/price breakdown for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedPricing {
    pub transport_cost: Decimal,
    pub delivery_cost: Decimal,
    pub adjusted_cost: Decimal,
    pub base_selling_price: Decimal,
    pub tax_amount: Decimal,
    pub final_selling_price: Decimal,
    /// `(base − cost) / cost`, unrounded. `0.25` means 25%.
    pub effective_margin_percent: Decimal,
}

/// Compute the derived pricing for a cost price and tax rate.
///
/// Fails only outside the constrained domain: an unsupported or
/// unreadable tax rate, a zero cost price (margin has no finite value)
/// or decimal overflow.
pub fn calculate_pricing(
    cost_price: Decimal,
    tax_rate: TaxRate,
) -> Result<DerivedPricing, PricingError> {
    let rate = match tax_rate {
        TaxRate::Reduced => TaxRate::REDUCED_RATE,
        TaxRate::Standard => TaxRate::STANDARD_RATE,
        TaxRate::Unsupported(rate) => return Err(PricingError::UnsupportedTaxRate { rate }),
        TaxRate::Unreadable => return Err(PricingError::UnreadableTaxRate),
    };

    let transport_cost = mul(cost_price, TRANSPORT_RATE, "transport_cost")?;
    let delivery_cost = mul(
        add(cost_price, transport_cost, "delivery_cost")?,
        DELIVERY_RATE,
        "delivery_cost",
    )?;
    let adjusted_cost = add(
        add(cost_price, transport_cost, "adjusted_cost")?,
        delivery_cost,
        "adjusted_cost",
    )?;

    let base_selling_price = round2(mul(adjusted_cost, MARKUP_FACTOR, "base_selling_price")?);
    let tax_amount = round2(mul(base_selling_price, rate, "tax_amount")?);
    let final_selling_price = round2(add(
        base_selling_price,
        tax_amount,
        "final_selling_price",
    )?);

    let effective_margin_percent = div(
        sub(base_selling_price, cost_price, "effective_margin_percent")?,
        cost_price,
        "effective_margin_percent",
    )?;

    Ok(DerivedPricing {
        transport_cost,
        delivery_cost,
        adjusted_cost,
        base_selling_price,
        tax_amount,
        final_selling_price,
        effective_margin_percent,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn reference_breakdown_at_standard_rate() {
        let p = calculate_pricing(d("100"), TaxRate::Standard).unwrap();
        assert_eq!(p.transport_cost, d("9"));
        assert_eq!(p.delivery_cost, d("1.308"));
        assert_eq!(p.adjusted_cost, d("110.308"));
        assert_eq!(p.base_selling_price, d("138.88"));
        assert_eq!(p.tax_amount, d("25.00"));
        assert_eq!(p.final_selling_price, d("163.88"));
        assert_eq!(p.effective_margin_percent, d("0.3888"));
    }

    #[test]
    fn reduced_rate_uses_five_percent() {
        let p = calculate_pricing(d("100"), TaxRate::Reduced).unwrap();
        // 138.88 × 0.05 = 6.944
        assert_eq!(p.tax_amount, d("6.94"));
        assert_eq!(p.final_selling_price, d("145.82"));
    }

    #[test]
    fn intermediate_costs_are_not_rounded() {
        let p = calculate_pricing(d("10.01"), TaxRate::Standard).unwrap();
        assert_eq!(p.transport_cost, d("0.9009"));
        // (10.01 + 0.9009) × 0.012
        assert_eq!(p.delivery_cost, d("0.1309308"));
        assert_eq!(p.adjusted_cost, d("11.0418308"));
        // 11.0418308 × 1.259 = 13.90166497...
        assert_eq!(p.base_selling_price, d("13.90"));
    }

    #[test]
    fn unsupported_rate_is_refused() {
        let rate = d("0.12");
        assert_eq!(
            calculate_pricing(d("100"), TaxRate::Unsupported(rate)),
            Err(PricingError::UnsupportedTaxRate { rate })
        );
    }

    #[test]
    fn unreadable_rate_is_refused() {
        assert_eq!(
            calculate_pricing(d("100"), TaxRate::Unreadable),
            Err(PricingError::UnreadableTaxRate)
        );
    }

    #[test]
    fn zero_cost_has_no_finite_margin() {
        assert_eq!(
            calculate_pricing(Decimal::ZERO, TaxRate::Standard),
            Err(PricingError::NonFiniteRatio {
                step: "effective_margin_percent"
            })
        );
    }

    #[test]
    fn overflow_is_reported_not_panicked() {
        let result = calculate_pricing(Decimal::MAX, TaxRate::Standard);
        assert!(matches!(result, Err(PricingError::Overflow { .. })));
    }
}
