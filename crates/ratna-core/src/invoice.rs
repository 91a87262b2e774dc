//! # Invoice Totals
//!
//! Aggregates priced lines into sale-level totals and splits GST the way an
//! Indian tax invoice shows it.
//!
//! ## GST Split
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Customer in the shop's state (intra-state)                             │
//! │     total GST ₹2,100  ──►  CGST ₹1,050  +  SGST ₹1,050                  │
//! │                                                                         │
//! │  Customer in another state (inter-state)                                │
//! │     total GST ₹2,100  ──►  IGST ₹2,100                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::pricing::PriceBreakdown;

// =============================================================================
// Sale Totals
// =============================================================================

/// Sum of the per-quantity blocks of every line on a sale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleTotals {
    pub line_count: u32,
    pub total_quantity: u64,
    /// Pre-discount amount (materials + gemstones + making).
    #[ts(type = "string")]
    pub subtotal: Decimal,
    #[ts(type = "string")]
    pub discount: Decimal,
    #[ts(type = "string")]
    pub gst: Decimal,
    #[ts(type = "string")]
    pub total: Decimal,
}

impl SaleTotals {
    /// Aggregates the given priced lines.
    ///
    /// ## Example
    /// ```rust
    /// use ratna_core::invoice::SaleTotals;
    ///
    /// let totals = SaleTotals::from_breakdowns(&[]);
    /// assert_eq!(totals.line_count, 0);
    /// assert!(totals.total.is_zero());
    /// ```
    pub fn from_breakdowns(lines: &[PriceBreakdown]) -> Self {
        lines.iter().fold(SaleTotals::default(), |mut totals, line| {
            totals.add(line);
            totals
        })
    }

    /// Adds one priced line.
    pub fn add(&mut self, line: &PriceBreakdown) {
        let block = &line.per_quantity;
        self.line_count += 1;
        self.total_quantity += u64::from(line.quantity);
        self.subtotal += block.base_amount;
        self.discount += block.discount_amount;
        self.gst += block.gst.total;
        self.total += line.grand_total;
    }
}

// =============================================================================
// GST Split
// =============================================================================

/// How a GST amount is reported on an invoice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GstSplit {
    #[ts(type = "string")]
    pub cgst: Decimal,
    #[ts(type = "string")]
    pub sgst: Decimal,
    #[ts(type = "string")]
    pub igst: Decimal,
}

impl GstSplit {
    /// Central + state halves for a supply within the shop's state.
    ///
    /// `sgst` takes the remainder so `cgst + sgst` always equals `total`.
    pub fn intra_state(total: Decimal) -> Self {
        let cgst = total / Decimal::TWO;
        GstSplit {
            cgst,
            sgst: total - cgst,
            igst: Decimal::ZERO,
        }
    }

    /// Integrated GST for a supply to another state.
    pub fn inter_state(total: Decimal) -> Self {
        GstSplit {
            cgst: Decimal::ZERO,
            sgst: Decimal::ZERO,
            igst: total,
        }
    }

    /// Picks the split from the shop and customer state codes.
    ///
    /// An unknown customer state is treated as intra-state (a walk-in sale).
    pub fn for_states(total: Decimal, shop_state: &str, customer_state: Option<&str>) -> Self {
        match customer_state {
            Some(state) if !state.trim().eq_ignore_ascii_case(shop_state.trim()) => {
                GstSplit::inter_state(total)
            }
            _ => GstSplit::intra_state(total),
        }
    }

    /// Sum of all components.
    pub fn total(&self) -> Decimal {
        self.cgst + self.sgst + self.igst
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::compute_line_item_price;
    use crate::types::{
        DiscountPolicy, LineItemInput, MakingChargePolicy, MakingChargeType, MaterialLine,
        ShopTaxConfig,
    };
    use rust_decimal_macros::dec;

    fn priced(quantity: u32, weight: Decimal) -> PriceBreakdown {
        let input = LineItemInput {
            quantity,
            materials: vec![MaterialLine {
                name: None,
                weight,
                rate_per_gram: dec!(6000),
                gst_rate: dec!(3),
            }],
            gemstones: vec![],
            making: MakingChargePolicy {
                charge_type: MakingChargeType::Fixed,
                rate: dec!(1000),
                wastage_percentage: Decimal::ZERO,
            },
            gross_weight: weight,
            discount: DiscountPolicy::default(),
        };
        compute_line_item_price(&input, &ShopTaxConfig::default())
    }

    #[test]
    fn test_sale_totals_sum_per_quantity_blocks() {
        let lines = vec![priced(2, dec!(10)), priced(1, dec!(5))];
        let totals = SaleTotals::from_breakdowns(&lines);

        assert_eq!(totals.line_count, 2);
        assert_eq!(totals.total_quantity, 3);
        // 2 × (60000 + 1000) + (30000 + 1000)
        assert_eq!(totals.subtotal, dec!(153000));
        // 2 × (1800 + 50) + (900 + 50)
        assert_eq!(totals.gst, dec!(4650));
        assert_eq!(totals.total, totals.subtotal - totals.discount + totals.gst);
    }

    #[test]
    fn test_intra_state_split_is_exact() {
        let split = GstSplit::intra_state(dec!(2100.01));
        assert_eq!(split.cgst, dec!(1050.005));
        assert_eq!(split.total(), dec!(2100.01));
        assert!(split.igst.is_zero());
    }

    #[test]
    fn test_split_for_states() {
        let inter = GstSplit::for_states(dec!(300), "27", Some("29"));
        assert_eq!(inter.igst, dec!(300));

        let intra = GstSplit::for_states(dec!(300), "27", Some(" 27 "));
        assert_eq!(intra.cgst, dec!(150));
        assert_eq!(intra.sgst, dec!(150));

        let walk_in = GstSplit::for_states(dec!(300), "27", None);
        assert_eq!(walk_in, intra);
    }
}
