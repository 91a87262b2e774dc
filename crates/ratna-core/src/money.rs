//! # Money Module
//!
//! Decimal helpers shared by the pricing engine and the invoice totals.
//!
//! ## Why Decimal?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Jewelry pricing multiplies fractional grams by per-gram rates and     │
//! │  then takes percentages of the result several times over. Binary       │
//! │  floats drift at every step.                                           │
//! │                                                                         │
//! │  OUR SOLUTION: rust_decimal                                            │
//! │    10.125 g × ₹6,150.50/g = ₹62,273.8125 exactly                       │
//! │    Rounding happens once, for display, never inside the engine         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places used when presenting rupee amounts.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Returns `pct` percent of `amount`: `amount × pct / 100`.
///
/// ## Example
/// ```rust
/// use ratna_core::money::percent_of;
/// use rust_decimal::Decimal;
///
/// let gst = percent_of(Decimal::from(60000), Decimal::from(3));
/// assert_eq!(gst, Decimal::from(1800));
/// ```
#[inline]
pub fn percent_of(amount: Decimal, pct: Decimal) -> Decimal {
    amount * pct / Decimal::ONE_HUNDRED
}

/// Multiplies a per-unit figure by a purchased quantity.
#[inline]
pub fn scale(value: Decimal, quantity: u32) -> Decimal {
    value * Decimal::from(quantity)
}

/// Rounds an amount to paise for display (half away from zero).
///
/// ## Note
/// The engine never rounds. Call this only when presenting or printing.
///
/// ## Example
/// ```rust
/// use ratna_core::money::round_money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let amount = Decimal::from_str("62273.8125").unwrap();
/// assert_eq!(round_money(amount), Decimal::from_str("62273.81").unwrap());
///
/// let half = Decimal::from_str("0.125").unwrap();
/// assert_eq!(round_money(half), Decimal::from_str("0.13").unwrap());
/// ```
#[inline]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(dec!(66000), dec!(10)), dec!(6600));
        assert_eq!(percent_of(dec!(6000), dec!(5)), dec!(300));
        assert_eq!(percent_of(dec!(1000), dec!(0)), Decimal::ZERO);
    }

    #[test]
    fn test_percent_of_fractional_rate() {
        assert_eq!(percent_of(dec!(1000), dec!(1.5)), dec!(15));
        assert_eq!(percent_of(dec!(333.33), dec!(3)), dec!(9.9999));
    }

    #[test]
    fn test_scale() {
        assert_eq!(scale(dec!(68100), 3), dec!(204300));
        assert_eq!(scale(dec!(0.5), 1), dec!(0.5));
    }

    #[test]
    fn test_round_money() {
        assert_eq!(round_money(dec!(9.9999)), dec!(10.00));
        assert_eq!(round_money(dec!(-0.125)), dec!(-0.13));
        assert_eq!(round_money(dec!(1800)), dec!(1800));
    }
}
