//! # Pricing Types
//!
//! Value objects passed into the pricing engine.
//!
//! ## Two Shapes Per Input
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  LineItemRequest (untrusted)        LineItemInput (validated)           │
//! │  ─────────────────────────          ─────────────────────────           │
//! │  quantity: Option<i64>       ──►    quantity: u32 (≥ 1)                 │
//! │  materialBreakdown: Option   ──►    materials: Vec<MaterialLine> (≥ 1)  │
//! │  makingChargeType: "PER_GRAM"──►    making: MakingChargePolicy          │
//! │  gstRate: Option             ──►    gst_rate: Decimal (shop fallback)   │
//! │                                                                         │
//! │            validation::validate_line_item (the only bridge)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Requests mirror the JSON a client sends (camelCase, every field
//! optional, policy tags as strings). The engine only ever sees the typed
//! shape, so it has no error paths of its own.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

// =============================================================================
// Making Charge Type
// =============================================================================

/// How the jeweler's making (labour) charge is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MakingChargeType {
    /// Percent of (material value + gemstone value).
    Percentage,
    /// Currency per gram of gross weight.
    PerGram,
    /// Absolute amount per unit.
    Fixed,
}

impl MakingChargeType {
    /// All variants, in their wire spelling.
    pub const ALLOWED: [&'static str; 3] = ["PERCENTAGE", "PER_GRAM", "FIXED"];

    /// Returns the wire spelling of the variant.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MakingChargeType::Percentage => "PERCENTAGE",
            MakingChargeType::PerGram => "PER_GRAM",
            MakingChargeType::Fixed => "FIXED",
        }
    }

    /// Parses a tag case-insensitively.
    ///
    /// `-` and spaces are treated as `_`, and `PERGRAM` is accepted for
    /// `PER_GRAM`. Returns `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        match normalize_tag(value).as_str() {
            "PERCENTAGE" => Some(MakingChargeType::Percentage),
            "PER_GRAM" | "PERGRAM" => Some(MakingChargeType::PerGram),
            "FIXED" => Some(MakingChargeType::Fixed),
            _ => None,
        }
    }
}

impl fmt::Display for MakingChargeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Discount Type
// =============================================================================

/// How an item-level discount value is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    /// Percent of the pre-discount base amount.
    Percentage,
    /// Absolute amount subtracted from the base amount.
    #[default]
    Amount,
}

impl DiscountType {
    /// All variants, in their wire spelling.
    pub const ALLOWED: [&'static str; 2] = ["PERCENTAGE", "AMOUNT"];

    /// Returns the wire spelling of the variant.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "PERCENTAGE",
            DiscountType::Amount => "AMOUNT",
        }
    }

    /// Parses a tag case-insensitively. Returns `None` if unrecognized.
    pub fn parse(value: &str) -> Option<Self> {
        match normalize_tag(value).as_str() {
            "PERCENTAGE" => Some(DiscountType::Percentage),
            "AMOUNT" => Some(DiscountType::Amount),
            _ => None,
        }
    }
}

impl fmt::Display for DiscountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn normalize_tag(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

// =============================================================================
// Shop Tax Configuration
// =============================================================================

/// Shop-level GST rates, in percent.
///
/// `gst_gold_rate` is only a fallback for material/gemstone lines that
/// carry no rate of their own. `gst_making_rate` always applies to the
/// making charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ShopTaxConfig {
    #[ts(type = "string")]
    pub gst_gold_rate: Decimal,
    #[ts(type = "string")]
    pub gst_making_rate: Decimal,
}

impl ShopTaxConfig {
    /// Creates a tax configuration from percentages.
    pub const fn new(gst_gold_rate: Decimal, gst_making_rate: Decimal) -> Self {
        ShopTaxConfig {
            gst_gold_rate,
            gst_making_rate,
        }
    }
}

impl Default for ShopTaxConfig {
    /// 3% on precious metal, 5% on job-work (making) charges.
    fn default() -> Self {
        ShopTaxConfig::new(Decimal::from(3), Decimal::from(5))
    }
}

// =============================================================================
// Requests (untrusted)
// =============================================================================

/// One material as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MaterialLineRequest {
    pub name: Option<String>,
    /// Grams.
    #[ts(type = "string | number | null")]
    pub weight: Option<Decimal>,
    #[ts(type = "string | number | null")]
    pub rate_per_gram: Option<Decimal>,
    /// Percent. Falls back to the shop's gold rate when absent.
    #[ts(type = "string | number | null")]
    pub gst_rate: Option<Decimal>,
}

/// One gemstone as submitted by a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GemstoneLineRequest {
    pub name: Option<String>,
    /// Carats.
    #[ts(type = "string | number | null")]
    pub weight: Option<Decimal>,
    #[ts(type = "string | number | null")]
    pub rate_per_carat: Option<Decimal>,
    #[ts(type = "string | number | null")]
    pub gst_rate: Option<Decimal>,
}

/// A sale line item exactly as a client submits it.
///
/// ## JSON Shape
/// ```json
/// {
///   "quantity": 1,
///   "materialBreakdown": [{ "weight": "10", "ratePerGram": "6000", "gstRate": "3" }],
///   "gemstoneBreakdown": [],
///   "makingChargeType": "PERCENTAGE",
///   "makingChargeRate": "10",
///   "grossWeight": "10",
///   "wastagePercentage": "2",
///   "discountType": "AMOUNT",
///   "discountValue": "500"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRequest {
    pub quantity: Option<i64>,
    pub material_breakdown: Option<Vec<MaterialLineRequest>>,
    pub gemstone_breakdown: Option<Vec<GemstoneLineRequest>>,
    pub making_charge_type: Option<String>,
    #[ts(type = "string | number | null")]
    pub making_charge_rate: Option<Decimal>,
    #[ts(type = "string | number | null")]
    pub gross_weight: Option<Decimal>,
    #[ts(type = "string | number | null")]
    pub wastage_percentage: Option<Decimal>,
    pub discount_type: Option<String>,
    #[ts(type = "string | number | null")]
    pub discount_value: Option<Decimal>,
}

/// An item-level discount as submitted alongside a catalog item lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DiscountRequest {
    pub discount_type: Option<String>,
    #[ts(type = "string | number | null")]
    pub discount_value: Option<Decimal>,
}

// =============================================================================
// Validated Inputs
// =============================================================================

/// A validated material line. `gst_rate` is already resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialLine {
    pub name: Option<String>,
    pub weight: Decimal,
    pub rate_per_gram: Decimal,
    pub gst_rate: Decimal,
}

/// A validated gemstone line. `gst_rate` is already resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GemstoneLine {
    pub name: Option<String>,
    pub weight: Decimal,
    pub rate_per_carat: Decimal,
    pub gst_rate: Decimal,
}

/// Making charge plus wastage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakingChargePolicy {
    pub charge_type: MakingChargeType,
    pub rate: Decimal,
    /// Zero when the request omitted it.
    pub wastage_percentage: Decimal,
}

/// Item-level discount. A zero value means "no discount".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountPolicy {
    pub discount_type: DiscountType,
    pub value: Decimal,
}

/// A fully validated line item, ready for the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    pub quantity: u32,
    pub materials: Vec<MaterialLine>,
    pub gemstones: Vec<GemstoneLine>,
    pub making: MakingChargePolicy,
    /// Grams of the finished piece.
    pub gross_weight: Decimal,
    pub discount: DiscountPolicy,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_making_charge_type_parse() {
        assert_eq!(MakingChargeType::parse("PERCENTAGE"), Some(MakingChargeType::Percentage));
        assert_eq!(MakingChargeType::parse("per_gram"), Some(MakingChargeType::PerGram));
        assert_eq!(MakingChargeType::parse("Per-Gram"), Some(MakingChargeType::PerGram));
        assert_eq!(MakingChargeType::parse("pergram"), Some(MakingChargeType::PerGram));
        assert_eq!(MakingChargeType::parse(" fixed "), Some(MakingChargeType::Fixed));
        assert_eq!(MakingChargeType::parse("PER_PIECE"), None);
        assert_eq!(MakingChargeType::parse(""), None);
    }

    #[test]
    fn test_discount_type_parse_and_default() {
        assert_eq!(DiscountType::parse("percentage"), Some(DiscountType::Percentage));
        assert_eq!(DiscountType::parse("AMOUNT"), Some(DiscountType::Amount));
        assert_eq!(DiscountType::parse("FLAT"), None);
        assert_eq!(DiscountType::default(), DiscountType::Amount);
    }

    #[test]
    fn test_enum_wire_spelling() {
        let json = serde_json::to_string(&MakingChargeType::PerGram).unwrap();
        assert_eq!(json, "\"PER_GRAM\"");
        assert_eq!(MakingChargeType::PerGram.to_string(), "PER_GRAM");
        assert_eq!(DiscountType::Percentage.to_string(), "PERCENTAGE");
    }

    #[test]
    fn test_shop_tax_config_default() {
        let tax = ShopTaxConfig::default();
        assert_eq!(tax.gst_gold_rate, Decimal::from(3));
        assert_eq!(tax.gst_making_rate, Decimal::from(5));
    }

    #[test]
    fn test_request_deserializes_camel_case() {
        let json = r#"{
            "quantity": 2,
            "materialBreakdown": [{ "weight": "10.5", "ratePerGram": 6000 }],
            "makingChargeType": "FIXED",
            "makingChargeRate": "2000",
            "grossWeight": "10.5"
        }"#;
        let request: LineItemRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.quantity, Some(2));
        let materials = request.material_breakdown.unwrap();
        assert_eq!(materials[0].weight, Some(Decimal::new(105, 1)));
        assert_eq!(materials[0].rate_per_gram, Some(Decimal::from(6000)));
        assert_eq!(materials[0].gst_rate, None);
        assert!(request.gemstone_breakdown.is_none());
        assert_eq!(request.making_charge_type.as_deref(), Some("FIXED"));
        assert!(request.discount_value.is_none());
    }
}
