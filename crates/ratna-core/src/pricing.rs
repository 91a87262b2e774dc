//! # Pricing Engine
//!
//! Computes the itemized price of one sale line item.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Line-Item Pricing (per unit)                        │
//! │                                                                         │
//! │  materials ──► value = weight × rate/g ──► gst = value × rate%          │
//! │  gemstones ──► value = weight × rate/ct ──► gst = value × rate%         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  baseValue = Σ material value + Σ gemstone value                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  making = PERCENTAGE: baseValue × rate%                                 │
//! │           PER_GRAM:   grossWeight × rate                                │
//! │           FIXED:      rate                                              │
//! │         + wastage:    baseValue × wastage%                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  baseAmount = baseValue + making ──► − discount ──► amountAfterDiscount │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  totalGst = gst(materials) + gst(gemstones) + making × gstMaking%       │
//! │  totalAmount = amountAfterDiscount + totalGst                           │
//! │                                                                         │
//! │  per quantity: every figure above × quantity                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! GST is charged on the pre-discount values. A discount reduces the
//! taxable base amount shown to the customer but not the tax lines.
//!
//! No rounding happens here. Use [`crate::money::round_money`] when
//! presenting figures.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::{percent_of, scale};
use crate::types::{
    DiscountPolicy, DiscountType, GemstoneLine, LineItemInput, LineItemRequest,
    MakingChargePolicy, MakingChargeType, MaterialLine, ShopTaxConfig,
};
use crate::validation::validate_line_item;

// =============================================================================
// Breakdown Types
// =============================================================================

/// Valuation of one material or gemstone line.
///
/// `weight` is grams for materials and carats for gemstones; `rate` is the
/// matching per-unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineValuation {
    pub name: Option<String>,
    #[ts(type = "string")]
    pub weight: Decimal,
    #[ts(type = "string")]
    pub rate: Decimal,
    #[ts(type = "string")]
    pub total_value: Decimal,
    #[ts(type = "string")]
    pub gst_rate: Decimal,
    #[ts(type = "string")]
    pub gst_amount: Decimal,
}

impl LineValuation {
    fn new(name: Option<String>, weight: Decimal, rate: Decimal, gst_rate: Decimal) -> Self {
        let total_value = weight * rate;
        LineValuation {
            name,
            weight,
            rate,
            total_value,
            gst_rate,
            gst_amount: percent_of(total_value, gst_rate),
        }
    }

    fn scaled(&self, quantity: u32) -> Self {
        LineValuation {
            name: self.name.clone(),
            weight: scale(self.weight, quantity),
            rate: self.rate,
            total_value: scale(self.total_value, quantity),
            gst_rate: self.gst_rate,
            gst_amount: scale(self.gst_amount, quantity),
        }
    }
}

/// GST per component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct GstBreakdown {
    #[ts(type = "string")]
    pub on_materials: Decimal,
    #[ts(type = "string")]
    pub on_gemstones: Decimal,
    #[ts(type = "string")]
    pub on_making: Decimal,
    /// Always `on_materials + on_gemstones + on_making`.
    #[ts(type = "string")]
    pub total: Decimal,
}

impl GstBreakdown {
    fn new(on_materials: Decimal, on_gemstones: Decimal, on_making: Decimal) -> Self {
        GstBreakdown {
            on_materials,
            on_gemstones,
            on_making,
            total: on_materials + on_gemstones + on_making,
        }
    }

    fn scaled(&self, quantity: u32) -> Self {
        GstBreakdown {
            on_materials: scale(self.on_materials, quantity),
            on_gemstones: scale(self.on_gemstones, quantity),
            on_making: scale(self.on_making, quantity),
            total: scale(self.total, quantity),
        }
    }
}

/// Itemized figures for one unit, or for the whole quantity.
///
/// `making_charge_amount` is the wastage-inclusive making charge;
/// `making_charge` and `wastage_amount` are its two parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct UnitBreakdown {
    pub materials: Vec<LineValuation>,
    pub gemstones: Vec<LineValuation>,
    #[ts(type = "string")]
    pub total_material_weight: Decimal,
    #[ts(type = "string")]
    pub total_material_value: Decimal,
    #[ts(type = "string")]
    pub total_gemstone_weight: Decimal,
    #[ts(type = "string")]
    pub total_gemstone_value: Decimal,
    #[ts(type = "string")]
    pub making_charge: Decimal,
    #[ts(type = "string")]
    pub wastage_amount: Decimal,
    #[ts(type = "string")]
    pub making_charge_amount: Decimal,
    #[ts(type = "string")]
    pub base_amount: Decimal,
    #[ts(type = "string")]
    pub discount_amount: Decimal,
    /// Not clamped: an AMOUNT discount larger than `base_amount` makes
    /// this negative.
    #[ts(type = "string")]
    pub amount_after_discount: Decimal,
    pub gst: GstBreakdown,
    #[ts(type = "string")]
    pub total_amount: Decimal,
}

impl UnitBreakdown {
    fn scaled(&self, quantity: u32) -> Self {
        UnitBreakdown {
            materials: self.materials.iter().map(|l| l.scaled(quantity)).collect(),
            gemstones: self.gemstones.iter().map(|l| l.scaled(quantity)).collect(),
            total_material_weight: scale(self.total_material_weight, quantity),
            total_material_value: scale(self.total_material_value, quantity),
            total_gemstone_weight: scale(self.total_gemstone_weight, quantity),
            total_gemstone_value: scale(self.total_gemstone_value, quantity),
            making_charge: scale(self.making_charge, quantity),
            wastage_amount: scale(self.wastage_amount, quantity),
            making_charge_amount: scale(self.making_charge_amount, quantity),
            base_amount: scale(self.base_amount, quantity),
            discount_amount: scale(self.discount_amount, quantity),
            amount_after_discount: scale(self.amount_after_discount, quantity),
            gst: self.gst.scaled(quantity),
            total_amount: scale(self.total_amount, quantity),
        }
    }
}

/// The full result of pricing one line item.
///
/// ## JSON Shape (abridged)
/// ```json
/// {
///   "quantity": 3,
///   "makingChargeType": "PERCENTAGE",
///   "discountType": "AMOUNT",
///   "gstMakingRate": "5",
///   "perUnit":     { "baseAmount": "66000", "gst": { "total": "2100", ... }, "totalAmount": "68100", ... },
///   "perQuantity": { "baseAmount": "198000", "gst": { "total": "6300", ... }, "totalAmount": "204300", ... },
///   "grandTotal": "204300"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub quantity: u32,
    pub making_charge_type: MakingChargeType,
    pub discount_type: DiscountType,
    #[ts(type = "string")]
    pub gst_making_rate: Decimal,
    pub per_unit: UnitBreakdown,
    pub per_quantity: UnitBreakdown,
    #[ts(type = "string")]
    pub grand_total: Decimal,
}

impl PriceBreakdown {
    /// True when the discount exceeds the base amount, leaving a negative
    /// amount after discount.
    pub fn is_over_discounted(&self) -> bool {
        self.per_unit.amount_after_discount < Decimal::ZERO
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Validates a raw request and prices it.
///
/// ## Errors
/// `CoreError::Validation` when the request is malformed (missing field,
/// non-positive weight, zero quantity, empty material list, unknown
/// making-charge type, out-of-range percentage) or when a quantity,
/// weight, rate or amount exceeds its cap.
///
/// ## Example
/// ```rust
/// use ratna_core::pricing::price_line_item;
/// use ratna_core::types::{LineItemRequest, ShopTaxConfig};
///
/// let request = LineItemRequest { quantity: Some(0), ..Default::default() };
/// assert!(price_line_item(&request, &ShopTaxConfig::default()).is_err());
/// ```
pub fn price_line_item(
    request: &LineItemRequest,
    tax: &ShopTaxConfig,
) -> CoreResult<PriceBreakdown> {
    let input = validate_line_item(request, tax)?;
    Ok(compute_line_item_price(&input, tax))
}

/// Prices a validated line item.
///
/// Infallible and pure: the same input always yields the same breakdown.
///
/// ## Bounds
/// Quantities, weights, rates and amounts must lie within the `MAX_*` caps
/// that [`validate_line_item`] enforces. Inside them no figure exceeds
/// about 1e25, far below `Decimal::MAX`, so no step can overflow.
pub fn compute_line_item_price(input: &LineItemInput, tax: &ShopTaxConfig) -> PriceBreakdown {
    let materials: Vec<LineValuation> = input.materials.iter().map(value_material).collect();
    let gemstones: Vec<LineValuation> = input.gemstones.iter().map(value_gemstone).collect();

    let total_material_weight = materials.iter().map(|l| l.weight).sum::<Decimal>();
    let total_material_value = materials.iter().map(|l| l.total_value).sum::<Decimal>();
    let gst_on_materials = materials.iter().map(|l| l.gst_amount).sum::<Decimal>();

    let total_gemstone_weight = gemstones.iter().map(|l| l.weight).sum::<Decimal>();
    let total_gemstone_value = gemstones.iter().map(|l| l.total_value).sum::<Decimal>();
    let gst_on_gemstones = gemstones.iter().map(|l| l.gst_amount).sum::<Decimal>();

    let base_value = total_material_value + total_gemstone_value;

    let making_charge =
        making_charge_before_wastage(&input.making, base_value, input.gross_weight);
    let wastage_amount = if input.making.wastage_percentage > Decimal::ZERO {
        percent_of(base_value, input.making.wastage_percentage)
    } else {
        Decimal::ZERO
    };
    let making_charge_amount = making_charge + wastage_amount;

    let gst_on_making = percent_of(making_charge_amount, tax.gst_making_rate);

    let base_amount = total_material_value + total_gemstone_value + making_charge_amount;
    let discount_amount = discount_for(&input.discount, base_amount);
    let amount_after_discount = base_amount - discount_amount;

    let gst = GstBreakdown::new(gst_on_materials, gst_on_gemstones, gst_on_making);
    let total_amount = amount_after_discount + gst.total;

    let per_unit = UnitBreakdown {
        materials,
        gemstones,
        total_material_weight,
        total_material_value,
        total_gemstone_weight,
        total_gemstone_value,
        making_charge,
        wastage_amount,
        making_charge_amount,
        base_amount,
        discount_amount,
        amount_after_discount,
        gst,
        total_amount,
    };
    let per_quantity = per_unit.scaled(input.quantity);

    PriceBreakdown {
        quantity: input.quantity,
        making_charge_type: input.making.charge_type,
        discount_type: input.discount.discount_type,
        gst_making_rate: tax.gst_making_rate,
        grand_total: per_quantity.total_amount,
        per_unit,
        per_quantity,
    }
}

fn value_material(line: &MaterialLine) -> LineValuation {
    LineValuation::new(line.name.clone(), line.weight, line.rate_per_gram, line.gst_rate)
}

fn value_gemstone(line: &GemstoneLine) -> LineValuation {
    LineValuation::new(line.name.clone(), line.weight, line.rate_per_carat, line.gst_rate)
}

/// Making charge before wastage.
fn making_charge_before_wastage(
    policy: &MakingChargePolicy,
    base_value: Decimal,
    gross_weight: Decimal,
) -> Decimal {
    match policy.charge_type {
        MakingChargeType::Percentage => percent_of(base_value, policy.rate),
        MakingChargeType::PerGram => gross_weight * policy.rate,
        MakingChargeType::Fixed => policy.rate,
    }
}

fn discount_for(policy: &DiscountPolicy, base_amount: Decimal) -> Decimal {
    if policy.value <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    match policy.discount_type {
        DiscountType::Percentage => percent_of(base_amount, policy.value),
        DiscountType::Amount => policy.value,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
