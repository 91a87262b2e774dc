//! # Catalog Records
//!
//! Shops, catalog items and daily metal rates, and the step that turns a
//! stored item into a pricing request.
//!
//! ## Item → Request
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CatalogItem "RING-22K-001"                                             │
//! │    materials: Gold 22K 8.2 g (no rate)  ──► MetalRate(Gold, 22K) ₹6,150 │
//! │               Silver 925 1.1 g (₹85/g)  ──► item's own rate wins        │
//! │    gemstones: Ruby 0.37 ct @ ₹18,000/ct                                 │
//! │    making:    PER_GRAM 450, wastage 2%                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  LineItemRequest { quantity, materialBreakdown, ..., discount }         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{
    DiscountRequest, GemstoneLineRequest, LineItemRequest, MakingChargeType, MaterialLineRequest,
    ShopTaxConfig,
};

// =============================================================================
// Shop
// =============================================================================

/// A jewelry shop (tenant) and its GST settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: String,
    pub name: String,
    /// Percent. Fallback for material and gemstone lines without a rate.
    #[ts(type = "string")]
    pub gst_gold_rate: Decimal,
    /// Percent applied to the making charge.
    #[ts(type = "string")]
    pub gst_making_rate: Decimal,
    /// Two-digit GST state code (e.g. "27" for Maharashtra).
    pub state_code: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Shop {
    /// Returns the tax configuration used when pricing for this shop.
    #[inline]
    pub fn tax_config(&self) -> ShopTaxConfig {
        ShopTaxConfig::new(self.gst_gold_rate, self.gst_making_rate)
    }
}

// =============================================================================
// Metal Rate
// =============================================================================

/// A shop's per-gram rate for one metal and purity, from `effective_at` on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MetalRate {
    pub shop_id: String,
    pub metal: String,
    pub purity: String,
    #[ts(type = "string")]
    pub rate_per_gram: Decimal,
    #[ts(as = "String")]
    pub effective_at: DateTime<Utc>,
}

impl MetalRate {
    /// True if this rate is for `metal`/`purity` (case-insensitive).
    pub fn matches(&self, metal: &str, purity: &str) -> bool {
        self.metal.trim().eq_ignore_ascii_case(metal.trim())
            && self.purity.trim().eq_ignore_ascii_case(purity.trim())
    }
}

/// Latest rate for `metal`/`purity` among `rates`.
pub fn current_rate<'a>(
    rates: &'a [MetalRate],
    metal: &str,
    purity: &str,
) -> Option<&'a MetalRate> {
    rates
        .iter()
        .filter(|r| r.matches(metal, purity))
        .max_by_key(|r| r.effective_at)
}

// =============================================================================
// Catalog Item
// =============================================================================

/// One metal component of a catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ItemMaterial {
    /// e.g. "Gold", "Silver", "Platinum".
    pub metal: String,
    /// e.g. "22K", "18K", "925".
    pub purity: String,
    /// Grams.
    #[ts(type = "string")]
    pub weight: Decimal,
    /// Fixed rate for this item. `None` means today's metal rate.
    #[ts(type = "string | null")]
    pub rate_per_gram: Option<Decimal>,
    #[ts(type = "string | null")]
    pub gst_rate: Option<Decimal>,
}

impl ItemMaterial {
    /// Display name such as "Gold 22K".
    pub fn display_name(&self) -> String {
        format!("{} {}", self.metal.trim(), self.purity.trim())
    }
}

/// One gemstone set in a catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ItemGemstone {
    pub name: String,
    /// Carats.
    #[ts(type = "string")]
    pub weight: Decimal,
    #[ts(type = "string")]
    pub rate_per_carat: Decimal,
    #[ts(type = "string | null")]
    pub gst_rate: Option<Decimal>,
}

/// A piece of jewelry in a shop's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub shop_id: String,
    pub sku: String,
    pub name: String,
    /// Grams of the finished piece.
    #[ts(type = "string")]
    pub gross_weight: Decimal,
    pub making_charge_type: MakingChargeType,
    #[ts(type = "string")]
    pub making_charge_rate: Decimal,
    #[ts(type = "string")]
    pub wastage_percentage: Decimal,
    pub materials: Vec<ItemMaterial>,
    pub gemstones: Vec<ItemGemstone>,
    pub stock_quantity: i64,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl CatalogItem {
    /// Checks if `quantity` pieces are in stock.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.is_active && self.stock_quantity >= quantity
    }

    /// Builds a pricing request for `quantity` pieces of this item.
    ///
    /// Materials without a fixed rate take the latest matching entry from
    /// `rates`. The result still goes through validation when priced.
    ///
    /// ## Errors
    /// `CoreError::MissingMetalRate` when a material has no fixed rate and
    /// `rates` holds none for its metal and purity.
    pub fn to_line_item_request(
        &self,
        quantity: i64,
        rates: &[MetalRate],
        discount: &DiscountRequest,
    ) -> CoreResult<LineItemRequest> {
        let materials = self
            .materials
            .iter()
            .map(|m| -> CoreResult<MaterialLineRequest> {
                let rate_per_gram = match m.rate_per_gram {
                    Some(rate) => rate,
                    None => current_rate(rates, &m.metal, &m.purity)
                        .map(|r| r.rate_per_gram)
                        .ok_or_else(|| CoreError::MissingMetalRate {
                            metal: m.metal.clone(),
                            purity: m.purity.clone(),
                        })?,
                };

                Ok(MaterialLineRequest {
                    name: Some(m.display_name()),
                    weight: Some(m.weight),
                    rate_per_gram: Some(rate_per_gram),
                    gst_rate: m.gst_rate,
                })
            })
            .collect::<CoreResult<Vec<_>>>()?;

        let gemstones = self
            .gemstones
            .iter()
            .map(|g| GemstoneLineRequest {
                name: Some(g.name.clone()),
                weight: Some(g.weight),
                rate_per_carat: Some(g.rate_per_carat),
                gst_rate: g.gst_rate,
            })
            .collect();

        Ok(LineItemRequest {
            quantity: Some(quantity),
            material_breakdown: Some(materials),
            gemstone_breakdown: Some(gemstones),
            making_charge_type: Some(self.making_charge_type.as_str().to_string()),
            making_charge_rate: Some(self.making_charge_rate),
            gross_weight: Some(self.gross_weight),
            wastage_percentage: Some(self.wastage_percentage),
            discount_type: discount.discount_type.clone(),
            discount_value: discount.discount_value,
        })
    }

    /// Metal/purity pairs that need a daily rate.
    pub fn unpriced_metals(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .materials
            .iter()
            .filter(|m| m.rate_per_gram.is_none())
            .map(|m| (m.metal.clone(), m.purity.clone()))
            .collect();
        pairs.sort();
        pairs.dedup();
        pairs
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::price_line_item;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn rate(metal: &str, purity: &str, rate_per_gram: Decimal, days_ago: i64) -> MetalRate {
        MetalRate {
            shop_id: "shop".to_string(),
            metal: metal.to_string(),
            purity: purity.to_string(),
            rate_per_gram,
            effective_at: Utc::now() - Duration::days(days_ago),
        }
    }

    fn ring() -> CatalogItem {
        let now = Utc::now();
        CatalogItem {
            id: "item-1".to_string(),
            shop_id: "shop".to_string(),
            sku: "RING-22K-001".to_string(),
            name: "Ruby Ring".to_string(),
            gross_weight: dec!(10),
            making_charge_type: MakingChargeType::Percentage,
            making_charge_rate: dec!(10),
            wastage_percentage: Decimal::ZERO,
            materials: vec![ItemMaterial {
                metal: "Gold".to_string(),
                purity: "22K".to_string(),
                weight: dec!(10),
                rate_per_gram: None,
                gst_rate: Some(dec!(3)),
            }],
            gemstones: vec![],
            stock_quantity: 2,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_current_rate_picks_latest() {
        let rates = vec![
            rate("Gold", "22K", dec!(5900), 3),
            rate("gold", "22k", dec!(6000), 0),
            rate("Gold", "18K", dec!(4900), 0),
        ];
        let current = current_rate(&rates, "Gold", "22K").unwrap();
        assert_eq!(current.rate_per_gram, dec!(6000));
        assert!(current_rate(&rates, "Platinum", "950").is_none());
    }

    #[test]
    fn test_item_request_uses_metal_rate() {
        let rates = vec![rate("Gold", "22K", dec!(6000), 0)];
        let request = ring()
            .to_line_item_request(1, &rates, &DiscountRequest::default())
            .unwrap();

        let materials = request.material_breakdown.as_ref().unwrap();
        assert_eq!(materials[0].name.as_deref(), Some("Gold 22K"));
        assert_eq!(materials[0].rate_per_gram, Some(dec!(6000)));

        let breakdown = price_line_item(&request, &ShopTaxConfig::default()).unwrap();
        assert_eq!(breakdown.grand_total, dec!(68100));
    }

    #[test]
    fn test_fixed_item_rate_wins() {
        let mut item = ring();
        item.materials[0].rate_per_gram = Some(dec!(5500));
        let rates = vec![rate("Gold", "22K", dec!(6000), 0)];

        let request = item
            .to_line_item_request(1, &rates, &DiscountRequest::default())
            .unwrap();
        let materials = request.material_breakdown.unwrap();
        assert_eq!(materials[0].rate_per_gram, Some(dec!(5500)));
        assert!(item.unpriced_metals().is_empty());
    }

    #[test]
    fn test_missing_metal_rate() {
        let result = ring().to_line_item_request(1, &[], &DiscountRequest::default());
        assert!(matches!(result, Err(CoreError::MissingMetalRate { .. })));
    }

    #[test]
    fn test_can_sell() {
        let mut item = ring();
        assert!(item.can_sell(2));
        assert!(!item.can_sell(3));
        item.is_active = false;
        assert!(!item.can_sell(1));
    }

    #[test]
    fn test_shop_tax_config() {
        let now = Utc::now();
        let shop = Shop {
            id: "shop".to_string(),
            name: "Lakshmi Jewellers".to_string(),
            gst_gold_rate: dec!(3),
            gst_making_rate: dec!(5),
            state_code: "27".to_string(),
            created_at: now,
            updated_at: now,
        };
        assert_eq!(shop.tax_config(), ShopTaxConfig::default());
    }
}
