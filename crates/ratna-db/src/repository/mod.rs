//! # Repository Module
//!
//! Database repository implementations for Ratna.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ratna-cli command                                                     │
//! │       │  db.items().get_by_id(shop_id, item_id)                        │
//! │       ▼                                                                 │
//! │  ItemRepository ── SQL ──► SQLite                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  private *Row struct (TEXT decimals) ──TryFrom──► ratna_core record     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`shop::ShopRepository`] - Shops and their GST rates
//! - [`item::ItemRepository`] - Catalog items, materials, gemstones, stock
//! - [`metal_rate::MetalRateRepository`] - Daily metal rates
//! - [`sale::SaleRepository`] - Sales, sale items, totals

pub mod item;
pub mod metal_rate;
pub mod sale;
pub mod shop;

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::{DbError, DbResult};

/// Parses a TEXT decimal column.
pub(crate) fn parse_decimal(column: &str, text: &str) -> DbResult<Decimal> {
    Decimal::from_str(text.trim()).map_err(|e| DbError::decode(column, e))
}

/// Parses a nullable TEXT decimal column.
pub(crate) fn parse_optional_decimal(
    column: &str,
    text: Option<&str>,
) -> DbResult<Option<Decimal>> {
    text.map(|t| parse_decimal(column, t)).transpose()
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Shared records for repository tests.

    use chrono::Utc;
    use ratna_core::{CatalogItem, ItemGemstone, ItemMaterial, MakingChargeType, Shop};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::{Database, DbConfig};

    pub const SHOP_ID: &str = "5a1d7c2e-0000-4000-8000-000000000001";

    pub async fn database() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.shops().insert(&shop()).await.unwrap();
        db
    }

    pub fn shop() -> Shop {
        let now = Utc::now();
        Shop {
            id: SHOP_ID.to_string(),
            name: "Lakshmi Jewellers".to_string(),
            gst_gold_rate: dec!(3),
            gst_making_rate: dec!(5),
            state_code: "27".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// 10 g Gold 22K at the daily rate, one ruby, 10% making.
    pub fn ruby_ring(sku: &str, stock_quantity: i64) -> CatalogItem {
        let now = Utc::now();
        CatalogItem {
            id: Uuid::new_v4().to_string(),
            shop_id: SHOP_ID.to_string(),
            sku: sku.to_string(),
            name: "Ruby Ring".to_string(),
            gross_weight: dec!(10.4),
            making_charge_type: MakingChargeType::Percentage,
            making_charge_rate: dec!(10),
            wastage_percentage: dec!(0),
            materials: vec![ItemMaterial {
                metal: "Gold".to_string(),
                purity: "22K".to_string(),
                weight: dec!(10),
                rate_per_gram: None,
                gst_rate: Some(dec!(3)),
            }],
            gemstones: vec![ItemGemstone {
                name: "Ruby".to_string(),
                weight: dec!(0.5),
                rate_per_carat: dec!(20000),
                gst_rate: None,
            }],
            stock_quantity,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("x", " 6150.50 ").unwrap(), Decimal::new(615050, 2));
        assert!(matches!(
            parse_decimal("items.weight", "ten grams"),
            Err(DbError::Decode { .. })
        ));
        assert_eq!(parse_optional_decimal("x", None).unwrap(), None);
    }
}
