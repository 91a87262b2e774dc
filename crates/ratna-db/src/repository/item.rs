//! # Catalog Item Repository
//!
//! Items live in three tables: the item header, its material lines and its
//! gemstone lines. Lines keep their insertion order through `position`.
//!
//! ```text
//! items (1) ──┬── (n) item_materials   metal, purity, weight, rate?, gst?
//!             └── (n) item_gemstones   name, weight, rate/ct, gst?
//! ```

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{parse_decimal, parse_optional_decimal};
use ratna_core::{CatalogItem, ItemGemstone, ItemMaterial, MakingChargeType};

// =============================================================================
// Rows
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: String,
    shop_id: String,
    sku: String,
    name: String,
    gross_weight: String,
    making_charge_type: MakingChargeType,
    making_charge_rate: String,
    wastage_percentage: String,
    stock_quantity: i64,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct MaterialRow {
    metal: String,
    purity: String,
    weight: String,
    rate_per_gram: Option<String>,
    gst_rate: Option<String>,
}

impl TryFrom<MaterialRow> for ItemMaterial {
    type Error = DbError;

    fn try_from(row: MaterialRow) -> DbResult<Self> {
        Ok(ItemMaterial {
            weight: parse_decimal("item_materials.weight", &row.weight)?,
            rate_per_gram: parse_optional_decimal(
                "item_materials.rate_per_gram",
                row.rate_per_gram.as_deref(),
            )?,
            gst_rate: parse_optional_decimal("item_materials.gst_rate", row.gst_rate.as_deref())?,
            metal: row.metal,
            purity: row.purity,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct GemstoneRow {
    name: String,
    weight: String,
    rate_per_carat: String,
    gst_rate: Option<String>,
}

impl TryFrom<GemstoneRow> for ItemGemstone {
    type Error = DbError;

    fn try_from(row: GemstoneRow) -> DbResult<Self> {
        Ok(ItemGemstone {
            weight: parse_decimal("item_gemstones.weight", &row.weight)?,
            rate_per_carat: parse_decimal("item_gemstones.rate_per_carat", &row.rate_per_carat)?,
            gst_rate: parse_optional_decimal("item_gemstones.gst_rate", row.gst_rate.as_deref())?,
            name: row.name,
        })
    }
}

const ITEM_COLUMNS: &str = r#"
    id, shop_id, sku, name, gross_weight,
    making_charge_type, making_charge_rate, wastage_percentage,
    stock_quantity, is_active, created_at, updated_at
"#;

// =============================================================================
// Repository
// =============================================================================

/// Repository for catalog item database operations.
///
/// Every lookup is scoped to a shop; an item ID from another shop is
/// treated as missing.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Inserts an item with its material and gemstone lines.
    ///
    /// All rows are written in one transaction.
    pub async fn insert(&self, item: &CatalogItem) -> DbResult<()> {
        debug!(id = %item.id, sku = %item.sku, "Inserting catalog item");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO items (
                id, shop_id, sku, name, gross_weight,
                making_charge_type, making_charge_rate, wastage_percentage,
                stock_quantity, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&item.id)
        .bind(&item.shop_id)
        .bind(&item.sku)
        .bind(&item.name)
        .bind(item.gross_weight.to_string())
        .bind(item.making_charge_type)
        .bind(item.making_charge_rate.to_string())
        .bind(item.wastage_percentage.to_string())
        .bind(item.stock_quantity)
        .bind(item.is_active)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&mut *tx)
        .await?;

        for (position, material) in item.materials.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO item_materials (
                    item_id, position, metal, purity, weight, rate_per_gram, gst_rate
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )
            .bind(&item.id)
            .bind(position as i64)
            .bind(&material.metal)
            .bind(&material.purity)
            .bind(material.weight.to_string())
            .bind(material.rate_per_gram.map(|d| d.to_string()))
            .bind(material.gst_rate.map(|d| d.to_string()))
            .execute(&mut *tx)
            .await?;
        }

        for (position, gemstone) in item.gemstones.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO item_gemstones (
                    item_id, position, name, weight, rate_per_carat, gst_rate
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&item.id)
            .bind(position as i64)
            .bind(&gemstone.name)
            .bind(gemstone.weight.to_string())
            .bind(gemstone.rate_per_carat.to_string())
            .bind(gemstone.gst_rate.map(|d| d.to_string()))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Gets an item by ID within a shop.
    pub async fn get_by_id(&self, shop_id: &str, id: &str) -> DbResult<Option<CatalogItem>> {
        let sql = format!(
            "SELECT {} FROM items WHERE shop_id = ?1 AND id = ?2",
            ITEM_COLUMNS
        );
        let row: Option<ItemRow> = sqlx::query_as(&sql)
            .bind(shop_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.load_lines(row).await?)),
            None => Ok(None),
        }
    }

    /// Gets an item by SKU within a shop.
    pub async fn get_by_sku(&self, shop_id: &str, sku: &str) -> DbResult<Option<CatalogItem>> {
        let sql = format!(
            "SELECT {} FROM items WHERE shop_id = ?1 AND sku = ?2",
            ITEM_COLUMNS
        );
        let row: Option<ItemRow> = sqlx::query_as(&sql)
            .bind(shop_id)
            .bind(sku)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.load_lines(row).await?)),
            None => Ok(None),
        }
    }

    /// Lists active items of a shop, ordered by SKU.
    pub async fn list_active(&self, shop_id: &str, limit: u32) -> DbResult<Vec<CatalogItem>> {
        let sql = format!(
            "SELECT {} FROM items WHERE shop_id = ?1 AND is_active = 1 ORDER BY sku LIMIT ?2",
            ITEM_COLUMNS
        );
        let rows: Vec<ItemRow> = sqlx::query_as(&sql)
            .bind(shop_id)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(self.load_lines(row).await?);
        }
        Ok(items)
    }

    /// Counts active items of a shop.
    pub async fn count(&self, shop_id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE shop_id = ?1 AND is_active = 1")
                .bind(shop_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Adds `delta` (may be negative) to an item's stock.
    ///
    /// ## Returns
    /// The new stock level.
    ///
    /// ## Errors
    /// - `DbError::NotFound` if the item is not in the shop
    /// - `DbError::Conflict` if stock would go below zero
    pub async fn adjust_stock(&self, shop_id: &str, id: &str, delta: i64) -> DbResult<i64> {
        let mut tx = self.pool.begin().await?;
        let stock = adjust_stock_in(&mut tx, shop_id, id, delta).await?;
        tx.commit().await?;
        Ok(stock)
    }

    async fn load_lines(&self, row: ItemRow) -> DbResult<CatalogItem> {
        let materials: Vec<MaterialRow> = sqlx::query_as(
            r#"
            SELECT metal, purity, weight, rate_per_gram, gst_rate
            FROM item_materials
            WHERE item_id = ?1
            ORDER BY position
            "#,
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await?;

        let gemstones: Vec<GemstoneRow> = sqlx::query_as(
            r#"
            SELECT name, weight, rate_per_carat, gst_rate
            FROM item_gemstones
            WHERE item_id = ?1
            ORDER BY position
            "#,
        )
        .bind(&row.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(CatalogItem {
            gross_weight: parse_decimal("items.gross_weight", &row.gross_weight)?,
            making_charge_rate: parse_decimal("items.making_charge_rate", &row.making_charge_rate)?,
            wastage_percentage: parse_decimal("items.wastage_percentage", &row.wastage_percentage)?,
            materials: materials
                .into_iter()
                .map(ItemMaterial::try_from)
                .collect::<DbResult<_>>()?,
            gemstones: gemstones
                .into_iter()
                .map(ItemGemstone::try_from)
                .collect::<DbResult<_>>()?,
            id: row.id,
            shop_id: row.shop_id,
            sku: row.sku,
            name: row.name,
            making_charge_type: row.making_charge_type,
            stock_quantity: row.stock_quantity,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Stock adjustment inside an open transaction.
///
/// Shared with the sale repository so a sale line and its stock movement
/// commit together.
pub(crate) async fn adjust_stock_in(
    tx: &mut Transaction<'_, Sqlite>,
    shop_id: &str,
    id: &str,
    delta: i64,
) -> DbResult<i64> {
    debug!(id = %id, delta = %delta, "Adjusting stock");

    let result = sqlx::query(
        r#"
        UPDATE items SET
            stock_quantity = stock_quantity + ?3,
            updated_at = ?4
        WHERE shop_id = ?1 AND id = ?2 AND stock_quantity + ?3 >= 0
        "#,
    )
    .bind(shop_id)
    .bind(id)
    .bind(delta)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await?;

    let stock: Option<i64> =
        sqlx::query_scalar("SELECT stock_quantity FROM items WHERE shop_id = ?1 AND id = ?2")
            .bind(shop_id)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;

    match (stock, result.rows_affected()) {
        (None, _) => Err(DbError::not_found("Item", id)),
        (Some(stock), 0) => Err(DbError::Conflict(format!(
            "stock for item {} is {}, cannot apply {}",
            id, stock, delta
        ))),
        (Some(stock), _) => Ok(stock),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures::{self, SHOP_ID};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let db = fixtures::database().await;
        let item = fixtures::ruby_ring("RING-001", 3);
        db.items().insert(&item).await.unwrap();

        let loaded = db.items().get_by_id(SHOP_ID, &item.id).await.unwrap().unwrap();
        assert_eq!(loaded.sku, "RING-001");
        assert_eq!(loaded.gross_weight, dec!(10.4));
        assert_eq!(loaded.making_charge_type, MakingChargeType::Percentage);
        assert_eq!(loaded.materials, item.materials);
        assert_eq!(loaded.gemstones, item.gemstones);
        assert_eq!(loaded.stock_quantity, 3);

        let by_sku = db.items().get_by_sku(SHOP_ID, "RING-001").await.unwrap();
        assert_eq!(by_sku.map(|i| i.id), Some(item.id));
    }

    #[tokio::test]
    async fn test_get_is_scoped_to_shop() {
        let db = fixtures::database().await;
        let item = fixtures::ruby_ring("RING-001", 1);
        db.items().insert(&item).await.unwrap();

        let other = db.items().get_by_id("other-shop", &item.id).await.unwrap();
        assert!(other.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_sku_rejected() {
        let db = fixtures::database().await;
        db.items().insert(&fixtures::ruby_ring("RING-001", 1)).await.unwrap();

        let result = db.items().insert(&fixtures::ruby_ring("RING-001", 1)).await;
        assert!(matches!(result, Err(DbError::UniqueViolation { .. })));
        assert_eq!(db.items().count(SHOP_ID).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_active_and_count() {
        let db = fixtures::database().await;
        let mut retired = fixtures::ruby_ring("RING-000", 0);
        retired.is_active = false;
        db.items().insert(&retired).await.unwrap();
        db.items().insert(&fixtures::ruby_ring("RING-002", 1)).await.unwrap();
        db.items().insert(&fixtures::ruby_ring("RING-001", 1)).await.unwrap();

        let items = db.items().list_active(SHOP_ID, 10).await.unwrap();
        let skus: Vec<&str> = items.iter().map(|i| i.sku.as_str()).collect();
        assert_eq!(skus, vec!["RING-001", "RING-002"]);
        assert_eq!(db.items().count(SHOP_ID).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_adjust_stock() {
        let db = fixtures::database().await;
        let item = fixtures::ruby_ring("RING-001", 2);
        db.items().insert(&item).await.unwrap();

        assert_eq!(db.items().adjust_stock(SHOP_ID, &item.id, -2).await.unwrap(), 0);
        assert!(matches!(
            db.items().adjust_stock(SHOP_ID, &item.id, -1).await,
            Err(DbError::Conflict(_))
        ));
        assert_eq!(db.items().adjust_stock(SHOP_ID, &item.id, 5).await.unwrap(), 5);
        assert!(matches!(
            db.items().adjust_stock(SHOP_ID, "missing", 1).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
