//! # Sale Repository
//!
//! Database operations for sales and sale items.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. CREATE DRAFT                                                       │
//! │     └── create_sale() → Sale { status: Draft, invoice INV-... }        │
//! │                                                                         │
//! │  2. ADD ITEMS (one transaction each)                                   │
//! │     └── add_item() → insert line + breakdown JSON                      │
//! │                    → decrement item stock                              │
//! │                    → recompute sale totals from every line             │
//! │                                                                         │
//! │  3. FINALIZE                                                           │
//! │     └── finalize_sale() → Sale { status: Completed }                   │
//! │                                                                         │
//! │  4. (OPTIONAL) VOID                                                    │
//! │     └── void_sale() → Sale { status: Voided }, stock returned          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::item::adjust_stock_in;
use crate::repository::parse_decimal;
use ratna_core::sale::generate_invoice_number;
use ratna_core::{PriceBreakdown, Sale, SaleItem, SaleStatus, SaleTotals};

// =============================================================================
// Rows
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    shop_id: String,
    invoice_number: String,
    customer_name: Option<String>,
    customer_state_code: Option<String>,
    status: SaleStatus,
    subtotal: String,
    discount: String,
    gst: String,
    total: String,
    user_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<SaleRow> for Sale {
    type Error = DbError;

    fn try_from(row: SaleRow) -> DbResult<Self> {
        Ok(Sale {
            subtotal: parse_decimal("sales.subtotal", &row.subtotal)?,
            discount: parse_decimal("sales.discount", &row.discount)?,
            gst: parse_decimal("sales.gst", &row.gst)?,
            total: parse_decimal("sales.total", &row.total)?,
            id: row.id,
            shop_id: row.shop_id,
            invoice_number: row.invoice_number,
            customer_name: row.customer_name,
            customer_state_code: row.customer_state_code,
            status: row.status,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            completed_at: row.completed_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SaleItemRow {
    id: String,
    sale_id: String,
    item_id: String,
    sku_snapshot: String,
    name_snapshot: String,
    quantity: i64,
    breakdown: String,
    total_amount: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<SaleItemRow> for SaleItem {
    type Error = DbError;

    fn try_from(row: SaleItemRow) -> DbResult<Self> {
        Ok(SaleItem {
            breakdown: serde_json::from_str(&row.breakdown)?,
            total_amount: parse_decimal("sale_items.total_amount", &row.total_amount)?,
            id: row.id,
            sale_id: row.sale_id,
            item_id: row.item_id,
            sku_snapshot: row.sku_snapshot,
            name_snapshot: row.name_snapshot,
            quantity: row.quantity,
            created_at: row.created_at,
        })
    }
}

/// A priced line ready to be stored on a draft sale.
#[derive(Debug, Clone)]
pub struct NewSaleItem {
    pub shop_id: String,
    pub sale_id: String,
    pub item_id: String,
    pub sku: String,
    pub name: String,
    pub breakdown: PriceBreakdown,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Creates a new draft sale with zero totals.
    pub async fn create_sale(
        &self,
        shop_id: &str,
        user_id: &str,
        customer_name: Option<&str>,
        customer_state_code: Option<&str>,
    ) -> DbResult<Sale> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let sale = Sale {
            invoice_number: generate_invoice_number(&id, now),
            id,
            shop_id: shop_id.to_string(),
            customer_name: customer_name.map(str::to_string),
            customer_state_code: customer_state_code.map(str::to_string),
            status: SaleStatus::Draft,
            subtotal: Default::default(),
            discount: Default::default(),
            gst: Default::default(),
            total: Default::default(),
            user_id: user_id.to_string(),
            created_at: now,
            updated_at: now,
            completed_at: None,
        };

        debug!(id = %sale.id, invoice_number = %sale.invoice_number, "Creating sale");

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, shop_id, invoice_number, customer_name, customer_state_code,
                status, subtotal, discount, gst, total,
                user_id, created_at, updated_at, completed_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.shop_id)
        .bind(&sale.invoice_number)
        .bind(&sale.customer_name)
        .bind(&sale.customer_state_code)
        .bind(sale.status)
        .bind(sale.subtotal.to_string())
        .bind(sale.discount.to_string())
        .bind(sale.gst.to_string())
        .bind(sale.total.to_string())
        .bind(&sale.user_id)
        .bind(sale.created_at)
        .bind(sale.updated_at)
        .bind(sale.completed_at)
        .execute(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets a sale by ID within a shop.
    pub async fn get_by_id(&self, shop_id: &str, id: &str) -> DbResult<Option<Sale>> {
        let row: Option<SaleRow> = sqlx::query_as(
            r#"
            SELECT
                id, shop_id, invoice_number, customer_name, customer_state_code,
                status, subtotal, discount, gst, total,
                user_id, created_at, updated_at, completed_at
            FROM sales
            WHERE shop_id = ?1 AND id = ?2
            "#,
        )
        .bind(shop_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Sale::try_from).transpose()
    }

    /// Adds a priced line to a draft sale.
    ///
    /// ## What This Does (one transaction)
    /// 1. Checks the sale exists in the shop and is a draft
    /// 2. Inserts the line with its breakdown as JSON
    /// 3. Takes the quantity out of the item's stock
    /// 4. Recomputes the sale totals from all of its lines
    ///
    /// ## Errors
    /// - `DbError::NotFound` for an unknown sale or item
    /// - `DbError::Conflict` if the sale is not a draft or stock is short
    pub async fn add_item(&self, new_item: &NewSaleItem) -> DbResult<SaleItem> {
        let quantity = i64::from(new_item.breakdown.quantity);
        debug!(
            sale_id = %new_item.sale_id,
            item_id = %new_item.item_id,
            quantity = quantity,
            "Adding sale item"
        );

        let item = SaleItem {
            id: Uuid::new_v4().to_string(),
            sale_id: new_item.sale_id.clone(),
            item_id: new_item.item_id.clone(),
            sku_snapshot: new_item.sku.clone(),
            name_snapshot: new_item.name.clone(),
            quantity,
            total_amount: new_item.breakdown.grand_total,
            breakdown: new_item.breakdown.clone(),
            created_at: Utc::now(),
        };

        let mut tx = self.pool.begin().await?;

        let status = sale_status_in(&mut tx, &new_item.shop_id, &new_item.sale_id).await?;
        if status != SaleStatus::Draft {
            return Err(DbError::Conflict(format!(
                "sale {} is {}",
                new_item.sale_id, status
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO sale_items (
                id, sale_id, item_id, sku_snapshot, name_snapshot,
                quantity, breakdown, total_amount, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&item.id)
        .bind(&item.sale_id)
        .bind(&item.item_id)
        .bind(&item.sku_snapshot)
        .bind(&item.name_snapshot)
        .bind(item.quantity)
        .bind(serde_json::to_string(&item.breakdown)?)
        .bind(item.total_amount.to_string())
        .bind(item.created_at)
        .execute(&mut *tx)
        .await?;

        adjust_stock_in(&mut tx, &new_item.shop_id, &new_item.item_id, -quantity).await?;
        recompute_totals_in(&mut tx, &new_item.sale_id).await?;

        tx.commit().await?;
        Ok(item)
    }

    /// Gets all items for a sale, in the order they were added.
    pub async fn get_items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let rows: Vec<SaleItemRow> = sqlx::query_as(
            r#"
            SELECT
                id, sale_id, item_id, sku_snapshot, name_snapshot,
                quantity, breakdown, total_amount, created_at
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY created_at, rowid
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SaleItem::try_from).collect()
    }

    /// Finalizes a draft sale that has at least one item.
    pub async fn finalize_sale(&self, shop_id: &str, sale_id: &str) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let status = sale_status_in(&mut tx, shop_id, sale_id).await?;
        if status != SaleStatus::Draft {
            return Err(DbError::Conflict(format!("sale {} is {}", sale_id, status)));
        }

        let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_items WHERE sale_id = ?1")
            .bind(sale_id)
            .fetch_one(&mut *tx)
            .await?;
        if items == 0 {
            return Err(DbError::Conflict(format!("sale {} has no items", sale_id)));
        }

        let now = Utc::now();
        sqlx::query(
            r#"
            UPDATE sales SET
                status = ?2,
                completed_at = ?3,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(sale_id)
        .bind(SaleStatus::Completed)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        info!(sale_id = %sale_id, items = items, "Sale finalized");
        Ok(())
    }

    /// Voids a draft or completed sale and returns its items to stock.
    pub async fn void_sale(&self, shop_id: &str, sale_id: &str) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let status = sale_status_in(&mut tx, shop_id, sale_id).await?;
        if status == SaleStatus::Voided {
            return Err(DbError::Conflict(format!("sale {} is {}", sale_id, status)));
        }

        let lines: Vec<(String, i64)> =
            sqlx::query_as("SELECT item_id, quantity FROM sale_items WHERE sale_id = ?1")
                .bind(sale_id)
                .fetch_all(&mut *tx)
                .await?;

        for (item_id, quantity) in &lines {
            adjust_stock_in(&mut tx, shop_id, item_id, *quantity).await?;
        }

        sqlx::query("UPDATE sales SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(sale_id)
            .bind(SaleStatus::Voided)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(sale_id = %sale_id, restocked_lines = lines.len(), "Sale voided");
        Ok(())
    }
}

async fn sale_status_in(
    tx: &mut Transaction<'_, Sqlite>,
    shop_id: &str,
    sale_id: &str,
) -> DbResult<SaleStatus> {
    let status: Option<SaleStatus> =
        sqlx::query_scalar("SELECT status FROM sales WHERE shop_id = ?1 AND id = ?2")
            .bind(shop_id)
            .bind(sale_id)
            .fetch_optional(&mut **tx)
            .await?;

    status.ok_or_else(|| DbError::not_found("Sale", sale_id))
}

/// Rebuilds the sale header totals from the stored breakdowns.
async fn recompute_totals_in(tx: &mut Transaction<'_, Sqlite>, sale_id: &str) -> DbResult<()> {
    let stored: Vec<String> =
        sqlx::query_scalar("SELECT breakdown FROM sale_items WHERE sale_id = ?1")
            .bind(sale_id)
            .fetch_all(&mut **tx)
            .await?;

    let breakdowns = stored
        .iter()
        .map(|json| serde_json::from_str::<PriceBreakdown>(json))
        .collect::<Result<Vec<_>, _>>()?;
    let totals = SaleTotals::from_breakdowns(&breakdowns);

    sqlx::query(
        r#"
        UPDATE sales SET
            subtotal = ?2,
            discount = ?3,
            gst = ?4,
            total = ?5,
            updated_at = ?6
        WHERE id = ?1
        "#,
    )
    .bind(sale_id)
    .bind(totals.subtotal.to_string())
    .bind(totals.discount.to_string())
    .bind(totals.gst.to_string())
    .bind(totals.total.to_string())
    .bind(Utc::now())
    .execute(&mut **tx)
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures::{self, SHOP_ID};
    use crate::Database;
    use ratna_core::{CatalogItem, DiscountRequest, ShopTaxConfig};
    use rust_decimal_macros::dec;

    const USER_ID: &str = "cashier-1";

    async fn stocked(db: &Database, stock: i64) -> CatalogItem {
        let item = fixtures::ruby_ring("RING-001", stock);
        db.items().insert(&item).await.unwrap();
        let effective_at = Utc::now() - chrono::Duration::hours(1);
        db.metal_rates()
            .set_rate(SHOP_ID, "Gold", "22K", dec!(6000), effective_at)
            .await
            .unwrap();
        item
    }

    async fn priced_line(
        db: &Database,
        item: &CatalogItem,
        sale: &Sale,
        quantity: i64,
    ) -> NewSaleItem {
        let rates = db
            .metal_rates()
            .current_rates(SHOP_ID, &item.unpriced_metals())
            .await
            .unwrap();
        let request = item
            .to_line_item_request(quantity, &rates, &DiscountRequest::default())
            .unwrap();
        let breakdown = ratna_core::price_line_item(&request, &ShopTaxConfig::default()).unwrap();

        NewSaleItem {
            shop_id: SHOP_ID.to_string(),
            sale_id: sale.id.clone(),
            item_id: item.id.clone(),
            sku: item.sku.clone(),
            name: item.name.clone(),
            breakdown,
        }
    }

    #[tokio::test]
    async fn test_create_and_get_sale() {
        let db = fixtures::database().await;
        let sale = db
            .sales()
            .create_sale(SHOP_ID, USER_ID, Some("Meera"), Some("29"))
            .await
            .unwrap();

        let loaded = db.sales().get_by_id(SHOP_ID, &sale.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, SaleStatus::Draft);
        assert_eq!(loaded.customer_name.as_deref(), Some("Meera"));
        assert_eq!(loaded.customer_state_code.as_deref(), Some("29"));
        assert!(loaded.invoice_number.starts_with("INV-"));
        assert!(loaded.total.is_zero());

        assert!(db.sales().get_by_id("other", &sale.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_item_updates_totals_and_stock() {
        let db = fixtures::database().await;
        let item = stocked(&db, 3).await;
        let sale = db.sales().create_sale(SHOP_ID, USER_ID, None, None).await.unwrap();

        let line = priced_line(&db, &item, &sale, 2).await;
        let expected = line.breakdown.clone();
        let stored = db.sales().add_item(&line).await.unwrap();
        assert_eq!(stored.total_amount, expected.grand_total);

        let items = db.sales().get_items(&sale.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].breakdown, expected);
        assert_eq!(items[0].sku_snapshot, "RING-001");

        let sale = db.sales().get_by_id(SHOP_ID, &sale.id).await.unwrap().unwrap();
        let totals = SaleTotals::from_breakdowns(&[expected]);
        assert_eq!(sale.subtotal, totals.subtotal);
        assert_eq!(sale.gst, totals.gst);
        assert_eq!(sale.total, totals.total);

        let item = db.items().get_by_id(SHOP_ID, &item.id).await.unwrap().unwrap();
        assert_eq!(item.stock_quantity, 1);
    }

    #[tokio::test]
    async fn test_add_item_short_stock_rolls_back() {
        let db = fixtures::database().await;
        let item = stocked(&db, 1).await;
        let sale = db.sales().create_sale(SHOP_ID, USER_ID, None, None).await.unwrap();

        let line = priced_line(&db, &item, &sale, 2).await;
        assert!(matches!(db.sales().add_item(&line).await, Err(DbError::Conflict(_))));

        assert!(db.sales().get_items(&sale.id).await.unwrap().is_empty());
        let sale = db.sales().get_by_id(SHOP_ID, &sale.id).await.unwrap().unwrap();
        assert!(sale.total.is_zero());
    }

    #[tokio::test]
    async fn test_finalize_sale() {
        let db = fixtures::database().await;
        let item = stocked(&db, 2).await;
        let sale = db.sales().create_sale(SHOP_ID, USER_ID, None, None).await.unwrap();

        assert!(matches!(
            db.sales().finalize_sale(SHOP_ID, &sale.id).await,
            Err(DbError::Conflict(_))
        ));

        let line = priced_line(&db, &item, &sale, 1).await;
        db.sales().add_item(&line).await.unwrap();
        db.sales().finalize_sale(SHOP_ID, &sale.id).await.unwrap();

        let loaded = db.sales().get_by_id(SHOP_ID, &sale.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, SaleStatus::Completed);
        assert!(loaded.completed_at.is_some());

        // Completed sales take no more lines.
        assert!(matches!(db.sales().add_item(&line).await, Err(DbError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_void_sale_restocks() {
        let db = fixtures::database().await;
        let item = stocked(&db, 2).await;
        let sale = db.sales().create_sale(SHOP_ID, USER_ID, None, None).await.unwrap();

        let line = priced_line(&db, &item, &sale, 2).await;
        db.sales().add_item(&line).await.unwrap();
        db.sales().void_sale(SHOP_ID, &sale.id).await.unwrap();

        let loaded = db.sales().get_by_id(SHOP_ID, &sale.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, SaleStatus::Voided);
        let item = db.items().get_by_id(SHOP_ID, &item.id).await.unwrap().unwrap();
        assert_eq!(item.stock_quantity, 2);

        assert!(matches!(
            db.sales().void_sale(SHOP_ID, &sale.id).await,
            Err(DbError::Conflict(_))
        ));
        assert!(matches!(
            db.sales().void_sale(SHOP_ID, "missing").await,
            Err(DbError::NotFound { .. })
        ));
    }
}
