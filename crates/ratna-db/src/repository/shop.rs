//! # Shop Repository
//!
//! Shops and their GST settings.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::parse_decimal;
use ratna_core::{Shop, ShopTaxConfig};

#[derive(Debug, sqlx::FromRow)]
struct ShopRow {
    id: String,
    name: String,
    gst_gold_rate: String,
    gst_making_rate: String,
    state_code: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ShopRow> for Shop {
    type Error = DbError;

    fn try_from(row: ShopRow) -> DbResult<Self> {
        Ok(Shop {
            gst_gold_rate: parse_decimal("shops.gst_gold_rate", &row.gst_gold_rate)?,
            gst_making_rate: parse_decimal("shops.gst_making_rate", &row.gst_making_rate)?,
            id: row.id,
            name: row.name,
            state_code: row.state_code,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for shop database operations.
#[derive(Debug, Clone)]
pub struct ShopRepository {
    pool: SqlitePool,
}

impl ShopRepository {
    /// Creates a new ShopRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ShopRepository { pool }
    }

    /// Inserts a shop.
    pub async fn insert(&self, shop: &Shop) -> DbResult<()> {
        debug!(id = %shop.id, name = %shop.name, "Inserting shop");

        sqlx::query(
            r#"
            INSERT INTO shops (
                id, name, gst_gold_rate, gst_making_rate, state_code,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&shop.id)
        .bind(&shop.name)
        .bind(shop.gst_gold_rate.to_string())
        .bind(shop.gst_making_rate.to_string())
        .bind(&shop.state_code)
        .bind(shop.created_at)
        .bind(shop.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a shop by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Shop>> {
        let row: Option<ShopRow> = sqlx::query_as(
            r#"
            SELECT id, name, gst_gold_rate, gst_making_rate, state_code,
                   created_at, updated_at
            FROM shops
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Shop::try_from).transpose()
    }

    /// Returns the GST rates used to price items for this shop.
    ///
    /// ## Errors
    /// `DbError::NotFound` if the shop does not exist.
    pub async fn tax_config(&self, shop_id: &str) -> DbResult<ShopTaxConfig> {
        self.get_by_id(shop_id)
            .await?
            .map(|shop| shop.tax_config())
            .ok_or_else(|| DbError::not_found("Shop", shop_id))
    }

    /// Replaces a shop's GST rates.
    pub async fn update_tax_rates(&self, shop_id: &str, tax: &ShopTaxConfig) -> DbResult<()> {
        debug!(
            shop_id = %shop_id,
            gold = %tax.gst_gold_rate,
            making = %tax.gst_making_rate,
            "Updating shop tax rates"
        );

        let result = sqlx::query(
            r#"
            UPDATE shops SET
                gst_gold_rate = ?2,
                gst_making_rate = ?3,
                updated_at = ?4
            WHERE id = ?1
            "#,
        )
        .bind(shop_id)
        .bind(tax.gst_gold_rate.to_string())
        .bind(tax.gst_making_rate.to_string())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Shop", shop_id));
        }

        Ok(())
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
    async fn test_get_and_tax_config() {
        let db = fixtures::database().await;

        let shop = db.shops().get_by_id(SHOP_ID).await.unwrap().unwrap();
        assert_eq!(shop.name, "Lakshmi Jewellers");
        assert_eq!(shop.state_code, "27");

        let tax = db.shops().tax_config(SHOP_ID).await.unwrap();
        assert_eq!(tax, ShopTaxConfig::new(dec!(3), dec!(5)));
    }

    #[tokio::test]
    async fn test_missing_shop() {
        let db = fixtures::database().await;

        assert!(db.shops().get_by_id("nope").await.unwrap().is_none());
        assert!(matches!(
            db.shops().tax_config("nope").await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_tax_rates_keeps_precision() {
        let db = fixtures::database().await;

        let tax = ShopTaxConfig::new(dec!(3), dec!(5.25));
        db.shops().update_tax_rates(SHOP_ID, &tax).await.unwrap();
        assert_eq!(db.shops().tax_config(SHOP_ID).await.unwrap(), tax);

        assert!(db.shops().update_tax_rates("nope", &tax).await.is_err());
    }

    #[tokio::test]
    async fn test_duplicate_shop() {
        let db = fixtures::database().await;
        let result = db.shops().insert(&fixtures::shop()).await;
        assert!(matches!(result, Err(DbError::UniqueViolation { .. })));
    }
}
