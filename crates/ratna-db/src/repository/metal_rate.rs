//! # Metal Rate Repository
//!
//! Daily per-gram rates for each (metal, purity) a shop sells.
//!
//! Rates are append-only: setting a new rate inserts a row, and the current
//! rate is the one with the latest `effective_at` not in the future. Old
//! rows stay for audit.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::parse_decimal;
use ratna_core::MetalRate;

#[derive(Debug, sqlx::FromRow)]
struct MetalRateRow {
    shop_id: String,
    metal: String,
    purity: String,
    rate_per_gram: String,
    effective_at: DateTime<Utc>,
}

impl TryFrom<MetalRateRow> for MetalRate {
    type Error = DbError;

    fn try_from(row: MetalRateRow) -> DbResult<Self> {
        Ok(MetalRate {
            rate_per_gram: parse_decimal("metal_rates.rate_per_gram", &row.rate_per_gram)?,
            shop_id: row.shop_id,
            metal: row.metal,
            purity: row.purity,
            effective_at: row.effective_at,
        })
    }
}

/// Repository for metal rate database operations.
#[derive(Debug, Clone)]
pub struct MetalRateRepository {
    pool: SqlitePool,
}

impl MetalRateRepository {
    /// Creates a new MetalRateRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MetalRateRepository { pool }
    }

    /// Records a rate effective from `effective_at`.
    pub async fn set_rate(
        &self,
        shop_id: &str,
        metal: &str,
        purity: &str,
        rate_per_gram: Decimal,
        effective_at: DateTime<Utc>,
    ) -> DbResult<MetalRate> {
        debug!(
            shop_id = %shop_id,
            metal = %metal,
            purity = %purity,
            rate = %rate_per_gram,
            "Setting metal rate"
        );

        let rate = MetalRate {
            shop_id: shop_id.to_string(),
            metal: metal.trim().to_string(),
            purity: purity.trim().to_string(),
            rate_per_gram,
            effective_at,
        };

        sqlx::query(
            r#"
            INSERT INTO metal_rates (id, shop_id, metal, purity, rate_per_gram, effective_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&rate.shop_id)
        .bind(&rate.metal)
        .bind(&rate.purity)
        .bind(rate.rate_per_gram.to_string())
        .bind(rate.effective_at)
        .execute(&self.pool)
        .await?;

        Ok(rate)
    }

    /// Returns the rate in force now for `metal`/`purity` (case-insensitive).
    pub async fn current_rate(
        &self,
        shop_id: &str,
        metal: &str,
        purity: &str,
    ) -> DbResult<Option<MetalRate>> {
        let row: Option<MetalRateRow> = sqlx::query_as(
            r#"
            SELECT shop_id, metal, purity, rate_per_gram, effective_at
            FROM metal_rates
            WHERE shop_id = ?1
              AND metal = ?2 COLLATE NOCASE
              AND purity = ?3 COLLATE NOCASE
              AND effective_at <= ?4
            ORDER BY effective_at DESC
            LIMIT 1
            "#,
        )
        .bind(shop_id)
        .bind(metal.trim())
        .bind(purity.trim())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        row.map(MetalRate::try_from).transpose()
    }

    /// Current rates for each requested (metal, purity) pair.
    ///
    /// Pairs with no rate are left out; the caller decides whether that is
    /// an error.
    pub async fn current_rates(
        &self,
        shop_id: &str,
        pairs: &[(String, String)],
    ) -> DbResult<Vec<MetalRate>> {
        let mut rates = Vec::with_capacity(pairs.len());
        for (metal, purity) in pairs {
            if let Some(rate) = self.current_rate(shop_id, metal, purity).await? {
                rates.push(rate);
            }
        }
        Ok(rates)
    }

    /// Every rate currently in force for a shop, ordered by metal and purity.
    pub async fn list_current(&self, shop_id: &str) -> DbResult<Vec<MetalRate>> {
        let rows: Vec<MetalRateRow> = sqlx::query_as(
            r#"
            SELECT m.shop_id, m.metal, m.purity, m.rate_per_gram, m.effective_at
            FROM metal_rates m
            WHERE m.shop_id = ?1
              AND m.effective_at = (
                  SELECT MAX(effective_at)
                  FROM metal_rates
                  WHERE shop_id = m.shop_id
                    AND metal = m.metal COLLATE NOCASE
                    AND purity = m.purity COLLATE NOCASE
                    AND effective_at <= ?2
              )
            ORDER BY m.metal, m.purity
            "#,
        )
        .bind(shop_id)
        .bind(Utc::now())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(MetalRate::try_from).collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
