//! # Sale Records
//!
//! A sale is a draft invoice that collects priced line items, then gets
//! completed or voided.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   create ──► Draft ──(add items)──► Draft ──finalize──► Completed       │
//! │                │                                           │            │
//! │                └────────────── void ──────► Voided ◄── void ┘           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::invoice::SaleTotals;
use crate::pricing::PriceBreakdown;

// =============================================================================
// Sale Status
// =============================================================================

/// The status of a sale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Items are still being added.
    #[default]
    Draft,
    /// Invoice issued.
    Completed,
    /// Cancelled.
    Voided,
}

impl SaleStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Draft => "draft",
            SaleStatus::Completed => "completed",
            SaleStatus::Voided => "voided",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(SaleStatus::Draft),
            "completed" => Some(SaleStatus::Completed),
            "voided" => Some(SaleStatus::Voided),
            _ => None,
        }
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Sale
// =============================================================================

/// An invoice header. Totals are the sum of its items' per-quantity blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub shop_id: String,
    pub invoice_number: String,
    pub customer_name: Option<String>,
    /// GST state code of the customer. `None` for walk-in sales.
    pub customer_state_code: Option<String>,
    pub status: SaleStatus,
    #[ts(type = "string")]
    pub subtotal: Decimal,
    #[ts(type = "string")]
    pub discount: Decimal,
    #[ts(type = "string")]
    pub gst: Decimal,
    #[ts(type = "string")]
    pub total: Decimal,
    pub user_id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Sale {
    /// Fails unless the sale is still a draft.
    pub fn ensure_draft(&self) -> CoreResult<()> {
        match self.status {
            SaleStatus::Draft => Ok(()),
            _ => Err(self.invalid_status()),
        }
    }

    /// Fails if the sale is already voided.
    pub fn ensure_voidable(&self) -> CoreResult<()> {
        match self.status {
            SaleStatus::Voided => Err(self.invalid_status()),
            _ => Ok(()),
        }
    }

    /// Copies aggregated totals onto the header.
    pub fn apply_totals(&mut self, totals: &SaleTotals) {
        self.subtotal = totals.subtotal;
        self.discount = totals.discount;
        self.gst = totals.gst;
        self.total = totals.total;
    }

    fn invalid_status(&self) -> CoreError {
        CoreError::InvalidSaleStatus {
            sale_id: self.id.clone(),
            current_status: self.status.to_string(),
        }
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A priced line on a sale.
///
/// SKU, name and the full breakdown are frozen at the time of sale, so
/// later catalog or metal-rate changes never alter an issued invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub item_id: String,
    pub sku_snapshot: String,
    pub name_snapshot: String,
    pub quantity: i64,
    pub breakdown: PriceBreakdown,
    /// Same as `breakdown.grand_total`; kept as a column for reporting.
    #[ts(type = "string")]
    pub total_amount: Decimal,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Generates an invoice number in format: `INV-YYYYMMDD-XXXXXX`.
///
/// The suffix is the first six hex digits of the sale ID, upper-cased.
pub fn generate_invoice_number(sale_id: &str, at: DateTime<Utc>) -> String {
    let suffix: String = sale_id
        .chars()
        .filter(|c| c.is_ascii_hexdigit())
        .take(6)
        .collect::<String>()
        .to_ascii_uppercase();
    format!("INV-{}-{}", at.format("%Y%m%d"), suffix)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sale(status: SaleStatus) -> Sale {
        let now = Utc::now();
        Sale {
            id: "sale-1".to_string(),
            shop_id: "shop".to_string(),
            invoice_number: "INV-1".to_string(),
            customer_name: None,
            customer_state_code: None,
            status,
            subtotal: Decimal::ZERO,
            discount: Decimal::ZERO,
            gst: Decimal::ZERO,
            total: Decimal::ZERO,
            user_id: "user".to_string(),
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    #[test]
    fn test_status_round_trip() {
        for status in [SaleStatus::Draft, SaleStatus::Completed, SaleStatus::Voided] {
            assert_eq!(SaleStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(SaleStatus::parse("refunded"), None);
        assert_eq!(SaleStatus::default(), SaleStatus::Draft);
    }

    #[test]
    fn test_ensure_draft() {
        assert!(sale(SaleStatus::Draft).ensure_draft().is_ok());

        let err = sale(SaleStatus::Completed).ensure_draft().unwrap_err();
        assert_eq!(err.to_string(), "Sale sale-1 is completed, cannot perform operation");
    }

    #[test]
    fn test_ensure_voidable() {
        assert!(sale(SaleStatus::Draft).ensure_voidable().is_ok());
        assert!(sale(SaleStatus::Completed).ensure_voidable().is_ok());
        assert!(sale(SaleStatus::Voided).ensure_voidable().is_err());
    }

    #[test]
    fn test_generate_invoice_number() {
        let at = Utc.with_ymd_and_hms(2026, 3, 14, 10, 0, 0).unwrap();
        let number = generate_invoice_number("9f1c2e7a-0b4d-4a8e-9c3f-1d2e3f4a5b6c", at);
        assert_eq!(number, "INV-20260314-9F1C2E");
    }
}
