//! # ratna-core: Pure Business Logic for Ratna
//!
//! This crate is the **heart** of Ratna, a jewelry-shop management system.
//! It prices sale line items (materials, gemstones, making charges, wastage,
//! discounts and Indian GST) as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ratna Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Request Handlers (ratna-cli)                 │   │
//! │  │    price_item, quote, create_sale, add_sale_item, ...          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ratna-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  pricing  │  │  invoice  │  │ validation│  │   │
//! │  │   │ Material  │  │ Breakdown │  │ SaleTotals│  │  request  │  │   │
//! │  │   │ Gemstone  │  │  engine   │  │ GstSplit  │  │  → input  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    ratna-db (Database Layer)                    │   │
//! │  │        shops, catalog items, metal rates, sales (SQLite)        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Pricing inputs (material/gemstone lines, policies, tax config)
//! - [`pricing`] - The line-item pricing engine and its breakdown
//! - [`invoice`] - Sale totals and CGST/SGST/IGST split
//! - [`catalog`] - Shop, catalog item and metal rate records
//! - [`sale`] - Sale and sale item records
//! - [`money`] - Decimal helpers (percentages, display rounding)
//! - [`error`] - Domain error types
//! - [`validation`] - Untrusted request → typed input
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Exact Decimals**: All weights, rates and amounts are `rust_decimal::Decimal`
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use ratna_core::pricing::price_line_item;
//! use ratna_core::types::{LineItemRequest, MaterialLineRequest, ShopTaxConfig};
//! use rust_decimal::Decimal;
//!
//! let request = LineItemRequest {
//!     quantity: Some(1),
//!     material_breakdown: Some(vec![MaterialLineRequest {
//!         name: Some("Gold 22K".to_string()),
//!         weight: Some(Decimal::from(10)),
//!         rate_per_gram: Some(Decimal::from(6000)),
//!         gst_rate: Some(Decimal::from(3)),
//!     }]),
//!     making_charge_type: Some("PERCENTAGE".to_string()),
//!     making_charge_rate: Some(Decimal::from(10)),
//!     gross_weight: Some(Decimal::from(10)),
//!     ..Default::default()
//! };
//!
//! let tax = ShopTaxConfig::new(Decimal::from(3), Decimal::from(5));
//! let breakdown = price_line_item(&request, &tax).unwrap();
//!
//! assert_eq!(breakdown.per_unit.total_amount, Decimal::from(68100));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod invoice;
pub mod money;
pub mod pricing;
pub mod sale;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{CatalogItem, ItemGemstone, ItemMaterial, MetalRate, Shop};
pub use error::{CoreError, CoreResult, ValidationError};
pub use invoice::{GstSplit, SaleTotals};
pub use pricing::{compute_line_item_price, price_line_item, PriceBreakdown};
pub use sale::{Sale, SaleItem, SaleStatus};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Shop used when no shop is configured (single-shop development setups).
///
/// The schema is multi-tenant; every request still carries its shop
/// explicitly, this is only the default for local tooling.
pub const DEFAULT_SHOP_ID: &str = "00000000-0000-0000-0000-000000000001";

/// Upper bound for any percentage input (GST rates, wastage, discount percentage).
pub const MAX_PERCENTAGE: i64 = 100;

/// Maximum pieces of one item on a single line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum material or gemstone entries on one line item.
pub const MAX_BREAKDOWN_LINES: usize = 50;

/// Upper bound for any weight input: grams for metal and gross weight,
/// carats for gemstones.
pub const MAX_WEIGHT: i64 = 100_000;

/// Upper bound for per-gram, per-carat and making-charge rates.
pub const MAX_RATE: i64 = 100_000_000;

/// Upper bound for a flat (AMOUNT) discount.
pub const MAX_DISCOUNT_AMOUNT: i64 = 1_000_000_000_000;
