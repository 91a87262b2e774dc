//! # ratna-db: Database Layer for Ratna
//!
//! SQLite storage for shops, catalog items, daily metal rates and sales.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ratna Data Flow                                  │
//! │                                                                         │
//! │  ratna-cli command (add_sale_item)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     ratna-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │  │   │
//! │  │   │               │    │ ShopRepo       │    │ 001_init.sql │  │   │
//! │  │   │ SqlitePool    │◄───│ ItemRepo       │    │              │  │   │
//! │  │   │               │    │ MetalRateRepo  │    │              │  │   │
//! │  │   │               │    │ SaleRepo       │    │              │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (ratna.db)                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ratna_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("./ratna.db")).await?;
//! let tax = db.shops().tax_config(&shop_id).await?;
//! let item = db.items().get_by_id(&shop_id, &item_id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::item::ItemRepository;
pub use repository::metal_rate::MetalRateRepository;
pub use repository::sale::{NewSaleItem, SaleRepository};
pub use repository::shop::ShopRepository;
