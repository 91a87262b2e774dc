//! # Request Handlers
//!
//! Every operation the `ratna` binary exposes, as plain async functions.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── pricing.rs  ◄─── price_item, quote
//! └── sale.rs     ◄─── create/add/get/finalize/void sale
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  ratna price-item --item 6f1c... --quantity 2                           │
//! │         │                                                               │
//! │         │ (clap parses into typed args)                                 │
//! │         ▼                                                               │
//! │  async fn price_item(                                                   │
//! │      db: &Database,            ◄── opened once in main                  │
//! │      ctx: &RequestContext,     ◄── shop + user from config              │
//! │      item_id: &str,            ◄── typed arguments                      │
//! │      ...                                                                │
//! │  ) -> Result<PriceBreakdown, ApiError>                                  │
//! │         │                                                               │
//! │         │ (JSON serialization)                                          │
//! │         ▼                                                               │
//! │  stdout: {"quantity": 2, "perUnit": {...}, "grandTotal": "136200"}      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers never read globals: the shop and user always arrive in the
//! `RequestContext`.

pub mod pricing;
pub mod sale;

pub use pricing::{price_item, quote};
pub use sale::{add_sale_item, create_sale, finalize_sale, get_sale, void_sale, SaleDetails};
