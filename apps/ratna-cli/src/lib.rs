//! # ratna-cli: Request Handlers for Ratna
//!
//! Thin orchestration over `ratna-core` (pricing) and `ratna-db` (store).
//!
//! ## Module Organization
//! ```text
//! ratna_cli/
//! ├── lib.rs          ◄─── You are here (exports)
//! ├── cli.rs          ◄─── clap definitions and dispatch
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── pricing.rs  ◄─── price_item, quote
//! │   └── sale.rs     ◄─── sale lifecycle
//! ├── config.rs       ◄─── Layered settings (defaults, ratna.toml, RATNA_*)
//! ├── context.rs      ◄─── RequestContext (shop + user)
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  argv ──► Cli (clap) ──► dispatch ──► commands::* ──► ratna-core        │
//! │                                            │                            │
//! │                                            └────────► ratna-db          │
//! │                                                                         │
//! │  stdout ◄── pretty JSON (result or {"error": ApiError})                 │
//! │  stderr ◄── tracing logs                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;

pub use cli::{dispatch, Cli, Command, CommandOutput};
pub use crate::config::{AppConfig, ConfigError};
pub use context::RequestContext;
pub use error::{ApiError, ErrorCode};
