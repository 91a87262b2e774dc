//! # Command Line
//!
//! clap definitions for the `ratna` binary and the dispatch that maps each
//! subcommand onto exactly one handler in [`crate::commands`].
//!
//! ## Usage
//! ```bash
//! ratna price-item --item 6f1c... --quantity 2 --discount-type PERCENTAGE --discount-value 5
//! ratna quote request.json
//! ratna create-sale --customer "Meera Kulkarni" --state 27
//! ratna add-item --sale <SALE_ID> --item <ITEM_ID> --quantity 1
//! ratna get-sale <SALE_ID>
//! ratna finalize-sale <SALE_ID>
//! ratna void-sale <SALE_ID>
//! ```

use clap::{Args, Parser, Subcommand};
use ratna_core::{DiscountRequest, LineItemRequest};
use ratna_db::Database;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;

use crate::commands;
use crate::context::RequestContext;
use crate::error::ApiError;

#[derive(Debug, Parser)]
#[command(
    name = "ratna",
    version,
    about = "Price jewelry line items and record sales."
)]
pub struct Cli {
    #[arg(long, global = true, help = "Config file (default: ./ratna.toml if present).")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Overrides the configured database path.")]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Price a catalog item at today's metal rates.
    PriceItem {
        #[arg(long)]
        item: String,

        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,

        #[command(flatten)]
        discount: DiscountArgs,
    },

    /// Price an ad-hoc line item read as JSON from a file or stdin.
    Quote {
        #[arg(help = "JSON request file; reads stdin when omitted or '-'.")]
        file: Option<PathBuf>,
    },

    /// Open a draft sale.
    CreateSale {
        #[arg(long)]
        customer: Option<String>,

        #[arg(long, help = "Customer's GST state code, e.g. 27.")]
        state: Option<String>,
    },

    /// Add a catalog item to a draft sale.
    AddItem {
        #[arg(long)]
        sale: String,

        #[arg(long)]
        item: String,

        #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,

        #[command(flatten)]
        discount: DiscountArgs,
    },

    /// Show a sale with its lines, totals and GST split.
    GetSale { sale: String },

    /// Complete a draft sale.
    FinalizeSale { sale: String },

    /// Void a sale and return its items to stock.
    VoidSale { sale: String },
}

#[derive(Debug, Clone, Default, Args)]
pub struct DiscountArgs {
    #[arg(long, help = "PERCENTAGE or AMOUNT.")]
    pub discount_type: Option<String>,

    #[arg(long, help = "Discount value; an AMOUNT when no type is given.")]
    pub discount_value: Option<Decimal>,
}

impl From<DiscountArgs> for DiscountRequest {
    fn from(args: DiscountArgs) -> Self {
        DiscountRequest {
            discount_type: args.discount_type,
            discount_value: args.discount_value,
        }
    }
}

/// The JSON printed for a subcommand plus the headline amount it produced.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub json: Value,
    /// Grand total of a priced line or total of a sale; `None` when the
    /// command yields no amount.
    pub total: Option<Decimal>,
}

impl CommandOutput {
    fn new<T: Serialize>(value: &T, total: Option<Decimal>) -> Result<Self, ApiError> {
        let json = serde_json::to_value(value).map_err(|e| ApiError::internal(e.to_string()))?;
        Ok(CommandOutput { json, total })
    }
}

/// Runs one subcommand and returns its JSON alongside its total.
pub async fn dispatch(
    db: &Database,
    ctx: &RequestContext,
    command: Command,
) -> Result<CommandOutput, ApiError> {
    match command {
        Command::PriceItem {
            item,
            quantity,
            discount,
        } => {
            let breakdown = commands::price_item(db, ctx, &item, quantity, &discount.into()).await?;
            CommandOutput::new(&breakdown, Some(breakdown.grand_total))
        }
        Command::Quote { file } => {
            let request = read_request(file)?;
            let breakdown = commands::quote(db, ctx, &request).await?;
            CommandOutput::new(&breakdown, Some(breakdown.grand_total))
        }
        Command::CreateSale { customer, state } => {
            let sale =
                commands::create_sale(db, ctx, customer.as_deref(), state.as_deref()).await?;
            CommandOutput::new(&sale, None)
        }
        Command::AddItem {
            sale,
            item,
            quantity,
            discount,
        } => {
            let line =
                commands::add_sale_item(db, ctx, &sale, &item, quantity, &discount.into()).await?;
            CommandOutput::new(&line, Some(line.total_amount))
        }
        Command::GetSale { sale } => {
            let details = commands::get_sale(db, ctx, &sale).await?;
            CommandOutput::new(&details, Some(details.totals.total))
        }
        Command::FinalizeSale { sale } => {
            let sale = commands::finalize_sale(db, ctx, &sale).await?;
            CommandOutput::new(&sale, Some(sale.total))
        }
        Command::VoidSale { sale } => {
            let sale = commands::void_sale(db, ctx, &sale).await?;
            CommandOutput::new(&sale, Some(sale.total))
        }
    }
}

fn read_request(file: Option<PathBuf>) -> Result<LineItemRequest, ApiError> {
    let text = match file {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(&path).map_err(|e| {
            ApiError::validation(format!("Cannot read {}: {}", path.display(), e))
        })?,
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| ApiError::validation(format!("Cannot read stdin: {}", e)))?;
            text
        }
    };

    serde_json::from_str(&text)
        .map_err(|e| ApiError::validation(format!("Malformed line item request: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_price_item() {
        let cli = Cli::try_parse_from([
            "ratna",
            "price-item",
            "--item",
            "item-1",
            "--quantity",
            "3",
            "--discount-type",
            "PERCENTAGE",
            "--discount-value",
            "7.5",
        ])
        .unwrap();

        match cli.command {
            Command::PriceItem {
                item,
                quantity,
                discount,
            } => {
                assert_eq!(item, "item-1");
                assert_eq!(quantity, 3);
                assert_eq!(discount.discount_value, Some(dec!(7.5)));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_db_after_subcommand() {
        let cli = Cli::try_parse_from(["ratna", "get-sale", "s-1", "--db", "/tmp/x.db"]).unwrap();
        assert_eq!(cli.db.as_deref(), Some("/tmp/x.db"));
        assert!(matches!(cli.command, Command::GetSale { sale } if sale == "s-1"));
    }

    #[test]
    fn test_parse_discount_value_without_type() {
        let cli =
            Cli::try_parse_from(["ratna", "price-item", "--item", "i", "--discount-value", "500"])
                .unwrap();

        match cli.command {
            Command::PriceItem { discount, .. } => {
                assert_eq!(discount.discount_type, None);
                assert_eq!(discount.discount_value, Some(dec!(500)));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_untyped_discount_value_is_an_amount() {
        let db = testing::database().await;
        let ctx = testing::ctx();
        let item = testing::gold_band(&db, "BND-22K-21", 1).await;
        let cli = Cli::try_parse_from([
            "ratna",
            "price-item",
            "--item",
            item.id.as_str(),
            "--discount-value",
            "1000",
        ])
        .unwrap();

        let output = dispatch(&db, &ctx, cli.command).await.unwrap();

        assert_eq!(output.json["discountType"], "AMOUNT");
        let amount = |v: &Value| v.as_str().unwrap().parse::<Decimal>().unwrap();
        assert_eq!(amount(&output.json["perUnit"]["discountAmount"]), dec!(1000));
        assert_eq!(amount(&output.json["perUnit"]["amountAfterDiscount"]), dec!(65000));
        assert_eq!(output.total, Some(dec!(67100)));
    }

    #[test]
    fn test_quote_file_missing() {
        let err = read_request(Some(PathBuf::from("/nonexistent/ratna-request.json"))).unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_dispatch_returns_camel_case_json() {
        let db = testing::database().await;
        let ctx = testing::ctx();
        let item = testing::gold_band(&db, "BND-22K-20", 2).await;

        let output = dispatch(
            &db,
            &ctx,
            Command::PriceItem {
                item: item.id.clone(),
                quantity: 1,
                discount: DiscountArgs::default(),
            },
        )
        .await
        .unwrap();

        let amount = |v: &Value| v.as_str().unwrap().parse::<Decimal>().unwrap();
        assert_eq!(amount(&output.json["grandTotal"]), dec!(68100));
        assert_eq!(amount(&output.json["perUnit"]["gst"]["total"]), dec!(2100));
        assert_eq!(output.total, Some(dec!(68100)));

        let sale = dispatch(
            &db,
            &ctx,
            Command::CreateSale {
                customer: None,
                state: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(sale.json["status"], "draft");
        assert_eq!(sale.total, None);
    }
}
