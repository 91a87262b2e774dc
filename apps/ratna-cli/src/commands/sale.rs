//! # Sale Commands
//!
//! Draft → add items → finalize (or void).
//!
//! ```text
//! create_sale ──► Draft ──add_sale_item*──► finalize_sale ──► Completed
//!                   │                                            │
//!                   └──────────────── void_sale ◄────────────────┘
//!                                        │
//!                                        ▼
//!                                 Voided (stock returned)
//! ```

use ratna_core::{CoreError, DiscountRequest, GstSplit, Sale, SaleItem, SaleTotals};
use ratna_db::{Database, NewSaleItem};
use serde::Serialize;
use tracing::{debug, error, info};

use crate::commands::pricing::{load_item, price_catalog_item};
use crate::context::RequestContext;
use crate::error::ApiError;

/// A sale with its lines, totals and tax split, as printed for an invoice.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDetails {
    pub sale: Sale,
    pub items: Vec<SaleItem>,
    pub totals: SaleTotals,
    pub gst_split: GstSplit,
}

/// Opens a new draft sale for the caller's shop.
pub async fn create_sale(
    db: &Database,
    ctx: &RequestContext,
    customer_name: Option<&str>,
    customer_state_code: Option<&str>,
) -> Result<Sale, ApiError> {
    debug!(shop_id = %ctx.shop_id, "create_sale command");

    let customer_name = non_blank(customer_name);
    let customer_state_code = non_blank(customer_state_code);

    let sale = db
        .sales()
        .create_sale(&ctx.shop_id, &ctx.user_id, customer_name, customer_state_code)
        .await?;

    info!(sale_id = %sale.id, invoice_number = %sale.invoice_number, "Sale created");
    Ok(sale)
}

/// Prices a catalog item and adds it to a draft sale.
///
/// ## Steps
/// 1. Sale must exist in the caller's shop and still be a draft
/// 2. Item must exist, be active and have enough stock
/// 3. Price at today's rates (quantity and discount validated here)
/// 4. Store the line, decrement stock and refresh sale totals in one
///    transaction
pub async fn add_sale_item(
    db: &Database,
    ctx: &RequestContext,
    sale_id: &str,
    item_id: &str,
    quantity: i64,
    discount: &DiscountRequest,
) -> Result<SaleItem, ApiError> {
    debug!(sale_id = %sale_id, item_id = %item_id, quantity = quantity, "add_sale_item command");

    let sale = load_sale(db, ctx, sale_id).await?;
    sale.ensure_draft()?;

    let item = load_item(db, ctx, item_id).await?;
    if !item.is_active {
        return Err(ApiError::business(format!("Item {} is not for sale", item.sku)));
    }

    let breakdown = price_catalog_item(db, ctx, &item, quantity, discount).await?;

    if !item.can_sell(quantity) {
        return Err(CoreError::InsufficientStock {
            sku: item.sku.clone(),
            available: item.stock_quantity,
            requested: quantity,
        }
        .into());
    }

    if breakdown.is_over_discounted() {
        return Err(ApiError::business(format!(
            "Discount exceeds the value of {}",
            item.sku
        )));
    }

    let line = db
        .sales()
        .add_item(&NewSaleItem {
            shop_id: ctx.shop_id.clone(),
            sale_id: sale.id.clone(),
            item_id: item.id.clone(),
            sku: item.sku.clone(),
            name: item.name.clone(),
            breakdown,
        })
        .await?;

    info!(
        sale_id = %sale.id,
        sku = %line.sku_snapshot,
        quantity = line.quantity,
        total = %line.total_amount,
        "Item added to sale"
    );
    Ok(line)
}

/// Loads a sale with its lines, totals and CGST/SGST/IGST split.
///
/// The split is intra-state when the customer's state matches the shop's
/// (or no customer state was recorded).
pub async fn get_sale(
    db: &Database,
    ctx: &RequestContext,
    sale_id: &str,
) -> Result<SaleDetails, ApiError> {
    debug!(sale_id = %sale_id, "get_sale command");

    let sale = load_sale(db, ctx, sale_id).await?;
    let items = db.sales().get_items(&sale.id).await?;
    let shop = db
        .shops()
        .get_by_id(&ctx.shop_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Shop", &ctx.shop_id))?;

    let breakdowns: Vec<_> = items.iter().map(|i| i.breakdown.clone()).collect();
    let totals = SaleTotals::from_breakdowns(&breakdowns);
    let gst_split = GstSplit::for_states(
        totals.gst,
        &shop.state_code,
        sale.customer_state_code.as_deref(),
    );
    if gst_split.total() != totals.gst {
        error!(
            sale_id = %sale.id,
            split = %gst_split.total(),
            gst = %totals.gst,
            "GST split does not reconcile"
        );
        return Err(ApiError::internal(format!(
            "GST split {} does not match sale GST {}",
            gst_split.total(),
            totals.gst
        )));
    }

    Ok(SaleDetails {
        sale,
        items,
        totals,
        gst_split,
    })
}

/// Completes a draft sale. The sale must have at least one item.
pub async fn finalize_sale(
    db: &Database,
    ctx: &RequestContext,
    sale_id: &str,
) -> Result<Sale, ApiError> {
    debug!(sale_id = %sale_id, "finalize_sale command");

    load_sale(db, ctx, sale_id).await?.ensure_draft()?;
    db.sales().finalize_sale(&ctx.shop_id, sale_id).await?;
    load_sale(db, ctx, sale_id).await
}

/// Voids a draft or completed sale and puts its items back in stock.
pub async fn void_sale(
    db: &Database,
    ctx: &RequestContext,
    sale_id: &str,
) -> Result<Sale, ApiError> {
    debug!(sale_id = %sale_id, "void_sale command");

    load_sale(db, ctx, sale_id).await?.ensure_voidable()?;
    db.sales().void_sale(&ctx.shop_id, sale_id).await?;
    load_sale(db, ctx, sale_id).await
}

async fn load_sale(db: &Database, ctx: &RequestContext, sale_id: &str) -> Result<Sale, ApiError> {
    db.sales()
        .get_by_id(&ctx.shop_id, sale_id)
        .await?
        .ok_or_else(|| CoreError::SaleNotFound(sale_id.to_string()).into())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
