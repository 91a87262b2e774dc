//! # Pricing Commands
//!
//! Price a catalog item or an ad-hoc request without touching stock.

use ratna_core::{price_line_item, CatalogItem, DiscountRequest, LineItemRequest, PriceBreakdown};
use ratna_db::Database;
use tracing::{debug, warn};

use crate::context::RequestContext;
use crate::error::ApiError;

/// Prices `quantity` pieces of a catalog item at today's rates.
///
/// ## Steps
/// 1. Look up the item in the caller's shop
/// 2. Fetch current metal rates for materials without a fixed rate
/// 3. Fetch the shop's GST rates
/// 4. Run the pricing engine
pub async fn price_item(
    db: &Database,
    ctx: &RequestContext,
    item_id: &str,
    quantity: i64,
    discount: &DiscountRequest,
) -> Result<PriceBreakdown, ApiError> {
    debug!(item_id = %item_id, quantity = quantity, "price_item command");

    let item = load_item(db, ctx, item_id).await?;
    price_catalog_item(db, ctx, &item, quantity, discount).await
}

/// Prices an ad-hoc line against the shop's GST rates.
///
/// Nothing is looked up besides the tax config; every rate comes from the
/// request.
pub async fn quote(
    db: &Database,
    ctx: &RequestContext,
    request: &LineItemRequest,
) -> Result<PriceBreakdown, ApiError> {
    debug!(shop_id = %ctx.shop_id, "quote command");

    let tax = db.shops().tax_config(&ctx.shop_id).await?;
    let breakdown = price_line_item(request, &tax)?;
    if breakdown.is_over_discounted() {
        warn!(
            amount_after_discount = %breakdown.per_unit.amount_after_discount,
            "Discount exceeds the value of the piece"
        );
    }
    Ok(breakdown)
}

/// Loads an item from the caller's shop.
pub(crate) async fn load_item(
    db: &Database,
    ctx: &RequestContext,
    item_id: &str,
) -> Result<CatalogItem, ApiError> {
    db.items()
        .get_by_id(&ctx.shop_id, item_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Item", item_id))
}

/// Resolves rates and tax for an already loaded item and prices it.
pub(crate) async fn price_catalog_item(
    db: &Database,
    ctx: &RequestContext,
    item: &CatalogItem,
    quantity: i64,
    discount: &DiscountRequest,
) -> Result<PriceBreakdown, ApiError> {
    let rates = db
        .metal_rates()
        .current_rates(&ctx.shop_id, &item.unpriced_metals())
        .await?;
    let tax = db.shops().tax_config(&ctx.shop_id).await?;

    let request = item.to_line_item_request(quantity, &rates, discount)?;
    Ok(price_line_item(&request, &tax)?)
}
