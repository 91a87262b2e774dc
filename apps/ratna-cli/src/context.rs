//! # Request Context
//!
//! Who is asking: the shop every lookup is scoped to and the user recorded
//! on writes. Passed explicitly to every handler.

use serde::Serialize;

/// Caller identity for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    pub shop_id: String,
    pub user_id: String,
}

impl RequestContext {
    pub fn new(shop_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        RequestContext {
            shop_id: shop_id.into(),
            user_id: user_id.into(),
        }
    }
}
