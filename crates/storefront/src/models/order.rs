//! Orders as the storefront shows them.

use atelier_core::{CurrencyCode, OrderId, OrderItemId, OrderStatus, Price, ProductId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Display format for order timestamps, e.g. `2025年07月30日 22:15`.
pub const ORDERED_AT_FORMAT: &str = "%Y年%m月%d日 %H:%M";

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: OrderId,
    /// Customer-facing number; falls back to the order id.
    pub order_number: String,
    /// Parsed status, when the backend sent a known code.
    pub status: Option<OrderStatus>,
    /// Display label for the status (unknown values pass through).
    pub status_label: String,
    pub ordered_at: Option<NaiveDateTime>,
    pub total: Price,
    pub items: Vec<OrderLine>,
}

impl Order {
    /// `ordered_at` in display format, or an empty string.
    #[must_use]
    pub fn ordered_at_label(&self) -> String {
        self.ordered_at
            .map(|at| at.format(ORDERED_AT_FORMAT).to_string())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn total_label(&self) -> String {
        self.total.display(CurrencyCode::default())
    }
}

/// A snapshot of one ordered product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: OrderItemId,
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Price,
    pub quantity: u32,
    pub subtotal: Price,
}
