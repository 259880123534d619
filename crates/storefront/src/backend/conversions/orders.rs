//! Order conversion.

use atelier_core::{OrderStatus, status_label};
use chrono::{DateTime, NaiveDateTime};

use super::cart::line_name;
use crate::backend::{OrderResponse, RawOrderItem};
use crate::models::{Order, OrderLine};

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 (offset is dropped, the wall-clock time is kept) and
/// the offset-less `2025-07-30T22:15:00[.fff]` form.
#[must_use]
pub fn parse_ordered_at(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.naive_local())
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok())
        .or_else(|| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").ok())
}

#[must_use]
pub fn convert_order(raw: OrderResponse) -> Order {
    let status = raw.status.as_deref().and_then(OrderStatus::parse_lenient);
    Order {
        order_id: raw.order_id,
        order_number: raw
            .order_number
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| raw.order_id.to_string()),
        status,
        status_label: status_label(raw.status.as_deref()),
        ordered_at: raw.ordered_at.as_deref().and_then(parse_ordered_at),
        total: raw.total,
        items: raw.items.into_iter().map(convert_order_line).collect(),
    }
}

fn convert_order_line(raw: RawOrderItem) -> OrderLine {
    OrderLine {
        id: raw.id,
        product_id: raw.product_id,
        // canonical field here is productName; `name` is the stray spelling
        product_name: line_name(raw.product_name, raw.name, "order"),
        price: raw.price,
        quantity: raw.quantity,
        subtotal: raw.price.times(raw.quantity),
    }
}
