//! Cart line normalization.

use tracing::debug;

use crate::backend::RawCartItem;
use crate::models::{CartItem, NewCartItem};

/// Pick the display name, falling back to the deprecated `productName`.
pub(crate) fn line_name(name: Option<String>, legacy: Option<String>, context: &str) -> String {
    if let Some(name) = name.filter(|n| !n.trim().is_empty()) {
        return name;
    }
    match legacy.filter(|n| !n.trim().is_empty()) {
        Some(legacy) => {
            debug!(context, "line carries deprecated productName field");
            legacy
        }
        None => String::new(),
    }
}

/// Bring a server (or legacy snapshot) cart line into canonical shape.
///
/// `name` is filled from `productName` when only the alias is present and
/// the subtotal is recomputed from price and quantity; the server's
/// `subtotal` is ignored. Quantities are not clamped here.
#[must_use]
pub fn normalize_cart_item(raw: RawCartItem) -> CartItem {
    let RawCartItem {
        id,
        product_id,
        name,
        product_name,
        price,
        quantity,
        subtotal: _,
        image_url,
        color,
        size,
        stock,
    } = raw;

    let line = NewCartItem {
        product_id,
        name: line_name(name, product_name, "cart"),
        price,
        quantity,
        image_url,
        color,
        size,
        stock,
    };
    CartItem::new(id, false, line)
}

#[must_use]
pub fn normalize_cart_items(raw: Vec<RawCartItem>) -> Vec<CartItem> {
    raw.into_iter().map(normalize_cart_item).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use atelier_core::{CartItemId, Price, ProductId};
    use serde_json::json;

    use super::*;

    #[test]
    fn test_name_falls_back_to_product_name() {
        let raw: RawCartItem = serde_json::from_value(json!({
            "id": 10, "productId": 7, "productName": "Linen shirt",
            "price": 1000, "quantity": 2, "subtotal": 1
        }))
        .unwrap();

        let item = normalize_cart_item(raw);
        assert_eq!(item.id, CartItemId::new(10));
        assert_eq!(item.product_id, ProductId::new(7));
        assert_eq!(item.name, "Linen shirt");
        assert!(!item.local);
        // server subtotal is ignored
        assert_eq!(item.subtotal(), Price::from_units(2000));
    }

    #[test]
    fn test_canonical_name_wins() {
        let raw: RawCartItem = serde_json::from_value(json!({
            "id": 1, "productId": 2, "name": "Wool coat", "productName": "old",
            "price": "12000", "quantity": 1
        }))
        .unwrap();
        assert_eq!(normalize_cart_item(raw).name, "Wool coat");
    }

    #[test]
    fn test_missing_names_leave_empty_string() {
        assert_eq!(line_name(None, Some("  ".to_string()), "test"), "");
    }
}
