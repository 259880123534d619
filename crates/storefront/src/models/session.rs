//! Session-related types.
//!
//! Types stored in session storage between views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use atelier_core::OrderId;

use super::cart::NewCartItem;

/// Marker left by a successful checkout for the completion view.
///
/// Only valid until `expires_at`; an expired marker is treated as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedOrder {
    pub order_id: OrderId,
    pub order_number: String,
    /// Display-formatted order timestamp.
    pub ordered_at: String,
    pub expires_at: DateTime<Utc>,
}

impl CompletedOrder {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Guest cart saved across the login redirect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingCart {
    pub items: Vec<NewCartItem>,
}

/// Session storage keys.
pub mod keys {
    use atelier_core::UserId;

    /// Key for the checkout completion marker.
    pub const CHECKOUT_COMPLETED: &str = "checkout.completed";

    /// Key for the guest cart carried through login.
    pub const PENDING_CART: &str = "cart.pending";

    /// Key for a user's manually chosen shipping address.
    #[must_use]
    pub fn shipping_selection(user_id: UserId) -> String {
        format!("checkout.shipping.{user_id}")
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    #[test]
    fn test_shipping_key() {
        assert_eq!(
            keys::shipping_selection(atelier_core::UserId::new(42)),
            "checkout.shipping.42"
        );
    }

    #[test]
    fn test_completed_order_expiry() {
        let now = Utc::now();
        let marker = CompletedOrder {
            order_id: OrderId::new(1),
            order_number: "1".to_string(),
            ordered_at: String::new(),
            expires_at: now + Duration::seconds(30),
        };
        assert!(!marker.is_expired(now));
        assert!(marker.is_expired(now + Duration::seconds(30)));
    }
}
