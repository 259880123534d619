//! Carrying a guest cart through the login redirect.

use atelier_core::ProductId;
use tracing::{debug, info, instrument, warn};

use crate::models::session::keys;
use crate::models::{CartItem, PendingCart};
use crate::services::cart_sync::CartSync;
use crate::session::Session;
use crate::stores::{CartError, CartStore};

/// Lines replayed after login.
#[derive(Debug, Default)]
pub struct RestoredCart {
    pub restored: usize,
    pub failed: Vec<(ProductId, CartError)>,
}

#[derive(Clone)]
pub struct PendingCartBridge {
    session: Session,
    sync: CartSync,
}

impl PendingCartBridge {
    #[must_use]
    pub const fn new(session: Session, sync: CartSync) -> Self {
        Self { session, sync }
    }

    /// Save the guest's lines before sending them to log in.
    ///
    /// An empty cart clears any older snapshot instead.
    pub fn stash(&self, cart: &CartStore) {
        let items: Vec<_> = cart.items().iter().map(CartItem::to_new_item).collect();
        if items.is_empty() {
            self.session.remove(keys::PENDING_CART);
            return;
        }
        debug!(lines = items.len(), "stashing guest cart");
        self.session.insert(keys::PENDING_CART, &PendingCart { items });
    }

    /// Replay the stashed lines into the signed-in user's cart.
    ///
    /// The snapshot is consumed whether or not every line succeeds. Local
    /// placeholder lines still in the store are dropped first, since the
    /// snapshot already carries them.
    #[instrument(skip(self))]
    pub async fn restore_after_login(&self) -> RestoredCart {
        let Some(pending) = self.session.take::<PendingCart>(keys::PENDING_CART) else {
            return RestoredCart::default();
        };

        let cart = self.sync.cart();
        let persisted: Vec<CartItem> = cart.items().into_iter().filter(|item| !item.local).collect();
        cart.restore(persisted);

        let mut report = RestoredCart::default();
        for line in pending.items {
            let product_id = line.product_id;
            match self.sync.add(line).await {
                Ok(_) => report.restored += 1,
                Err(e) => {
                    warn!(product_id = %product_id, error = %e, "could not restore pending cart line");
                    report.failed.push((product_id, e));
                }
            }
        }
        info!(restored = report.restored, failed = report.failed.len(), "pending cart restored");
        report
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use atelier_core::Price;

    use super::*;
    use crate::backend::BackendClient;
    use crate::config::StorefrontConfig;
    use crate::models::NewCartItem;
    use crate::stores::UserStore;

    fn bridge(session: Session, cart: CartStore) -> PendingCartBridge {
        let config = StorefrontConfig::for_base_url("http://127.0.0.1:9").unwrap();
        let sync = CartSync::new(BackendClient::new(&config).unwrap(), cart, UserStore::default());
        PendingCartBridge::new(session, sync)
    }

    fn line(product: i64, quantity: u32) -> NewCartItem {
        NewCartItem {
            product_id: ProductId::new(product),
            name: "Wool scarf".to_string(),
            price: Price::from_units(4800),
            quantity,
            image_url: None,
            color: Some("navy".to_string()),
            size: None,
            stock: None,
        }
    }

    #[tokio::test]
    async fn test_stash_and_restore_does_not_double() {
        let session = Session::default();
        let cart = CartStore::default();
        cart.add(line(4, 1)).unwrap();
        cart.add(line(5, 2)).unwrap();

        let bridge = bridge(session.clone(), cart.clone());
        bridge.stash(&cart);

        let report = bridge.restore_after_login().await;
        assert_eq!(report.restored, 2);
        assert!(report.failed.is_empty());
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.find(ProductId::new(4)).unwrap().color.as_deref(), Some("navy"));

        // Consumed.
        assert_eq!(bridge.restore_after_login().await.restored, 0);
    }

    #[test]
    fn test_stash_empty_cart_clears_snapshot() {
        let session = Session::default();
        session.insert(keys::PENDING_CART, &PendingCart { items: vec![line(1, 1)] });

        let cart = CartStore::default();
        bridge(session.clone(), cart.clone()).stash(&cart);
        assert!(session.get::<PendingCart>(keys::PENDING_CART).is_none());
    }
}
