//! Cart mutations that also reach the server.
//!
//! Every mutation is applied to the [`CartStore`] first so the view updates
//! immediately. For a signed-in user the change is then sent to the backend:
//! on success the server's cart replaces the local one (server line ids
//! take over from placeholders), on failure the store is put back exactly
//! as it was before the mutation. Guests never talk to the backend.

use atelier_core::ProductId;
use tracing::{debug, instrument, warn};

use crate::backend::{ApiError, BackendClient, CartResponse};
use crate::models::{CartItem, NewCartItem};
use crate::stores::{CartError, CartStore, UserStore};

#[derive(Clone)]
pub struct CartSync {
    client: BackendClient,
    cart: CartStore,
    user: UserStore,
}

impl CartSync {
    #[must_use]
    pub const fn new(client: BackendClient, cart: CartStore, user: UserStore) -> Self {
        Self { client, cart, user }
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Add a product to the cart.
    ///
    /// Only the units that actually landed in the local cart (after the
    /// per-person limit) are sent to the server.
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutOfStock` without touching anything, or
    /// `CartError::Sync` after rolling back if the server refused.
    #[instrument(skip(self, line), fields(product_id = %line.product_id))]
    pub async fn add(&self, line: NewCartItem) -> Result<CartItem, CartError> {
        let product_id = line.product_id;
        let snapshot = self.cart.items();
        let before = self.cart.find(product_id).map_or(0, |item| item.quantity());

        let added = self.cart.add(line)?;
        if !self.user.is_authenticated() {
            return Ok(added);
        }

        let delta = added.quantity().saturating_sub(before);
        if delta == 0 {
            debug!("line already at its limit, nothing to sync");
            return Ok(added);
        }

        let result = self.client.add_to_cart(product_id, delta).await;
        self.settle(snapshot, result)?;
        Ok(self.cart.find(product_id).unwrap_or(added))
    }

    /// Set a line's quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotInCart` if the product has no line, or
    /// `CartError::Sync` after rolling back if the server refused.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn set_quantity(&self, product_id: ProductId, quantity: u32) -> Result<CartItem, CartError> {
        let snapshot = self.cart.items();
        let before = self
            .cart
            .find(product_id)
            .ok_or(CartError::NotInCart(product_id))?;
        let updated = self
            .cart
            .update_quantity(product_id, quantity)
            .ok_or(CartError::NotInCart(product_id))?;

        if !self.user.is_authenticated() || updated.quantity() == before.quantity() {
            return Ok(updated);
        }

        // A line the server has never seen has to be created, not updated.
        let result = if before.local {
            self.client.add_to_cart(product_id, updated.quantity()).await
        } else {
            self.client.update_cart_item(before.id, updated.quantity()).await
        };
        self.settle(snapshot, result)?;
        Ok(self.cart.find(product_id).unwrap_or(updated))
    }

    /// Remove a product's line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotInCart` if the product has no line, or
    /// `CartError::Sync` after rolling back if the server refused.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove(&self, product_id: ProductId) -> Result<CartItem, CartError> {
        let snapshot = self.cart.items();
        let item = self
            .cart
            .find(product_id)
            .ok_or(CartError::NotInCart(product_id))?;
        let removed = self
            .cart
            .remove(item.id)
            .ok_or(CartError::NotInCart(product_id))?;

        if !self.user.is_authenticated() || removed.local {
            return Ok(removed);
        }

        if let Err(e) = self.client.delete_cart_item(removed.id).await {
            self.rollback(snapshot, &e);
            return Err(CartError::Sync(e));
        }
        Ok(removed)
    }

    fn settle(&self, snapshot: Vec<CartItem>, result: Result<CartResponse, ApiError>) -> Result<(), CartError> {
        match result {
            Ok(server) => {
                self.cart.replace_all(server.items);
                Ok(())
            }
            Err(e) => {
                self.rollback(snapshot, &e);
                Err(CartError::Sync(e))
            }
        }
    }

    fn rollback(&self, snapshot: Vec<CartItem>, err: &ApiError) {
        warn!(error = %err, "cart sync failed, restoring previous cart");
        self.cart.restore(snapshot);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use atelier_core::Price;

    use super::*;
    use crate::config::StorefrontConfig;

    fn line(product: i64, quantity: u32) -> NewCartItem {
        NewCartItem {
            product_id: ProductId::new(product),
            name: format!("Product {product}"),
            price: Price::from_units(1200),
            quantity,
            image_url: None,
            color: None,
            size: None,
            stock: None,
        }
    }

    fn guest_sync() -> CartSync {
        // Nothing listens here; a guest must never reach the network.
        let config = StorefrontConfig::for_base_url("http://127.0.0.1:9").unwrap();
        CartSync::new(
            BackendClient::new(&config).unwrap(),
            CartStore::default(),
            UserStore::default(),
        )
    }

    #[tokio::test]
    async fn test_guest_changes_stay_local() {
        let sync = guest_sync();

        let added = sync.add(line(7, 1)).await.unwrap();
        assert!(added.local);
        assert_eq!(sync.add(line(7, 1)).await.unwrap().quantity(), 2);

        let item = sync.set_quantity(ProductId::new(7), 1).await.unwrap();
        assert_eq!(item.subtotal(), Price::from_units(1200));

        sync.remove(ProductId::new(7)).await.unwrap();
        assert!(sync.cart().is_empty());
    }

    #[tokio::test]
    async fn test_missing_line_is_reported() {
        let sync = guest_sync();
        assert!(matches!(
            sync.set_quantity(ProductId::new(1), 2).await,
            Err(CartError::NotInCart(_))
        ));
        assert!(matches!(
            sync.remove(ProductId::new(1)).await,
            Err(CartError::NotInCart(_))
        ));
    }
}
