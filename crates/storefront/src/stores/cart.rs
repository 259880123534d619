//! Client-held cart state.
//!
//! The store is the single source of truth for what the cart view shows.
//! Every mutation runs as one closure under the channel lock, so
//! subscribers only ever observe whole snapshots.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use atelier_core::{CartItemId, Price, ProductId};
use chrono::Utc;
use thiserror::Error;
use tokio::sync::watch;
use tracing::debug;

use crate::backend::conversions::normalize_cart_item;
use crate::backend::{ApiError, RawCartItem};
use crate::models::{CartItem, NewCartItem, QuantityLimits};

/// Errors from cart mutations.
#[derive(Debug, Clone, Error)]
pub enum CartError {
    /// The product is known to have no stock left.
    #[error("Product {product_id} is out of stock")]
    OutOfStock { product_id: ProductId },

    /// No line for this product.
    #[error("Product {0} is not in the cart")]
    NotInCart(ProductId),

    /// The local change was rolled back because the backend refused it.
    #[error("Cart sync failed: {0}")]
    Sync(#[from] ApiError),
}

/// Observable cart.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    items: watch::Sender<Vec<CartItem>>,
    limits: QuantityLimits,
    /// Last placeholder id handed out
    last_local_id: AtomicI64,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new(QuantityLimits::default())
    }
}

impl CartStore {
    #[must_use]
    pub fn new(limits: QuantityLimits) -> Self {
        let (items, _) = watch::channel(Vec::new());
        Self {
            inner: Arc::new(CartStoreInner {
                items,
                limits,
                last_local_id: AtomicI64::new(0),
            }),
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Snapshot of the lines in display order.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.inner.items.borrow().clone()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.items.borrow().is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    /// Sum of line subtotals.
    #[must_use]
    pub fn total(&self) -> Price {
        self.inner.items.borrow().iter().map(CartItem::subtotal).sum()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.inner.items.borrow().iter().map(CartItem::quantity).sum()
    }

    #[must_use]
    pub fn find(&self, product_id: ProductId) -> Option<CartItem> {
        self.inner
            .items
            .borrow()
            .iter()
            .find(|item| item.product_id == product_id)
            .cloned()
    }

    #[must_use]
    pub fn limits(&self) -> QuantityLimits {
        self.inner.limits
    }

    /// Receive a fresh snapshot after every mutation.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<CartItem>> {
        self.inner.items.subscribe()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Replace every line with normalized server lines.
    ///
    /// Quantities are clamped; two lines for the same product are merged.
    /// Server lines carry no stock, so a line keeps the stock already known
    /// for its product.
    pub fn replace_all(&self, raw: Vec<RawCartItem>) {
        self.inner.items.send_modify(|current| {
            *current = self.canonicalize(raw, current);
        });
    }

    /// Load server lines only if the cart is still empty.
    ///
    /// Returns whether the lines were loaded. Checked and applied under one
    /// lock so lines added while a fetch was in flight are never clobbered.
    pub fn load_if_empty(&self, raw: Vec<RawCartItem>) -> bool {
        self.inner.items.send_if_modified(|current| {
            if current.is_empty() {
                *current = self.canonicalize(raw, &[]);
                true
            } else {
                false
            }
        })
    }

    /// Put back a snapshot taken with [`items`](Self::items).
    pub fn restore(&self, snapshot: Vec<CartItem>) {
        self.inner.items.send_replace(snapshot);
    }

    /// Add a product, merging into its existing line if there is one.
    ///
    /// # Errors
    ///
    /// Returns `CartError::OutOfStock` if the product's known stock is zero.
    pub fn add(&self, line: NewCartItem) -> Result<CartItem, CartError> {
        let limits = self.inner.limits;
        let product_id = line.product_id;
        if limits.limit_for(line.stock) == 0 {
            return Err(CartError::OutOfStock { product_id });
        }

        let mut added = None;
        self.inner.items.send_modify(|items| {
            if let Some(existing) = items.iter_mut().find(|item| item.product_id == product_id) {
                if line.stock.is_some() {
                    existing.stock = line.stock;
                }
                let merged = existing.quantity().saturating_add(line.quantity);
                existing.set_quantity(limits.clamp(merged, existing.stock));
                added = Some(existing.clone());
            } else {
                let quantity = limits.clamp(line.quantity, line.stock);
                let item = CartItem::new(
                    self.next_local_id(),
                    true,
                    NewCartItem { quantity, ..line },
                );
                items.push(item.clone());
                added = Some(item);
            }
        });

        added.ok_or(CartError::NotInCart(product_id))
    }

    /// Set a line's quantity, clamped to its limit.
    ///
    /// Returns the updated line, or `None` if the product is not in the
    /// cart (nothing changes).
    pub fn update_quantity(&self, product_id: ProductId, quantity: u32) -> Option<CartItem> {
        let limits = self.inner.limits;
        let mut updated = None;
        self.inner.items.send_if_modified(|items| {
            let Some(item) = items.iter_mut().find(|item| item.product_id == product_id) else {
                return false;
            };
            let clamped = limits.clamp(quantity, item.stock);
            let changed = clamped != item.quantity();
            item.set_quantity(clamped);
            updated = Some(item.clone());
            changed
        });
        updated
    }

    /// Remove the line with this id.
    pub fn remove(&self, id: CartItemId) -> Option<CartItem> {
        let mut removed = None;
        self.inner.items.send_if_modified(|items| {
            let Some(index) = items.iter().position(|item| item.id == id) else {
                return false;
            };
            removed = Some(items.remove(index));
            true
        });
        removed
    }

    /// Empty the cart.
    pub fn clear(&self) {
        self.inner.items.send_if_modified(|items| {
            if items.is_empty() {
                false
            } else {
                items.clear();
                true
            }
        });
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn canonicalize(&self, raw: Vec<RawCartItem>, known: &[CartItem]) -> Vec<CartItem> {
        let limits = self.inner.limits;
        let mut items: Vec<CartItem> = Vec::with_capacity(raw.len());
        for mut item in raw.into_iter().map(normalize_cart_item) {
            if item.stock.is_none() {
                item.stock = known
                    .iter()
                    .find(|k| k.product_id == item.product_id)
                    .and_then(|k| k.stock);
            }
            if let Some(existing) = items.iter_mut().find(|i| i.product_id == item.product_id) {
                debug!(product_id = %item.product_id, "merging duplicate server cart line");
                let merged = existing.quantity().saturating_add(item.quantity());
                existing.set_quantity(merged);
            } else {
                items.push(item);
            }
        }
        for item in &mut items {
            let clamped = limits.clamp(item.quantity(), item.stock);
            if clamped != item.quantity() {
                item.set_quantity(clamped);
            }
        }
        items
    }

    /// Placeholder id from the clock, strictly increasing within the process.
    fn next_local_id(&self) -> CartItemId {
        let now = Utc::now().timestamp_millis();
        let step = |last: i64| last.max(now - 1) + 1;
        let previous = self
            .inner
            .last_local_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| Some(step(last)))
            .unwrap_or_else(|last| last);
        CartItemId::new(step(previous))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn line(product: i64, price: i64, quantity: u32, stock: Option<u32>) -> NewCartItem {
        NewCartItem {
            product_id: ProductId::new(product),
            name: format!("Product {product}"),
            price: Price::from_units(price),
            quantity,
            image_url: None,
            color: None,
            size: None,
            stock,
        }
    }

    fn raw(id: i64, product: i64, quantity: u32) -> RawCartItem {
        serde_json::from_value(json!({
            "id": id, "productId": product, "productName": format!("P{product}"),
            "price": 500, "quantity": quantity
        }))
        .unwrap()
    }

    #[test]
    fn test_guest_adds_same_product_twice() {
        let store = CartStore::default();

        store.add(line(7, 1000, 1, None)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.items()[0].subtotal(), Price::from_units(1000));

        store.add(line(7, 1000, 1, None)).unwrap();
        let items = store.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity(), 2);
        assert_eq!(items[0].subtotal(), Price::from_units(2000));
    }

    #[test]
    fn test_repeated_add_is_clamped() {
        let store = CartStore::default();
        for _ in 0..5 {
            store.add(line(7, 1000, 1, None)).unwrap();
        }
        let item = store.find(ProductId::new(7)).unwrap();
        assert_eq!(item.quantity(), 2);
        assert_eq!(item.subtotal(), item.price.times(2));
    }

    #[test]
    fn test_add_out_of_stock_is_refused() {
        let store = CartStore::default();
        let err = store.add(line(3, 100, 1, Some(0))).unwrap_err();
        assert!(matches!(err, CartError::OutOfStock { product_id } if product_id == ProductId::new(3)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_quantity_respects_stock() {
        let store = CartStore::default();
        store.add(line(9, 800, 1, Some(1))).unwrap();

        let item = store.update_quantity(ProductId::new(9), 5).unwrap();
        assert_eq!(item.quantity(), 1);
        assert_eq!(item.subtotal(), Price::from_units(800));
    }

    #[test]
    fn test_update_quantity_bounds() {
        let store = CartStore::default();
        store.add(line(1, 100, 1, None)).unwrap();

        assert_eq!(store.update_quantity(ProductId::new(1), 0).unwrap().quantity(), 1);
        assert_eq!(store.update_quantity(ProductId::new(1), 9).unwrap().quantity(), 2);
        assert!(store.update_quantity(ProductId::new(2), 1).is_none());
    }

    #[test]
    fn test_remove_then_add_gets_new_placeholder() {
        let store = CartStore::default();
        let first = store.add(line(7, 1000, 1, None)).unwrap();
        assert!(first.local);

        store.remove(first.id).unwrap();
        assert!(store.is_empty());

        let second = store.add(line(7, 1000, 1, None)).unwrap();
        assert_ne!(first.id, second.id);
        assert!(second.id > first.id);
    }

    #[test]
    fn test_placeholder_ids_strictly_increase() {
        let store = CartStore::default();
        let ids: Vec<_> = (0..50).map(|_| store.next_local_id()).collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_replace_all_normalizes() {
        let store = CartStore::default();
        store.replace_all(vec![raw(1, 10, 1), raw(2, 11, 5)]);

        let items = store.items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name, "P10");
        assert_eq!(items[0].subtotal(), Price::from_units(500));
        assert_eq!(items[1].quantity(), 2);
        assert_eq!(items[1].subtotal(), Price::from_units(1000));
        assert!(items.iter().all(|item| !item.local));
    }

    #[test]
    fn test_replace_all_merges_duplicate_products() {
        let store = CartStore::default();
        store.replace_all(vec![raw(1, 10, 1), raw(2, 10, 1)]);
        let items = store.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity(), 2);
    }

    #[test]
    fn test_replace_all_keeps_known_stock() {
        let store = CartStore::default();
        store.add(line(10, 500, 1, Some(1))).unwrap();

        store.replace_all(vec![raw(31, 10, 1), raw(32, 11, 1)]);
        let items = store.items();
        assert_eq!(items[0].stock, Some(1));
        assert_eq!(items[1].stock, None);

        let item = store.update_quantity(ProductId::new(10), 5).unwrap();
        assert_eq!(item.quantity(), 1);
    }

    #[test]
    fn test_load_if_empty_does_not_clobber() {
        let store = CartStore::default();
        store.add(line(1, 100, 1, None)).unwrap();

        assert!(!store.load_if_empty(vec![raw(5, 50, 1)]));
        assert_eq!(store.items()[0].product_id, ProductId::new(1));

        store.clear();
        assert!(store.load_if_empty(vec![raw(5, 50, 1)]));
        assert_eq!(store.items()[0].product_id, ProductId::new(50));
    }

    #[test]
    fn test_restore_snapshot() {
        let store = CartStore::default();
        store.add(line(1, 100, 1, None)).unwrap();
        let snapshot = store.items();

        store.add(line(2, 100, 1, None)).unwrap();
        store.restore(snapshot.clone());
        assert_eq!(store.items(), snapshot);
    }

    #[test]
    fn test_total_and_count() {
        let store = CartStore::default();
        store.add(line(1, 1000, 2, None)).unwrap();
        store.add(line(2, 250, 1, None)).unwrap();
        assert_eq!(store.total(), Price::from_units(2250));
        assert_eq!(store.item_count(), 3);
    }

    #[tokio::test]
    async fn test_subscribers_see_every_mutation() {
        let store = CartStore::default();
        let mut rx = store.subscribe();

        store.add(line(1, 100, 1, None)).unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);

        store.clear();
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_empty());
    }

    #[test]
    fn test_noop_mutations_do_not_notify() {
        let store = CartStore::default();
        let rx = store.subscribe();
        store.clear();
        assert!(store.update_quantity(ProductId::new(1), 1).is_none());
        assert!(!rx.has_changed().unwrap());
    }
}
