//! Server-side cart operations.

use atelier_core::{CartItemId, ProductId};
use tracing::instrument;

use super::BackendClient;
use crate::backend::endpoints;
use crate::backend::{AddToCartRequest, CartResponse, Result, UpdateCartItemRequest};

impl BackendClient {
    /// Fetch the caller's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn my_cart(&self) -> Result<CartResponse> {
        self.get(endpoints::MY_CART).await
    }

    /// Add `quantity` of a product to the caller's cart.
    ///
    /// The backend merges into an existing line for the same product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_to_cart(&self, product_id: ProductId, quantity: u32) -> Result<CartResponse> {
        let body = AddToCartRequest {
            product_id,
            quantity,
        };
        self.post(endpoints::MY_CART, &body).await
    }

    /// Set the quantity of a persisted cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn update_cart_item(&self, item_id: CartItemId, quantity: u32) -> Result<CartResponse> {
        self.put(
            &endpoints::cart_item(item_id),
            &UpdateCartItemRequest { quantity },
        )
        .await
    }

    /// Delete a persisted cart line.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn delete_cart_item(&self, item_id: CartItemId) -> Result<()> {
        self.delete(&endpoints::cart_item(item_id)).await?;
        Ok(())
    }

    /// Empty the caller's cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<()> {
        self.delete(endpoints::MY_CART).await?;
        Ok(())
    }
}
