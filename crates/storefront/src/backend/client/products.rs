//! Catalog reads.

use atelier_core::ProductId;
use tracing::instrument;

use super::BackendClient;
use crate::backend::endpoints;
use crate::backend::{Product, Result};

impl BackendClient {
    /// List the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>> {
        self.get(endpoints::PRODUCTS).await
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Product> {
        self.get(&endpoints::product(id)).await
    }

    /// Batch lookup of several products in one request.
    ///
    /// Unknown IDs are simply absent from the result. An empty `ids` makes
    /// no request.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(count = ids.len()))]
    pub async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        self.get(&endpoints::products_by_ids(ids)).await
    }
}
