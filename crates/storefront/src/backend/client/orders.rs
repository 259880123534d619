//! Customer order operations.

use tracing::instrument;

use super::BackendClient;
use crate::backend::endpoints;
use crate::backend::{CreateOrderItem, OrderResponse, Result};

impl BackendClient {
    /// The caller's most recent order, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn current_order(&self) -> Result<Option<OrderResponse>> {
        self.get(endpoints::MY_ORDER).await
    }

    /// Every order the caller has placed, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn order_history(&self) -> Result<Vec<OrderResponse>> {
        let orders: Option<Vec<OrderResponse>> = self.get(endpoints::ORDER_HISTORY).await?;
        Ok(orders.unwrap_or_default())
    }

    /// Place an order for the given lines.
    ///
    /// Only product IDs and quantities are sent; the backend prices the
    /// order itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, items), fields(lines = items.len()))]
    pub async fn checkout(&self, items: &[CreateOrderItem]) -> Result<OrderResponse> {
        self.post(endpoints::CHECKOUT, items).await
    }
}
