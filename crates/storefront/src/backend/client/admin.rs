//! Admin console endpoints.
//!
//! These require a token belonging to an `ADMIN` user; the backend answers
//! 403 otherwise.

use atelier_core::{OrderStatus, ProductId, UserId};
use tracing::instrument;

use super::BackendClient;
use crate::backend::endpoints::{self, with_query};
use crate::backend::{
    AdminOrder, AdminOrderFilter, OrderRef, OrderStatusUpdate, Page, PageRequest, Product,
    ProductUpdate, Result, UserProfile, UserUpsert,
};

impl BackendClient {
    // =========================================================================
    // Users
    // =========================================================================

    /// One page of users.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn users_page(&self, page: &PageRequest) -> Result<Page<UserProfile>> {
        self.get(&with_query(endpoints::ADMIN_USERS, &page.query_pairs()))
            .await
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn user(&self, id: UserId) -> Result<UserProfile> {
        self.get(&endpoints::admin_user(id)).await
    }

    /// Create a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn create_user(&self, user: &UserUpsert) -> Result<UserProfile> {
        self.post(endpoints::ADMIN_USERS, user).await
    }

    /// Update a user. Leave `password` unset to keep the current one.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, user), fields(user_id = %id))]
    pub async fn update_user(&self, id: UserId, user: &UserUpsert) -> Result<UserProfile> {
        self.put(&endpoints::admin_user(id), user).await
    }

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn delete_user(&self, id: UserId) -> Result<()> {
        self.delete(&endpoints::admin_user(id)).await?;
        Ok(())
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// One page of products, including inactive ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn products_page(&self, page: &PageRequest) -> Result<Page<Product>> {
        self.get(&with_query(endpoints::ADMIN_PRODUCTS, &page.query_pairs()))
            .await
    }

    /// Get a product by ID, including inactive ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn admin_product(&self, id: ProductId) -> Result<Product> {
        self.get(&endpoints::admin_product(id)).await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, product))]
    pub async fn create_product(&self, product: &ProductUpdate) -> Result<Product> {
        self.post(endpoints::ADMIN_PRODUCTS, product).await
    }

    /// Update a product. Unset fields are left alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, product), fields(product_id = %id))]
    pub async fn update_product(&self, id: ProductId, product: &ProductUpdate) -> Result<Product> {
        self.put(&endpoints::product(id), product).await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<()> {
        self.delete(&endpoints::admin_product(id)).await?;
        Ok(())
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// One page of orders, optionally filtered.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self))]
    pub async fn orders_page(
        &self,
        page: &PageRequest,
        filter: &AdminOrderFilter,
    ) -> Result<Page<AdminOrder>> {
        let mut pairs = page.query_pairs();
        pairs.extend(filter.query_pairs());
        self.get(&with_query(endpoints::ADMIN_ORDERS, &pairs)).await
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(order = %id))]
    pub async fn order(&self, id: &OrderRef) -> Result<AdminOrder> {
        self.get(&endpoints::admin_order(id)).await
    }

    /// Move an order to a new status.
    ///
    /// The backend answers 409 when the transition is not allowed.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self), fields(order = %id, status = %status))]
    pub async fn update_order_status(
        &self,
        id: &OrderRef,
        status: OrderStatus,
    ) -> Result<AdminOrder> {
        self.patch(
            &endpoints::admin_order_status(id),
            &OrderStatusUpdate { status },
        )
        .await
    }
}
