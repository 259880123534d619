//! Admin console: paging, CRUD and order status changes.

use std::str::FromStr;

use atelier_core::{Email, OrderStatus, Price, ProductId, Role, UserId};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::backend::{
    AdminOrder, AdminOrderFilter, ApiError, BackendClient, OrderRef, Page, PageRequest, Product,
    ProductUpdate, UserProfile, UserUpsert,
};
use crate::models::ValidationError;

#[derive(Debug, Clone, Error)]
pub enum AdminError {
    /// The order may not move to the requested status.
    #[error(
        "Order cannot move from {} to {to}",
        .from.map_or("an unknown status", |status| status.code())
    )]
    DisallowedTransition {
        from: Option<OrderStatus>,
        to: OrderStatus,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

// =============================================================================
// Forms
// =============================================================================

/// Product form input as typed.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub fabric: String,
    pub category: String,
    pub price: String,
    pub stock: String,
    pub is_active: bool,
}

impl ProductForm {
    /// Check the input and build the payload.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingFields` for a blank name, price or
    /// stock, `ValidationError::NotANumber` if price or stock do not parse,
    /// `ValidationError::Negative` if either is below zero.
    pub fn validate(&self) -> Result<ProductUpdate, ValidationError> {
        let missing: Vec<&'static str> = [
            ("name", &self.name),
            ("price", &self.price),
            ("stock", &self.stock),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let price = Price::from_str(&self.price).map_err(|_| ValidationError::NotANumber {
            field: "price",
            value: self.price.clone(),
        })?;
        if price.is_negative() {
            return Err(ValidationError::Negative { field: "price" });
        }

        let stock: i64 = self.stock.trim().parse().map_err(|_| ValidationError::NotANumber {
            field: "stock",
            value: self.stock.clone(),
        })?;
        let stock = u32::try_from(stock).map_err(|_| {
            if stock < 0 {
                ValidationError::Negative { field: "stock" }
            } else {
                ValidationError::NotANumber {
                    field: "stock",
                    value: self.stock.clone(),
                }
            }
        })?;

        Ok(ProductUpdate {
            name: Some(self.name.trim().to_string()),
            description: non_blank(&self.description),
            fabric: non_blank(&self.fabric),
            category: non_blank(&self.category),
            price: Some(price),
            stock: Some(stock),
            is_active: Some(self.is_active),
        })
    }
}

/// User form input as typed.
#[derive(Clone, Default)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub postal_code: String,
    pub prefecture: String,
    pub city: String,
    pub address_line1: String,
    pub address_line2: String,
    pub role: Role,
    /// Left blank on edit to keep the current password.
    pub password: Option<SecretString>,
}

impl std::fmt::Debug for UserForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl UserForm {
    /// Validate input for a new account; a password is required.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingFields` for a blank name or
    /// password, `ValidationError::Email` for a malformed email.
    pub fn validate_new(&self) -> Result<UserUpsert, ValidationError> {
        let mut missing = self.missing_fields();
        if self.password().is_none() {
            missing.push("password");
        }
        self.build(missing)
    }

    /// Validate input for an existing account.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingFields` for a blank name,
    /// `ValidationError::Email` for a malformed email.
    pub fn validate_update(&self) -> Result<UserUpsert, ValidationError> {
        self.build(self.missing_fields())
    }

    fn missing_fields(&self) -> Vec<&'static str> {
        if self.name.trim().is_empty() {
            vec!["name"]
        } else {
            Vec::new()
        }
    }

    fn password(&self) -> Option<&SecretString> {
        self.password
            .as_ref()
            .filter(|password| !password.expose_secret().is_empty())
    }

    fn build(&self, missing: Vec<&'static str>) -> Result<UserUpsert, ValidationError> {
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }
        let email = Email::parse(&self.email)?;

        Ok(UserUpsert {
            name: self.name.trim().to_string(),
            email: email.into_inner(),
            phone_number: non_blank(&self.phone_number),
            postal_code: non_blank(&self.postal_code),
            prefecture: non_blank(&self.prefecture),
            city: non_blank(&self.city),
            address_line1: non_blank(&self.address_line1),
            address_line2: non_blank(&self.address_line2),
            role: self.role,
            password: self.password().cloned(),
        })
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// =============================================================================
// AdminConsole
// =============================================================================

/// Admin operations over the backend client.
#[derive(Clone)]
pub struct AdminConsole {
    client: BackendClient,
}

impl AdminConsole {
    #[must_use]
    pub const fn new(client: BackendClient) -> Self {
        Self { client }
    }

    // -------------------------------------------------------------------------
    // Users
    // -------------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns `AdminError::Api` if the request fails.
    pub async fn users(&self, page: &PageRequest) -> Result<Page<UserProfile>, AdminError> {
        Ok(self.client.users_page(page).await?)
    }

    /// # Errors
    ///
    /// Returns `AdminError::Api` if the request fails.
    pub async fn user(&self, id: UserId) -> Result<UserProfile, AdminError> {
        Ok(self.client.user(id).await?)
    }

    /// # Errors
    ///
    /// Returns `AdminError::Validation` before sending anything if the form
    /// is invalid, `AdminError::Api` if the backend refuses.
    pub async fn create_user(&self, form: &UserForm) -> Result<UserProfile, AdminError> {
        let payload = form.validate_new()?;
        let user = self.client.create_user(&payload).await?;
        info!(user_id = %user.id, "user created");
        Ok(user)
    }

    /// # Errors
    ///
    /// Same as [`create_user`](Self::create_user).
    pub async fn update_user(&self, id: UserId, form: &UserForm) -> Result<UserProfile, AdminError> {
        let payload = form.validate_update()?;
        Ok(self.client.update_user(id, &payload).await?)
    }

    /// # Errors
    ///
    /// Returns `AdminError::Api` if the request fails.
    pub async fn delete_user(&self, id: UserId) -> Result<(), AdminError> {
        self.client.delete_user(id).await?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns `AdminError::Api` if the request fails.
    pub async fn products(&self, page: &PageRequest) -> Result<Page<Product>, AdminError> {
        Ok(self.client.products_page(page).await?)
    }

    /// # Errors
    ///
    /// Returns `AdminError::Api` if the request fails.
    pub async fn product(&self, id: ProductId) -> Result<Product, AdminError> {
        Ok(self.client.admin_product(id).await?)
    }

    /// # Errors
    ///
    /// Returns `AdminError::Validation` before sending anything if the form
    /// is invalid, `AdminError::Api` if the backend refuses.
    pub async fn create_product(&self, form: &ProductForm) -> Result<Product, AdminError> {
        let payload = form.validate()?;
        let product = self.client.create_product(&payload).await?;
        info!(product_id = %product.id, "product created");
        Ok(product)
    }

    /// # Errors
    ///
    /// Same as [`create_product`](Self::create_product).
    pub async fn update_product(&self, id: ProductId, form: &ProductForm) -> Result<Product, AdminError> {
        let payload = form.validate()?;
        Ok(self.client.update_product(id, &payload).await?)
    }

    /// # Errors
    ///
    /// Returns `AdminError::Api` if the request fails.
    pub async fn delete_product(&self, id: ProductId) -> Result<(), AdminError> {
        self.client.delete_product(id).await?;
        info!(product_id = %id, "product deleted");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Orders
    // -------------------------------------------------------------------------

    /// # Errors
    ///
    /// Returns `AdminError::Api` if the request fails.
    pub async fn orders(
        &self,
        page: &PageRequest,
        filter: &AdminOrderFilter,
    ) -> Result<Page<AdminOrder>, AdminError> {
        Ok(self.client.orders_page(page, filter).await?)
    }

    /// # Errors
    ///
    /// Returns `AdminError::Api` if the request fails.
    pub async fn order(&self, id: &OrderRef) -> Result<AdminOrder, AdminError> {
        Ok(self.client.order(id).await?)
    }

    /// Move an order to `next`.
    ///
    /// The current status is fetched first and an obviously disallowed
    /// change is refused without a write. The backend has the final say; a
    /// 409 from it is reported the same way.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::DisallowedTransition` if the change is refused,
    /// `AdminError::Api` for any other failure.
    #[instrument(skip(self), fields(order = %id, to = %next))]
    pub async fn change_order_status(
        &self,
        id: &OrderRef,
        next: OrderStatus,
    ) -> Result<AdminOrder, AdminError> {
        let current = self
            .client
            .order(id)
            .await?
            .status
            .as_deref()
            .and_then(OrderStatus::parse_lenient);

        if let Some(from) = current.filter(|from| !from.can_transition_to(next)) {
            warn!(from = %from, "refusing status change");
            return Err(AdminError::DisallowedTransition {
                from: Some(from),
                to: next,
            });
        }

        match self.client.update_order_status(id, next).await {
            Ok(order) => {
                info!("order status changed");
                Ok(order)
            }
            Err(e) if e.is_conflict() => Err(AdminError::DisallowedTransition {
                from: current,
                to: next,
            }),
            Err(e) => Err(e.into()),
        }
    }
}
