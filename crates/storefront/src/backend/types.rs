//! Wire types for the storefront backend REST API.
//!
//! These mirror the JSON the backend sends and accepts (camelCase). Anything
//! the client keeps in its own state goes through [`super::conversions`]
//! first; these types are never stored directly.

use atelier_core::{
    AddressId, CartId, CartItemId, OrderId, OrderItemId, Price, ProductId, Role, UserId,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

// =============================================================================
// Product Types
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub fabric: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    /// Catalog list price.
    pub price: Price,
    #[serde(default)]
    pub stock: Option<u32>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl Product {
    /// First image, used as the thumbnail.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }
}

/// Admin product update payload. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fabric: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

// =============================================================================
// Cart Types
// =============================================================================

/// Server-side cart as returned by `/carts/me`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    #[serde(default)]
    pub id: Option<CartId>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub items: Vec<RawCartItem>,
    #[serde(default)]
    pub total: Option<Price>,
}

/// A cart line exactly as the backend (or an older client snapshot) sent it.
///
/// `productName` is the legacy spelling of `name`; see
/// [`super::conversions::normalize_cart_item`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    pub price: Price,
    pub quantity: u32,
    #[serde(default)]
    pub subtotal: Option<Price>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub stock: Option<u32>,
}

/// Body of `POST /carts/me`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// Body of `PUT /carts/me/items/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpdateCartItemRequest {
    pub quantity: u32,
}

// =============================================================================
// Order Types
// =============================================================================

/// One line of an order creation request. Prices are never sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// An order as the customer-facing endpoints return it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub order_id: OrderId,
    #[serde(default)]
    pub order_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub ordered_at: Option<String>,
    pub total: Price,
    #[serde(default)]
    pub items: Vec<RawOrderItem>,
}

/// An order line snapshot.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOrderItem {
    pub id: OrderItemId,
    pub product_id: ProductId,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub product_description: Option<String>,
    pub price: Price,
    pub quantity: u32,
    #[serde(default)]
    pub subtotal: Option<Price>,
}

/// Reference to an order that may arrive as a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderRef {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for OrderRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<OrderId> for OrderRef {
    fn from(id: OrderId) -> Self {
        Self::Number(id.as_i64())
    }
}

/// An order as the admin endpoints return it.
///
/// Older backend builds name the identifier `orderId`, newer ones `id`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminOrder {
    #[serde(default)]
    pub id: Option<OrderRef>,
    #[serde(default)]
    pub order_id: Option<OrderRef>,
    #[serde(default)]
    pub order_number: Option<String>,
    pub user_id: UserId,
    #[serde(default)]
    pub user_name: Option<String>,
    pub total: Price,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub ordered_at: Option<String>,
    #[serde(default)]
    pub items: Vec<RawOrderItem>,
}

impl AdminOrder {
    /// The order's identifier, whichever field carried it.
    #[must_use]
    pub fn reference(&self) -> Option<&OrderRef> {
        self.id.as_ref().or(self.order_id.as_ref())
    }
}

/// Body of `PATCH /admin/orders/{id}/status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderStatusUpdate {
    pub status: atelier_core::OrderStatus,
}

// =============================================================================
// User Types
// =============================================================================

/// A user profile (`/users/me`, admin user endpoints).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Legacy single-line address.
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub prefecture: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub address_line1: Option<String>,
    #[serde(default)]
    pub address_line2: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl UserProfile {
    /// Whether any address field on the profile is filled in.
    #[must_use]
    pub fn has_address(&self) -> bool {
        [
            &self.address,
            &self.postal_code,
            &self.prefecture,
            &self.city,
            &self.address_line1,
        ]
        .into_iter()
        .any(|field| field.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }
}

/// Body of `PUT /users/me`. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefecture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
}

/// Admin create/update payload for a user.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpsert {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefecture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub role: Role,
    /// Omitted on update when unchanged.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_password"
    )]
    pub password: Option<SecretString>,
}

impl std::fmt::Debug for UserUpsert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserUpsert")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

#[allow(clippy::ref_option)] // signature dictated by serde's serialize_with
fn serialize_password<S: Serializer>(
    password: &Option<SecretString>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match password {
        Some(secret) => serializer.serialize_str(secret.expose_secret()),
        None => serializer.serialize_none(),
    }
}

// =============================================================================
// Delivery Address Types
// =============================================================================

/// A saved delivery address (address book entry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub name: String,
    #[serde(default)]
    pub furigana: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub prefecture: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub address_line1: Option<String>,
    #[serde(default)]
    pub address_line2: Option<String>,
    /// Legacy single-line address.
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Create/update payload for an address book entry.
///
/// Always pass through [`AddressUpsert::sanitize`] before sending; the
/// backend treats an empty string differently from an absent field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressUpsert {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub furigana: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefecture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl AddressUpsert {
    /// Trim every field and drop the ones left blank.
    #[must_use]
    pub fn sanitize(self) -> Self {
        fn pick(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Self {
            name: pick(self.name),
            furigana: pick(self.furigana),
            postal_code: pick(self.postal_code),
            prefecture: pick(self.prefecture),
            city: pick(self.city),
            address_line1: pick(self.address_line1),
            address_line2: pick(self.address_line2),
            address: pick(self.address),
            phone: pick(self.phone),
            email: pick(self.email),
        }
    }
}

// =============================================================================
// Paging Types
// =============================================================================

/// Paging parameters for admin listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page: Option<u32>,
    pub size: Option<u32>,
    /// e.g. `createdAt,desc`
    pub sort: Option<String>,
}

impl PageRequest {
    /// Query pairs in the order the backend documents them.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(size) = self.size {
            pairs.push(("size", size.to_string()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort", sort.clone()));
        }
        pairs
    }
}

/// Optional filters for the admin order listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminOrderFilter {
    pub status: Option<atelier_core::OrderStatus>,
    pub user_id: Option<UserId>,
    /// Free-text search (order number, customer name).
    pub query: Option<String>,
}

impl AdminOrderFilter {
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.code().to_string()));
        }
        if let Some(user_id) = self.user_id {
            pairs.push(("userId", user_id.to_string()));
        }
        if let Some(query) = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            pairs.push(("q", query.to_string()));
        }
        pairs
    }
}

/// One page of an admin listing.
///
/// Deserializes from either a page object or a bare array (treated as a
/// single page holding everything).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    /// Zero-based page index.
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Whether another page follows this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number + 1 < self.total_pages
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageRepr<T> {
    Paged {
        content: Vec<T>,
        #[serde(default)]
        number: Option<u32>,
        #[serde(default)]
        size: Option<u32>,
        #[serde(default, rename = "totalElements")]
        total_elements: Option<u64>,
        #[serde(default, rename = "totalPages")]
        total_pages: Option<u32>,
    },
    Bare(Vec<T>),
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Page<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = PageRepr::<T>::deserialize(deserializer)?;
        Ok(match repr {
            PageRepr::Paged {
                content,
                number,
                size,
                total_elements,
                total_pages,
            } => {
                let len = u32::try_from(content.len()).unwrap_or(u32::MAX);
                Self {
                    number: number.unwrap_or(0),
                    size: size.unwrap_or(len),
                    total_elements: total_elements.unwrap_or(u64::from(len)),
                    total_pages: total_pages.unwrap_or(1),
                    content,
                }
            }
            PageRepr::Bare(content) => {
                let len = u32::try_from(content.len()).unwrap_or(u32::MAX);
                Self {
                    number: 0,
                    size: len,
                    total_elements: u64::from(len),
                    total_pages: 1,
                    content,
                }
            }
        })
    }
}
