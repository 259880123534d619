//! Backend REST paths.

use std::fmt::Display;

use atelier_core::{AddressId, CartItemId, ProductId, UserId};

pub const PRODUCTS: &str = "/products";
pub const MY_CART: &str = "/carts/me";
pub const MY_ORDER: &str = "/orders/me";
pub const ORDER_HISTORY: &str = "/orders/history";
pub const CHECKOUT: &str = "/orders/checkout";
pub const ME: &str = "/users/me";
pub const MY_ADDRESSES: &str = "/delivery-addresses/me";
pub const ADDRESSES: &str = "/delivery-addresses";
pub const ADMIN_USERS: &str = "/admin/users";
pub const ADMIN_PRODUCTS: &str = "/admin/products";
pub const ADMIN_ORDERS: &str = "/admin/orders";

#[must_use]
pub fn product(id: ProductId) -> String {
    format!("{PRODUCTS}/{id}")
}

/// Batch lookup, e.g. `/products?ids=1,2,3`.
#[must_use]
pub fn products_by_ids(ids: &[ProductId]) -> String {
    let joined = ids
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("{PRODUCTS}?ids={joined}")
}

#[must_use]
pub fn cart_item(id: CartItemId) -> String {
    format!("{MY_CART}/items/{id}")
}

#[must_use]
pub fn address(id: AddressId) -> String {
    format!("{ADDRESSES}/{id}")
}

#[must_use]
pub fn admin_user(id: UserId) -> String {
    format!("{ADMIN_USERS}/{id}")
}

#[must_use]
pub fn admin_product(id: ProductId) -> String {
    format!("{ADMIN_PRODUCTS}/{id}")
}

/// Admin order detail. Accepts either identifier form the backend uses.
#[must_use]
pub fn admin_order(id: &impl Display) -> String {
    format!("{ADMIN_ORDERS}/{id}")
}

#[must_use]
pub fn admin_order_status(id: &impl Display) -> String {
    format!("{ADMIN_ORDERS}/{id}/status")
}

/// Append query pairs to a path. Values are percent-encoded.
#[must_use]
pub fn with_query(path: &str, pairs: &[(&str, String)]) -> String {
    if pairs.is_empty() {
        return path.to_string();
    }
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())))
        .finish();
    format!("{path}?{query}")
}
