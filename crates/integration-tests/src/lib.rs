//! Integration tests for the Atelier storefront client.
//!
//! Every test stands up its own `wiremock` server in place of the backend,
//! so nothing touches the network.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p atelier-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `gateway` - Envelope handling, errors, timeouts, read cache
//! - `cart_reconciliation` - Loading the server cart into the store
//! - `cart_sync` - Signed-in cart mutations and rollback
//! - `product_lookup` - Batch lookup with per-product fallback
//! - `shipping` - Address resolution and first-address bootstrap
//! - `checkout` - Order submission and the completion view
//! - `admin` - Paging and order status changes

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::time::Duration;

use atelier_storefront::AppState;
use atelier_storefront::backend::UserProfile;
use atelier_storefront::config::StorefrontConfig;
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::MockServer;

/// Timeout used by test clients; short so timeout tests stay fast.
pub const TEST_TIMEOUT: Duration = Duration::from_millis(500);

/// Configuration pointing at `server`, with a bearer token.
pub fn test_config(server: &MockServer) -> StorefrontConfig {
    let mut config = StorefrontConfig::for_base_url(&server.uri()).unwrap();
    config.timeout = TEST_TIMEOUT;
    config.completion_display = Duration::from_millis(10);
    config.api_token = Some(SecretString::from("test-token".to_string()));
    config
}

/// Client state for `server` with nobody signed in.
pub async fn guest_state(server: &MockServer) -> AppState {
    AppState::new(test_config(server)).await.unwrap()
}

/// Client state for `server` with [`user`] signed in.
pub async fn signed_in_state(server: &MockServer, profile: UserProfile) -> AppState {
    let state = guest_state(server).await;
    state.user().set_user(profile);
    state
}

/// Wrap `data` the way the backend's envelope endpoints do.
#[must_use]
pub fn envelope(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

/// A signed-in user, optionally with an address on the profile.
#[must_use]
pub fn user(with_address: bool) -> UserProfile {
    let mut value = json!({
        "id": 1,
        "name": "山田 太郎",
        "email": "taro@example.com",
        "role": "USER"
    });
    if with_address {
        value["postalCode"] = json!("150-0001");
        value["prefecture"] = json!("東京都");
        value["city"] = json!("渋谷区");
        value["addressLine1"] = json!("神宮前1-1-1");
    }
    serde_json::from_value(value).unwrap()
}

/// A catalog product.
#[must_use]
pub fn product_json(id: i64, price: i64, stock: u32) -> Value {
    json!({
        "id": id,
        "name": format!("Product {id}"),
        "price": price,
        "stock": stock,
        "imageUrls": [format!("/img/{id}.jpg")]
    })
}

/// A server cart line using the legacy `productName` field.
#[must_use]
pub fn cart_line(id: i64, product_id: i64, price: i64, quantity: u32) -> Value {
    json!({
        "id": id,
        "productId": product_id,
        "productName": format!("Product {product_id}"),
        "price": price,
        "quantity": quantity
    })
}

/// A server cart holding `lines`.
#[must_use]
pub fn cart_json(lines: &[Value]) -> Value {
    json!({ "id": 100, "userId": 1, "items": lines })
}

/// A saved address book entry.
#[must_use]
pub fn address_json(id: i64) -> Value {
    json!({
        "id": id,
        "name": "佐藤 花子",
        "postalCode": "530-0001",
        "prefecture": "大阪府",
        "city": "大阪市北区",
        "addressLine1": "梅田1-1-1"
    })
}

/// A placed order.
#[must_use]
pub fn order_json(order_id: i64) -> Value {
    json!({
        "orderId": order_id,
        "orderNumber": format!("A-{order_id}"),
        "status": "PENDING",
        "orderedAt": "2025-07-30T22:15:00",
        "total": 2000,
        "items": [{
            "id": 1,
            "productId": 7,
            "productName": "Product 7",
            "price": 1000,
            "quantity": 2
        }]
    })
}
