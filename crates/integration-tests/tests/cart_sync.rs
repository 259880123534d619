//! Integration tests for signed-in cart mutations.

use atelier_core::{CartItemId, Price, ProductId};
use atelier_integration_tests::{cart_json, cart_line, signed_in_state, user};
use atelier_storefront::models::NewCartItem;
use atelier_storefront::scope::ViewScope;
use atelier_storefront::stores::CartError;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn line(product: i64, price: i64, quantity: u32) -> NewCartItem {
    NewCartItem {
        product_id: ProductId::new(product),
        name: format!("Product {product}"),
        price: Price::from_units(price),
        quantity,
        image_url: None,
        color: None,
        size: None,
        stock: None,
    }
}

#[tokio::test]
async fn add_is_replaced_by_server_cart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/carts/me"))
        .and(body_json(json!({"productId": 7, "quantity": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(&[cart_line(55, 7, 1000, 1)])))
        .expect(1)
        .mount(&server)
        .await;
    let state = signed_in_state(&server, user(false)).await;

    let item = state.cart_sync().add(line(7, 1000, 1)).await.unwrap();
    assert_eq!(item.id, CartItemId::new(55));
    assert!(!item.local);
    assert_eq!(state.cart().len(), 1);
}

#[tokio::test]
async fn add_sends_only_the_units_that_fit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/carts/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(&[cart_line(55, 7, 1000, 1)])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/carts/me"))
        .and(body_json(json!({"productId": 7, "quantity": 1})))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(&[cart_line(55, 7, 1000, 2)])))
        .expect(1)
        .mount(&server)
        .await;
    let state = signed_in_state(&server, user(false)).await;
    state.reconciler().reconcile(&ViewScope::new()).await;

    // 1 + 5 clamps to 2, so only one more unit goes to the server.
    let item = state.cart_sync().add(line(7, 1000, 5)).await.unwrap();
    assert_eq!(item.quantity(), 2);

    // Already at the limit: nothing is sent.
    let item = state.cart_sync().add(line(7, 1000, 1)).await.unwrap();
    assert_eq!(item.quantity(), 2);
}

#[tokio::test]
async fn failed_add_rolls_back() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/carts/me"))
        .respond_with(ResponseTemplate::new(500).set_body_string("cart service unavailable"))
        .mount(&server)
        .await;
    let state = signed_in_state(&server, user(false)).await;

    let err = state.cart_sync().add(line(7, 1000, 1)).await.unwrap_err();
    assert!(matches!(err, CartError::Sync(_)), "got: {err:?}");
    assert!(state.cart().is_empty());
}

#[tokio::test]
async fn set_quantity_updates_persisted_line() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/carts/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(&[cart_line(55, 7, 1000, 1)])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/carts/me/items/55"))
        .and(body_json(json!({"quantity": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(&[cart_line(55, 7, 1000, 2)])))
        .expect(1)
        .mount(&server)
        .await;
    let state = signed_in_state(&server, user(false)).await;
    state.reconciler().reconcile(&ViewScope::new()).await;

    let item = state.cart_sync().set_quantity(ProductId::new(7), 9).await.unwrap();
    assert_eq!(item.quantity(), 2);
    assert_eq!(item.subtotal(), Price::from_units(2000));
}

#[tokio::test]
async fn failed_set_quantity_restores_previous_quantity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/carts/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(&[cart_line(55, 7, 1000, 1)])))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/carts/me/items/55"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;
    let state = signed_in_state(&server, user(false)).await;
    state.reconciler().reconcile(&ViewScope::new()).await;
    let before = state.cart().items();

    assert!(state.cart_sync().set_quantity(ProductId::new(7), 2).await.is_err());
    assert_eq!(state.cart().items(), before);
}

#[tokio::test]
async fn failed_remove_puts_line_back() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/carts/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(&[
            cart_line(55, 7, 1000, 1),
            cart_line(56, 8, 500, 1),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/carts/me/items/55"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;
    let state = signed_in_state(&server, user(false)).await;
    state.reconciler().reconcile(&ViewScope::new()).await;
    let before = state.cart().items();

    assert!(state.cart_sync().remove(ProductId::new(7)).await.is_err());
    assert_eq!(state.cart().items(), before);
}

#[tokio::test]
async fn remove_deletes_persisted_line() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/carts/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(&[cart_line(55, 7, 1000, 1)])))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/carts/me/items/55"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let state = signed_in_state(&server, user(false)).await;
    state.reconciler().reconcile(&ViewScope::new()).await;

    let removed = state.cart_sync().remove(ProductId::new(7)).await.unwrap();
    assert_eq!(removed.id, CartItemId::new(55));
    assert!(state.cart().is_empty());
}

#[tokio::test]
async fn pending_cart_is_replayed_after_login() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/carts/me"))
        .and(body_json(json!({"productId": 7, "quantity": 2})))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(&[cart_line(55, 7, 1000, 2)])))
        .expect(1)
        .mount(&server)
        .await;
    let state = atelier_integration_tests::guest_state(&server).await;

    // As a guest: local only, then stash before the login redirect.
    state.cart_sync().add(line(7, 1000, 2)).await.unwrap();
    state.pending_cart().stash(state.cart());

    state.user().set_user(user(false));
    let report = state.pending_cart().restore_after_login().await;
    assert_eq!(report.restored, 1);

    let items = state.cart().items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, CartItemId::new(55));
    assert_eq!(items[0].quantity(), 2);
}

#[tokio::test]
async fn signed_in_cart_keeps_stock_limit_after_server_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/carts/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(&[cart_line(55, 7, 1000, 1)])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let state = signed_in_state(&server, user(false)).await;

    let item = state
        .cart_sync()
        .add(NewCartItem {
            stock: Some(1),
            ..line(7, 1000, 1)
        })
        .await
        .unwrap();
    assert_eq!(item.id, CartItemId::new(55));
    assert_eq!(item.stock, Some(1));

    // Stock 1 caps the line below the per-person limit, so nothing changes.
    let item = state.cart_sync().set_quantity(ProductId::new(7), 5).await.unwrap();
    assert_eq!(item.quantity(), 1);
    assert_eq!(state.cart().update_quantity(ProductId::new(7), 5).unwrap().quantity(), 1);
}
