//! Integration tests for `CartReconciler`.

use std::time::Duration;

use atelier_core::{Price, ProductId};
use atelier_integration_tests::{cart_json, cart_line, guest_state, signed_in_state, user};
use atelier_storefront::models::NewCartItem;
use atelier_storefront::scope::ViewScope;
use atelier_storefront::services::ReconcileOutcome;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn local_line(product: i64) -> NewCartItem {
    NewCartItem {
        product_id: ProductId::new(product),
        name: "Cotton tote".to_string(),
        price: Price::from_units(3300),
        quantity: 1,
        image_url: None,
        color: None,
        size: None,
        stock: None,
    }
}

async fn mount_cart(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/carts/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_json(&[
            cart_line(11, 7, 1000, 1),
            cart_line(12, 8, 2500, 2),
        ])))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn empty_cart_loads_server_lines() {
    let server = MockServer::start().await;
    mount_cart(&server, 1).await;
    let state = signed_in_state(&server, user(false)).await;

    let outcome = state.reconciler().reconcile(&ViewScope::new()).await;
    assert!(matches!(outcome, ReconcileOutcome::Loaded { lines: 2 }), "got: {outcome:?}");

    let items = state.cart().items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].name, "Product 7");
    assert_eq!(items[0].subtotal(), Price::from_units(1000));
    assert_eq!(items[1].quantity(), 2);
    assert_eq!(items[1].subtotal(), Price::from_units(5000));
    assert!(items.iter().all(|item| !item.local));
}

#[tokio::test]
async fn populated_cart_is_never_fetched() {
    let server = MockServer::start().await;
    mount_cart(&server, 0).await;
    let state = signed_in_state(&server, user(false)).await;
    state.cart().add(local_line(3)).unwrap();

    let scope = ViewScope::new();
    for _ in 0..2 {
        let outcome = state.reconciler().reconcile(&scope).await;
        assert!(matches!(outcome, ReconcileOutcome::AlreadyLoaded));
    }
    assert_eq!(state.cart().items()[0].product_id, ProductId::new(3));
}

#[tokio::test]
async fn guests_are_not_fetched() {
    let server = MockServer::start().await;
    mount_cart(&server, 0).await;
    let state = guest_state(&server).await;

    let outcome = state.reconciler().reconcile(&ViewScope::new()).await;
    assert!(matches!(outcome, ReconcileOutcome::Guest));
    assert!(state.cart().is_empty());
}

#[tokio::test]
async fn result_after_unmount_is_discarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/carts/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(cart_json(&[cart_line(11, 7, 1000, 1)]))
                .set_delay(Duration::from_millis(150)),
        )
        .mount(&server)
        .await;
    let state = signed_in_state(&server, user(false)).await;

    let scope = ViewScope::new();
    let reconciler = state.reconciler();
    let task_scope = scope.clone();
    let task = tokio::spawn(async move { reconciler.reconcile(&task_scope).await });

    tokio::time::sleep(Duration::from_millis(30)).await;
    scope.unmount();

    let outcome = task.await.unwrap();
    assert!(matches!(outcome, ReconcileOutcome::Discarded), "got: {outcome:?}");
    assert!(state.cart().is_empty());
}

#[tokio::test]
async fn failed_fetch_leaves_cart_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/carts/me"))
        .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
        .mount(&server)
        .await;
    let state = signed_in_state(&server, user(false)).await;

    let outcome = state.reconciler().reconcile(&ViewScope::new()).await;
    assert!(matches!(outcome, ReconcileOutcome::Failed(_)));
    assert!(state.cart().is_empty());
}

#[tokio::test]
async fn login_triggers_reconciliation() {
    let server = MockServer::start().await;
    mount_cart(&server, 1).await;
    let state = guest_state(&server).await;

    let scope = ViewScope::new();
    let mut cart_changes = state.cart().subscribe();
    let handle = state.reconciler().spawn_on_auth_change(scope.clone());

    state.user().set_user(user(false));
    tokio::time::timeout(Duration::from_secs(2), cart_changes.changed())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(state.cart().len(), 2);

    scope.unmount();
    state.user().clear_user();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn watcher_stops_on_unmount_without_auth_change() {
    let server = MockServer::start().await;
    let state = guest_state(&server).await;

    let scope = ViewScope::new();
    let handle = state.reconciler().spawn_on_auth_change(scope.clone());

    scope.unmount();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .unwrap()
        .unwrap();
}
