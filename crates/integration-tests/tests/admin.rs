//! Integration tests for `AdminConsole`.

use atelier_core::{OrderStatus, UserId};
use atelier_integration_tests::{envelope, signed_in_state, user};
use atelier_storefront::backend::{AdminOrderFilter, OrderRef, PageRequest};
use atelier_storefront::models::ValidationError;
use atelier_storefront::services::{AdminError, ProductForm};
use serde_json::json;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn admin_order(id: i64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "orderNumber": format!("A-{id}"),
        "userId": 1,
        "userName": "山田 太郎",
        "total": 2000,
        "status": status,
        "orderedAt": "2025-07-30T22:15:00"
    })
}

async fn mount_order(server: &MockServer, id: i64, status: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/admin/orders/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(admin_order(id, status))))
        .mount(server)
        .await;
}

#[tokio::test]
async fn status_change_is_sent_when_allowed() {
    let server = MockServer::start().await;
    mount_order(&server, 12, "PAID").await;
    Mock::given(method("PATCH"))
        .and(path("/admin/orders/12/status"))
        .and(body_json(json!({"status": "PREPARING"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(admin_order(12, "PREPARING"))))
        .expect(1)
        .mount(&server)
        .await;
    let state = signed_in_state(&server, user(false)).await;

    let order = state
        .admin()
        .change_order_status(&OrderRef::Number(12), OrderStatus::Preparing)
        .await
        .unwrap();
    assert_eq!(order.status.as_deref(), Some("PREPARING"));
}

#[tokio::test]
async fn conflict_is_reported_as_disallowed_transition() {
    let server = MockServer::start().await;
    mount_order(&server, 12, "PENDING").await;
    Mock::given(method("PATCH"))
        .and(path("/admin/orders/12/status"))
        .respond_with(ResponseTemplate::new(409).set_body_string("invalid transition"))
        .expect(1)
        .mount(&server)
        .await;
    let state = signed_in_state(&server, user(false)).await;

    let err = state
        .admin()
        .change_order_status(&OrderRef::Number(12), OrderStatus::Delivered)
        .await
        .unwrap_err();
    assert!(
        matches!(
            err,
            AdminError::DisallowedTransition {
                from: Some(OrderStatus::Pending),
                to: OrderStatus::Delivered
            }
        ),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn terminal_order_is_refused_without_writing() {
    let server = MockServer::start().await;
    // Label instead of code; both identify the status.
    mount_order(&server, 13, "発送済み").await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let state = signed_in_state(&server, user(false)).await;

    let err = state
        .admin()
        .change_order_status(&OrderRef::Number(13), OrderStatus::Canceled)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AdminError::DisallowedTransition {
            from: Some(OrderStatus::Shipped),
            ..
        }
    ));
    assert_eq!(
        err.to_string(),
        "Order cannot move from SHIPPED to CANCELED"
    );
}

#[tokio::test]
async fn unknown_current_status_defers_to_backend() {
    let server = MockServer::start().await;
    mount_order(&server, 14, "ON_HOLD").await;
    Mock::given(method("PATCH"))
        .and(path("/admin/orders/14/status"))
        .respond_with(ResponseTemplate::new(409))
        .expect(1)
        .mount(&server)
        .await;
    let state = signed_in_state(&server, user(false)).await;

    let err = state
        .admin()
        .change_order_status(&OrderRef::Number(14), OrderStatus::Paid)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Order cannot move from an unknown status to PAID"
    );
}

#[tokio::test]
async fn order_listing_sends_paging_and_filter() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/orders"))
        .and(query_param("page", "1"))
        .and(query_param("size", "20"))
        .and(query_param("status", "PAID"))
        .and(query_param("userId", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "content": [admin_order(21, "PAID"), admin_order(22, "PAID")],
            "number": 1,
            "size": 20,
            "totalElements": 22,
            "totalPages": 2
        }))))
        .expect(1)
        .mount(&server)
        .await;
    let state = signed_in_state(&server, user(false)).await;

    let page = PageRequest {
        page: Some(1),
        size: Some(20),
        sort: None,
    };
    let filter = AdminOrderFilter {
        status: Some(OrderStatus::Paid),
        user_id: Some(UserId::new(1)),
        query: Some("   ".to_string()),
    };
    let orders = state.admin().orders(&page, &filter).await.unwrap();

    assert_eq!(orders.content.len(), 2);
    assert_eq!(orders.total_elements, 22);
    assert_eq!(orders.content[0].reference(), Some(&OrderRef::Number(21)));
}

#[tokio::test]
async fn invalid_product_form_is_not_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/products"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;
    let state = signed_in_state(&server, user(false)).await;

    let form = ProductForm {
        name: "Linen shirt".to_string(),
        price: "12800".to_string(),
        stock: "-3".to_string(),
        ..ProductForm::default()
    };
    let err = state.admin().create_product(&form).await.unwrap_err();
    assert!(matches!(
        err,
        AdminError::Validation(ValidationError::Negative { field: "stock" })
    ));
}

#[tokio::test]
async fn valid_product_form_is_created() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/products"))
        .and(body_partial_json(json!({
            "name": "Linen shirt",
            "stock": 4,
            "isActive": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(json!({
            "id": 40, "name": "Linen shirt", "price": 12800, "stock": 4, "imageUrls": []
        }))))
        .expect(1)
        .mount(&server)
        .await;
    let state = signed_in_state(&server, user(false)).await;

    let form = ProductForm {
        name: "Linen shirt".to_string(),
        price: "12800".to_string(),
        stock: "4".to_string(),
        is_active: true,
        ..ProductForm::default()
    };
    let product = state.admin().create_product(&form).await.unwrap();
    assert_eq!(product.name, "Linen shirt");
}
