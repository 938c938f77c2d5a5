//! Staff management, inventory, orders and notifications.

use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde_json::json;

use juliecraft_core::{OrderStatus, ProfileId};
use juliecraft_integration_tests::TestApp;
use juliecraft_server::models::{NewNotification, NewOrder, NewProduct};

#[tokio::test]
async fn test_super_admin_promotes_customer() {
    let app = TestApp::new();
    let owner = app.super_admin().await;
    let customer = app.customer().await;

    let resp = app
        .patch(
            &format!("/api/admin/users/{}", customer.id),
            Some(&owner.token),
            json!({ "role": "manager" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["role"], "manager");
    assert_eq!(resp.body["isAdmin"], true);

    // The promoted account can now reach the admin panel
    let resp = app.get("/api/admin/dashboard", Some(&customer.token)).await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn test_deactivation_locks_admin_out() {
    let app = TestApp::new();
    let owner = app.super_admin().await;
    let admin = app.admin().await;

    let resp = app
        .patch(
            &format!("/api/admin/users/{}", admin.id),
            Some(&owner.token),
            json!({ "status": "inactive" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["status"], "inactive");

    let resp = app.get("/api/admin/dashboard", Some(&admin.token)).await;
    assert_eq!(resp.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_super_admin_cannot_demote_self() {
    let app = TestApp::new();
    let owner = app.super_admin().await;
    let uri = format!("/api/admin/users/{}", owner.id);

    for body in [json!({ "role": "admin" }), json!({ "status": "inactive" })] {
        let resp = app.patch(&uri, Some(&owner.token), body).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.error(),
            Some("You cannot remove your own super admin access")
        );
    }
}

#[tokio::test]
async fn test_user_update_validation() {
    let app = TestApp::new();
    let owner = app.super_admin().await;

    let resp = app
        .patch(
            &format!("/api/admin/users/{}", ProfileId::random()),
            Some(&owner.token),
            json!({ "role": "admin" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.error(), Some("User not found"));

    let resp = app
        .patch(
            &format!("/api/admin/users/{}", owner.id),
            Some(&owner.token),
            json!({}),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app
        .patch(
            "/api/admin/users/not-a-uuid",
            Some(&owner.token),
            json!({ "role": "admin" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_users() {
    let app = TestApp::new();
    let admin = app.admin().await;
    app.customer().await;

    let resp = app.get("/api/admin/users", Some(&admin.token)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_low_stock_and_set_stock() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let mut ids = Vec::new();
    for stock in [7, 2, 30] {
        let product = app
            .store
            .add_product(NewProduct {
                name: format!("Merino skein x{stock}"),
                price: Decimal::new(1800, 2),
                stock,
            })
            .await;
        ids.push(product.id);
    }

    let resp = app
        .get("/api/admin/inventory/low-stock", Some(&admin.token))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    let stocks: Vec<i64> = resp
        .body
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|p| p["stock"].as_i64())
        .collect();
    assert_eq!(stocks, vec![2, 7]);

    let uri = format!("/api/admin/products/{}/stock", ids[0]);
    let resp = app.patch(&uri, Some(&admin.token), json!({ "stock": 40 })).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["stock"], 40);

    let resp = app.patch(&uri, Some(&admin.token), json!({ "stock": -1 })).await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error(), Some("stock cannot be negative"));

    let resp = app
        .patch(
            "/api/admin/products/9999/stock",
            Some(&admin.token),
            json!({ "stock": 1 }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.error(), Some("Product not found"));
}

#[tokio::test]
async fn test_order_status_update() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let order = app
        .store
        .add_order(NewOrder {
            order_number: "JC-2042".to_string(),
            status: OrderStatus::Pending,
            total: Some(Decimal::new(5600, 2)),
            ..NewOrder::default()
        })
        .await;

    let resp = app
        .patch(
            &format!("/api/admin/orders/{}/status", order.id),
            Some(&admin.token),
            json!({ "status": "shipped" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["status"], "shipped");

    let resp = app
        .patch(
            &format!("/api/admin/orders/{}/status", order.id),
            Some(&admin.token),
            json!({ "status": "lost" }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);

    let resp = app.get("/api/orders/track/JC-2042", None).await;
    assert_eq!(resp.body["order"]["status"], "shipped");
}

#[tokio::test]
async fn test_notifications() {
    let app = TestApp::new();
    let admin = app.admin().await;
    let mut ids = Vec::new();
    for title in ["Low stock: merino", "New order JC-1", "New order JC-2"] {
        let n = app
            .store
            .add_notification(NewNotification {
                kind: "info".to_string(),
                title: title.to_string(),
                message: Some("Check the admin panel".to_string()),
            })
            .await;
        ids.push(n.id);
    }

    let resp = app
        .post(
            &format!("/api/admin/notifications/{}/read", ids[0]),
            Some(&admin.token),
            json!({}),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["success"], true);

    let resp = app
        .get("/api/admin/notifications?unread_only=true", Some(&admin.token))
        .await;
    assert_eq!(resp.body.as_array().map(Vec::len), Some(2));

    let resp = app.get("/api/admin/notifications", Some(&admin.token)).await;
    assert_eq!(resp.body.as_array().map(Vec::len), Some(3));

    let resp = app
        .get("/api/admin/notifications?limit=2", Some(&admin.token))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body.as_array().map(Vec::len), Some(2));
    assert_eq!(resp.body[0]["title"], "New order JC-2");

    for limit in ["0", "501"] {
        let resp = app
            .get(
                &format!("/api/admin/notifications?limit={limit}"),
                Some(&admin.token),
            )
            .await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.error(), Some("limit must be between 1 and 500"));
    }

    let resp = app
        .post("/api/admin/notifications/read-all", Some(&admin.token), json!({}))
        .await;
    assert_eq!(resp.body["updated"], 2);

    let resp = app
        .post(
            "/api/admin/notifications/424242/read",
            Some(&admin.token),
            json!({}),
        )
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
    assert_eq!(resp.error(), Some("Notification not found"));
}
