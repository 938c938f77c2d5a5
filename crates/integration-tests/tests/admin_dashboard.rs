//! Dashboard statistics, badge counters and stock maintenance.

use axum::http::StatusCode;
use rust_decimal::Decimal;
use serde_json::json;

use juliecraft_core::{AccountStatus, OrderStatus, Role};
use juliecraft_integration_tests::TestApp;
use juliecraft_server::models::{NewNotification, NewOrder, NewProduct};

async fn seed_products(app: &TestApp, levels: &[i32]) {
    for (i, &stock) in levels.iter().enumerate() {
        app.store
            .add_product(NewProduct {
                name: format!("Amigurumi kit {i}"),
                price: Decimal::new(2499, 2),
                stock,
            })
            .await;
    }
}

async fn seed_order(app: &TestApp, number: &str, status: OrderStatus, total: Option<Decimal>) {
    app.store
        .add_order(NewOrder {
            order_number: number.to_string(),
            status,
            total,
            ..NewOrder::default()
        })
        .await;
}

#[tokio::test]
async fn test_empty_store_reports_zero_revenue() {
    let app = TestApp::new();
    let admin = app.admin().await;
    seed_order(&app, "JC-1001", OrderStatus::Completed, None).await;

    let resp = app.get("/api/admin/dashboard", Some(&admin.token)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["totalRevenue"], json!(0.0));
    assert_eq!(resp.body["totalOrders"], 1);
}

#[tokio::test]
async fn test_dashboard_counts() {
    let app = TestApp::new();
    let admin = app.admin().await;
    app.customer().await;
    app.user("second@example.com", Role::Customer, AccountStatus::Inactive)
        .await;

    seed_products(&app, &[5, 9, 10, 11]).await;
    seed_order(&app, "JC-1", OrderStatus::Completed, Some(Decimal::new(3000, 2))).await;
    seed_order(&app, "JC-2", OrderStatus::Completed, Some(Decimal::new(1250, 2))).await;
    seed_order(&app, "JC-3", OrderStatus::Pending, Some(Decimal::new(9900, 2))).await;
    seed_order(&app, "JC-4", OrderStatus::Cancelled, Some(Decimal::new(500, 2))).await;

    let resp = app.get("/api/admin/dashboard", Some(&admin.token)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(
        resp.body,
        json!({
            "totalProducts": 4,
            "totalOrders": 4,
            "totalCustomers": 2,
            "totalRevenue": 42.5,
            "pendingOrders": 1,
            "lowStockProducts": 2,
        })
    );
}

#[tokio::test]
async fn test_dashboard_fails_when_store_is_down() {
    let app = TestApp::new();
    let admin = app.admin().await;
    assert_eq!(
        app.get("/api/admin/dashboard", Some(&admin.token)).await.status,
        StatusCode::OK
    );

    app.store.set_offline(true);
    let resp = app.get("/api/admin/dashboard", Some(&admin.token)).await;
    assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.error(), Some("Internal server error"));
}

#[tokio::test]
async fn test_counters() {
    let app = TestApp::new();
    let admin = app.admin().await;
    seed_products(&app, &[0, 3, 50]).await;
    seed_order(&app, "JC-7", OrderStatus::Pending, None).await;
    app.store
        .add_notification(NewNotification {
            kind: "order".to_string(),
            title: "New order JC-7".to_string(),
            message: None,
        })
        .await;

    let resp = app.get("/api/admin/counters", Some(&admin.token)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["lowStockProducts"], 2);
    assert_eq!(resp.body["pendingOrders"], 1);
    assert_eq!(resp.body["unreadNotifications"], 1);
    assert!(resp.body["refreshedAt"].is_string());
    assert!(app.state.counters().latest().is_some());
}

#[tokio::test]
async fn test_counters_served_from_last_snapshot() {
    let app = TestApp::new();
    let admin = app.admin().await;

    let first = app.get("/api/admin/counters", Some(&admin.token)).await;
    seed_products(&app, &[1]).await;

    // No refresh has run since, so the published snapshot is unchanged
    let second = app.get("/api/admin/counters", Some(&admin.token)).await;
    assert_eq!(first.body, second.body);
    assert_eq!(second.body["lowStockProducts"], 0);
}

#[tokio::test]
async fn test_migrate_stock_reports_summary() {
    let app = TestApp::new();
    let admin = app.admin().await;
    seed_products(&app, &[0, 4, 12]).await;

    for _ in 0..2 {
        let resp = app
            .post("/api/admin/migrate-stock", Some(&admin.token), json!({}))
            .await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(resp.body["success"], true);
        assert_eq!(resp.body["message"], "Stock tracking migration completed");
        assert_eq!(
            resp.body["summary"],
            json!({
                "totalProducts": 3,
                "totalStock": 16,
                "lowStockProducts": 2,
                "outOfStockProducts": 1,
            })
        );
    }
}
