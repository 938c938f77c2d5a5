//! Login, logout and `/api/auth/me`.

use axum::http::{Method, StatusCode};
use serde_json::json;

use juliecraft_core::{AccountStatus, Role};
use juliecraft_integration_tests::{PASSWORD, TestApp, send};

#[tokio::test]
async fn test_login_returns_token_and_user() {
    let app = TestApp::new();
    let admin = app.admin().await;

    let resp = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "Staff@JulieCraft.shop", "password": PASSWORD }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["message"], "Login successful");
    assert_eq!(resp.body["user"]["id"], admin.id.to_string());
    assert_eq!(resp.body["user"]["email"], admin.email.as_str());
    assert_eq!(resp.body["user"]["role"], "admin");
    assert_eq!(resp.body["user"]["isAdmin"], true);

    // The issued token works on admin routes
    let token = resp.body["token"].as_str().unwrap_or_default().to_string();
    assert!(!token.is_empty());
    let resp = app.get("/api/admin/dashboard", Some(&token)).await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_without_profile_is_customer() {
    let app = TestApp::new();
    app.user_without_profile("new@example.com").await;

    let resp = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "new@example.com", "password": PASSWORD }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["user"]["role"], "customer");
    assert_eq!(resp.body["user"]["isAdmin"], false);
}

#[tokio::test]
async fn test_login_inactive_account_still_signs_in() {
    let app = TestApp::new();
    app.user("paused@example.com", Role::Admin, AccountStatus::Inactive)
        .await;

    let resp = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "paused@example.com", "password": PASSWORD }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = TestApp::new();
    app.customer().await;

    for email in ["shopper@example.com", "nobody@example.com"] {
        let resp = app
            .post(
                "/api/auth/login",
                None,
                json!({ "email": email, "password": "wrong" }),
            )
            .await;
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
        assert_eq!(resp.error(), Some("Invalid email or password"));
    }
}

#[tokio::test]
async fn test_login_validation() {
    let app = TestApp::new();

    for body in [
        json!({ "email": "shopper@example.com" }),
        json!({ "password": PASSWORD }),
        json!({ "email": "shopper@example.com", "password": "" }),
    ] {
        let resp = app.post("/api/auth/login", None, body).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.error(), Some("Email and password are required"));
    }

    let resp = app
        .post(
            "/api/auth/login",
            None,
            json!({ "email": "no-at-sign", "password": PASSWORD }),
        )
        .await;
    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error(), Some("Invalid email address"));
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = TestApp::new();
    let customer = app.customer().await;

    let resp = app.get("/api/auth/me", Some(&customer.token)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["email"], "shopper@example.com");

    let resp = app
        .post("/api/auth/logout", Some(&customer.token), json!({}))
        .await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["message"], "Logged out successfully");

    let resp = app.get("/api/auth/me", Some(&customer.token)).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_always_succeeds() {
    let app = TestApp::new();

    let resp = app.post("/api/auth/logout", None, json!({})).await;
    assert_eq!(resp.status, StatusCode::OK);

    let resp = app
        .post("/api/auth/logout", Some("already-gone"), json!({}))
        .await;
    assert_eq!(resp.status, StatusCode::OK);

    let resp = send(
        TestApp::unconfigured(),
        Method::POST,
        "/api/auth/logout",
        Some("anything"),
        None,
    )
    .await;
    assert_eq!(resp.status, StatusCode::OK);
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = TestApp::new();
    let resp = app.get("/api/auth/me", None).await;
    assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
}
