//! Integration tests for the JulieCraft API.
//!
//! Each test builds the full router over the in-memory store and identity
//! provider and drives it with `tower::ServiceExt::oneshot`, so no database,
//! identity service or listening socket is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p juliecraft-integration-tests
//! ```

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use juliecraft_core::{AccountStatus, Email, ProfileId, Role};
use juliecraft_server::db::MemoryStore;
use juliecraft_server::identity::MemoryIdentityProvider;
use juliecraft_server::models::Profile;
use juliecraft_server::{AppState, Backend};

/// Password given to every seeded account.
pub const PASSWORD: &str = "granny-squares-4-ever";

/// A router over in-memory storage, plus handles to seed it.
pub struct TestApp {
    pub store: Arc<MemoryStore>,
    pub identity: Arc<MemoryIdentityProvider>,
    pub state: AppState,
    router: Router,
}

/// A seeded account and a live bearer token for it.
pub struct TestUser {
    pub id: ProfileId,
    pub email: Email,
    pub token: String,
}

/// Status and parsed JSON body (`Null` when the body is not JSON).
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestResponse {
    /// The `error` field of an error body.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.body["error"].as_str()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let identity = Arc::new(MemoryIdentityProvider::new());
        let backend = Backend::in_memory(store.clone(), identity.clone());
        let state = AppState::new(Some(backend));
        let router = juliecraft_server::app(state.clone());
        Self {
            store,
            identity,
            state,
            router,
        }
    }

    /// A router with no backend, as when credentials are missing.
    #[must_use]
    pub fn unconfigured() -> Router {
        juliecraft_server::app(AppState::new(None))
    }

    /// Register an account, store its profile, and sign it in.
    ///
    /// # Panics
    ///
    /// Panics if the email is invalid or already registered.
    pub async fn user(&self, email: &str, role: Role, status: AccountStatus) -> TestUser {
        let email = Email::parse(email).expect("valid test email");
        let id = self
            .identity
            .register(&email, PASSWORD)
            .await
            .expect("register test account");
        self.store
            .put_profile(
                Profile::customer(id, email.clone())
                    .with_role(role)
                    .with_status(status),
            )
            .await;
        let token = self.identity.issue_token(id).await.expect("issue token");
        TestUser { id, email, token }
    }

    /// An account with a token but no profile row.
    ///
    /// # Panics
    ///
    /// Panics if the email is invalid or already registered.
    pub async fn user_without_profile(&self, email: &str) -> TestUser {
        let email = Email::parse(email).expect("valid test email");
        let id = self
            .identity
            .register(&email, PASSWORD)
            .await
            .expect("register test account");
        let token = self.identity.issue_token(id).await.expect("issue token");
        TestUser { id, email, token }
    }

    pub async fn admin(&self) -> TestUser {
        self.user("staff@juliecraft.shop", Role::Admin, AccountStatus::Active)
            .await
    }

    pub async fn super_admin(&self) -> TestUser {
        self.user("julie@juliecraft.shop", Role::SuperAdmin, AccountStatus::Active)
            .await
    }

    pub async fn customer(&self) -> TestUser {
        self.user("shopper@example.com", Role::Customer, AccountStatus::Active)
            .await
    }

    /// Send a request through the router.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        send(self.router.clone(), method, uri, token, body).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> TestResponse {
        self.request(Method::PATCH, uri, token, Some(body)).await
    }
}

/// Send one request to any router.
///
/// # Panics
///
/// Panics if the request cannot be built or the body cannot be read.
pub async fn send(
    router: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");

    let response = router.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    TestResponse { status, body }
}
