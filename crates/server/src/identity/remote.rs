//! Client for the hosted backend's auth API.
//!
//! Three calls are used: `GET /auth/v1/user` to resolve a token,
//! `POST /auth/v1/token?grant_type=password` to sign in, and
//! `POST /auth/v1/logout` to revoke. Every request carries the project's
//! anon key in the `apikey` header.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use serde::Deserialize;
use url::Url;
use uuid::Uuid;

use juliecraft_core::{Email, ProfileId};

use super::{Identity, IdentityError, IdentityProvider, SignIn};
use crate::config::BackendConfig;

/// Identity provider backed by the hosted auth API.
#[derive(Clone)]
pub struct RemoteIdentityProvider {
    client: Client,
    base: Url,
}

#[derive(Deserialize)]
struct ProviderUser {
    id: Uuid,
    email: Option<String>,
}

impl From<ProviderUser> for Identity {
    fn from(user: ProviderUser) -> Self {
        Self {
            id: ProfileId::new(user.id),
            // The provider may hold addresses we would not accept; drop those
            email: user.email.and_then(|e| Email::parse(&e).ok()),
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: ProviderUser,
}

impl RemoteIdentityProvider {
    /// Build a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::InvalidResponse` if the URL or anon key
    /// cannot be used, or `IdentityError::Http` if the client fails to build.
    pub fn new(config: &BackendConfig) -> Result<Self, IdentityError> {
        let mut base = Url::parse(&config.url)
            .map_err(|e| IdentityError::InvalidResponse(format!("invalid backend URL: {e}")))?;
        // Url::join replaces the last segment unless the base ends in '/'
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        let mut headers = HeaderMap::new();
        let mut api_key = HeaderValue::from_str(config.anon_key.expose_secret())
            .map_err(|_| IdentityError::InvalidResponse("anon key is not a valid header".into()))?;
        api_key.set_sensitive(true);
        headers.insert("apikey", api_key);

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, IdentityError> {
        self.base
            .join(path)
            .map_err(|e| IdentityError::InvalidResponse(format!("invalid endpoint {path}: {e}")))
    }
}

/// Turn a non-success response into an `Upstream` error with its body.
async fn upstream_error(response: reqwest::Response) -> IdentityError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    IdentityError::Upstream { status, message }
}

#[async_trait]
impl IdentityProvider for RemoteIdentityProvider {
    #[tracing::instrument(skip_all)]
    async fn verify_token(&self, token: &str) -> Result<Identity, IdentityError> {
        let response = self
            .client
            .get(self.endpoint("auth/v1/user")?)
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let user: ProviderUser = response
                    .json()
                    .await
                    .map_err(|e| IdentityError::InvalidResponse(e.to_string()))?;
                Ok(user.into())
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                Err(IdentityError::InvalidToken)
            }
            _ => Err(upstream_error(response).await),
        }
    }

    #[tracing::instrument(skip(self, password), fields(email = %email))]
    async fn sign_in(&self, email: &Email, password: &str) -> Result<SignIn, IdentityError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.set_query(Some("grant_type=password"));

        let response = self
            .client
            .post(url)
            .json(&serde_json::json!({
                "email": email.as_str(),
                "password": password,
            }))
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                let body: TokenResponse = response
                    .json()
                    .await
                    .map_err(|e| IdentityError::InvalidResponse(e.to_string()))?;
                Ok(SignIn {
                    identity: body.user.into(),
                    access_token: body.access_token,
                })
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                Err(IdentityError::InvalidCredentials)
            }
            _ => Err(upstream_error(response).await),
        }
    }

    #[tracing::instrument(skip_all)]
    async fn sign_out(&self, token: &str) -> Result<(), IdentityError> {
        let response = self
            .client
            .post(self.endpoint("auth/v1/logout")?)
            .bearer_auth(token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(IdentityError::InvalidToken),
            _ => Err(upstream_error(response).await),
        }
    }
}
