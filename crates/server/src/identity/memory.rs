//! In-process identity provider.

use std::collections::HashMap;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use tokio::sync::RwLock;

use juliecraft_core::{Email, ProfileId};

use super::{Identity, IdentityError, IdentityProvider, SignIn};

struct Account {
    id: ProfileId,
    email: Email,
    password_hash: String,
}

/// Identity provider holding accounts and issued tokens in memory.
///
/// Tokens are 32 random bytes, URL-safe base64, valid until signed out.
#[derive(Default)]
pub struct MemoryIdentityProvider {
    accounts: RwLock<HashMap<Email, Account>>,
    tokens: RwLock<HashMap<String, ProfileId>>,
}

impl MemoryIdentityProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an account with a password.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::UserAlreadyExists` if the email is taken, or
    /// `IdentityError::PasswordHash` if hashing fails.
    pub async fn register(&self, email: &Email, password: &str) -> Result<ProfileId, IdentityError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(email) {
            return Err(IdentityError::UserAlreadyExists);
        }

        let id = ProfileId::random();
        accounts.insert(
            email.clone(),
            Account {
                id,
                email: email.clone(),
                password_hash: hash_password(password)?,
            },
        );
        Ok(id)
    }

    /// Issue a token for a known account without checking a password.
    ///
    /// Returns `None` when no account has `id`.
    pub async fn issue_token(&self, id: ProfileId) -> Option<String> {
        let known = self.accounts.read().await.values().any(|a| a.id == id);
        if !known {
            return None;
        }
        Some(self.mint(id).await)
    }

    async fn mint(&self, id: ProfileId) -> String {
        let mut bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut bytes);
        let token = URL_SAFE_NO_PAD.encode(bytes);
        self.tokens.write().await.insert(token.clone(), id);
        token
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<Identity, IdentityError> {
        let id = *self
            .tokens
            .read()
            .await
            .get(token)
            .ok_or(IdentityError::InvalidToken)?;

        let email = self
            .accounts
            .read()
            .await
            .values()
            .find(|a| a.id == id)
            .map(|a| a.email.clone());
        Ok(Identity { id, email })
    }

    async fn sign_in(&self, email: &Email, password: &str) -> Result<SignIn, IdentityError> {
        let (id, password_hash) = {
            let accounts = self.accounts.read().await;
            let account = accounts
                .get(email)
                .ok_or(IdentityError::InvalidCredentials)?;
            (account.id, account.password_hash.clone())
        };

        verify_password(password, &password_hash)?;

        Ok(SignIn {
            identity: Identity {
                id,
                email: Some(email.clone()),
            },
            access_token: self.mint(id).await,
        })
    }

    async fn sign_out(&self, token: &str) -> Result<(), IdentityError> {
        self.tokens
            .write()
            .await
            .remove(token)
            .map(|_| ())
            .ok_or(IdentityError::InvalidToken)
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> Result<String, IdentityError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| IdentityError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), IdentityError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| IdentityError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| IdentityError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn email() -> Email {
        Email::parse("julie@juliecraft.shop").unwrap()
    }

    #[tokio::test]
    async fn test_sign_in_and_verify() {
        let provider = MemoryIdentityProvider::new();
        let id = provider.register(&email(), "yarn-and-hooks").await.unwrap();

        let signed_in = provider.sign_in(&email(), "yarn-and-hooks").await.unwrap();
        assert_eq!(signed_in.identity.id, id);

        let identity = provider.verify_token(&signed_in.access_token).await.unwrap();
        assert_eq!(identity.id, id);
        assert_eq!(identity.email, Some(email()));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email() {
        let provider = MemoryIdentityProvider::new();
        provider.register(&email(), "yarn-and-hooks").await.unwrap();

        assert!(matches!(
            provider.sign_in(&email(), "wrong").await,
            Err(IdentityError::InvalidCredentials)
        ));
        let stranger = Email::parse("nobody@juliecraft.shop").unwrap();
        assert!(matches!(
            provider.sign_in(&stranger, "yarn-and-hooks").await,
            Err(IdentityError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_registration_rejected() {
        let provider = MemoryIdentityProvider::new();
        provider.register(&email(), "first").await.unwrap();
        assert!(matches!(
            provider.register(&email(), "second").await,
            Err(IdentityError::UserAlreadyExists)
        ));
    }

    #[tokio::test]
    async fn test_sign_out_revokes_token() {
        let provider = MemoryIdentityProvider::new();
        let id = provider.register(&email(), "pw").await.unwrap();
        let token = provider.issue_token(id).await.unwrap();

        provider.sign_out(&token).await.unwrap();
        assert!(matches!(
            provider.verify_token(&token).await,
            Err(IdentityError::InvalidToken)
        ));
        assert!(provider.sign_out(&token).await.is_err());
    }

    #[tokio::test]
    async fn test_issue_token_unknown_account() {
        let provider = MemoryIdentityProvider::new();
        assert!(provider.issue_token(ProfileId::random()).await.is_none());
    }
}
