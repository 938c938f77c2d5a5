//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. Errors render as
//! `{"error": "...", "details": "..."}` with `details` omitted when empty;
//! server-side failures are captured to Sentry and never leak internals.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::identity::{BearerError, IdentityError};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// The server was started without backend credentials.
    #[error("Backend not configured")]
    NotConfigured,

    /// Bad request from client.
    #[error("Bad request: {message}")]
    BadRequest {
        message: String,
        details: Option<String>,
    },

    /// Missing or unusable credentials.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Email/password pair rejected by the identity provider.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Authenticated, but not allowed to do this.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Identity provider failed in a way that is not the caller's fault.
    #[error("Identity provider error: {0}")]
    Identity(#[source] IdentityError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// 400 with a message and no details.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            details: None,
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Identity(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::InvalidToken => Self::Unauthorized("Invalid or expired token".to_string()),
            IdentityError::InvalidCredentials => Self::InvalidCredentials,
            other => Self::Identity(other),
        }
    }
}

impl From<BearerError> for AppError {
    fn from(err: BearerError) -> Self {
        Self::Unauthorized(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest {
            message: "Invalid request body".to_string(),
            details: Some(rejection.body_text()),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest {
            message: "Invalid query string".to_string(),
            details: Some(rejection.body_text()),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest {
            message: "Invalid path parameter".to_string(),
            details: Some(rejection.body_text()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Database(_) | Self::Internal(_) | Self::Identity(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let body = match self {
            Self::NotConfigured => ErrorBody {
                error: "Backend not configured".to_string(),
                details: None,
            },
            Self::BadRequest { message, details } => ErrorBody {
                error: message,
                details,
            },
            Self::Unauthorized(message) | Self::Forbidden(message) | Self::NotFound(message) => {
                ErrorBody {
                    error: message,
                    details: None,
                }
            }
            Self::InvalidCredentials => ErrorBody {
                error: "Invalid email or password".to_string(),
                details: None,
            },
            Self::Identity(_) => ErrorBody {
                error: "Authentication service error".to_string(),
                details: None,
            },
            Self::Database(_) | Self::Internal(_) => ErrorBody {
                error: "Internal server error".to_string(),
                details: None,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context after successful authentication.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}
