//! Application state shared across handlers.

use std::sync::Arc;

use crate::backend::Backend;
use crate::error::AppError;
use crate::services::counters::CountersHub;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. The backend is optional: a
/// server started without backend credentials still answers health checks
/// and returns 503 from every data endpoint.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    backend: Option<Backend>,
    counters: CountersHub,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(backend: Option<Backend>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                backend,
                counters: CountersHub::new(),
            }),
        }
    }

    /// The configured backend.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotConfigured` when the server runs without one.
    pub fn backend(&self) -> Result<&Backend, AppError> {
        self.inner.backend.as_ref().ok_or(AppError::NotConfigured)
    }

    /// The configured backend, if any.
    #[must_use]
    pub fn backend_opt(&self) -> Option<&Backend> {
        self.inner.backend.as_ref()
    }

    /// Latest admin counters published by the refresh task.
    #[must_use]
    pub fn counters(&self) -> &CountersHub {
        &self.inner.counters
    }
}
