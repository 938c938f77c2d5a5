//! JulieCraft API server.
//!
//! Serves the storefront and admin JSON API on port 3000. Products, orders,
//! carts and profiles live in `PostgreSQL`; sign-in and token checks are
//! delegated to the hosted identity provider.
//!
//! Without backend credentials the server still starts and answers `/health`,
//! but every data endpoint returns 503.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use juliecraft_server::config::ServerConfig;
use juliecraft_server::identity::RemoteIdentityProvider;
use juliecraft_server::services::counters::spawn_refresher;
use juliecraft_server::{AppState, Backend, db};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ServerConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = ServerConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crate if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "juliecraft_server=info,tower_http=debug".into());

    let fmt_layer = if config.log_json {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if config.sentry_dsn.is_some() {
        tracing::info!("Sentry initialized");
    }

    // NOTE: Migrations are NOT run automatically on startup.
    // Run them explicitly via: cargo run -p juliecraft-cli -- migrate
    let state = match &config.backend {
        Some(backend_config) => {
            let pool = db::create_pool(&backend_config.database_url)
                .await
                .expect("Failed to create database pool");
            tracing::info!("Database pool created");

            let identity = RemoteIdentityProvider::new(backend_config)
                .expect("Failed to create identity provider client");
            let backend = Backend::postgres(pool, Arc::new(identity));
            let state = AppState::new(Some(backend.clone()));

            spawn_refresher(state.clone(), backend, config.counters_refresh);
            tracing::info!(
                every_secs = config.counters_refresh.as_secs(),
                "Admin counters refresh started"
            );
            state
        }
        None => {
            tracing::warn!("Backend not configured; data endpoints will return 503");
            AppState::new(None)
        }
    };

    let app = juliecraft_server::app(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction());

    let addr = config.socket_addr();
    tracing::info!("juliecraft-server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
