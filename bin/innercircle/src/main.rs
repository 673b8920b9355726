//! # InnerCircle Binary
//!
//! The entry point that assembles the application from the compiled-in plugins.

use anyhow::Context;
use ic_api::{build_router, AppState};
use ic_config::{LogFormat, LogSettings, Settings};
use ic_core::AuthProvider;
use ic_services::Services;
use secrecy::ExposeSecret;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "db-sqlite")]
use ic_db_sqlite::SqliteStore;

#[cfg(feature = "auth-simple")]
use ic_auth_simple::SimpleAuthProvider;

#[cfg(not(all(feature = "db-sqlite", feature = "auth-simple")))]
compile_error!("innercircle needs a store and an auth provider: enable `db-sqlite` and `auth-simple`");

/// `RUST_LOG` wins over the configured filter.
fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading configuration")?;
    init_tracing(&settings.log);
    tracing::debug!(path = %Settings::file_path(), "configuration loaded");

    // 1. Store
    let store = SqliteStore::connect(&settings.database.url, settings.database.max_connections)
        .await
        .context("opening database")?;

    // 2. Auth
    let auth: Arc<dyn AuthProvider> = Arc::new(SimpleAuthProvider::new());

    // 3. Services and web state
    let services = Arc::new(Services::new(Arc::new(store), auth));
    let state = AppState::new(
        services,
        settings.session.secret.expose_secret().as_bytes(),
        settings.session.cookie_secure,
    );

    let address = settings.server.address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    tracing::info!(%address, "InnerCircle listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}
