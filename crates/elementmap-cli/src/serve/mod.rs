//! HTTP endpoint for the control panel element map panel.
//!
//! # Module Structure
//!
//! - `handlers` - route handlers and the error-to-response mapping
//! - `models` - query and response types
//!
//! Each request opens its own read-only store connection on a blocking
//! worker; nothing is cached between requests.

mod handlers;
mod models;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::http::Method;
use axum::{Router, routing::get};
use elementmap_core::config::MapConfig;
use elementmap_core::db::SqliteStore;
use elementmap_core::{ElementMap, ElementMapper, StoreError};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use handlers::AppError;

// =============================================================================
// Application State
// =============================================================================

/// Shared, read-only state for every request.
pub struct AppState {
    pub store_path: PathBuf,
    pub config: MapConfig,
}

impl AppState {
    fn open_store(&self) -> Result<SqliteStore, StoreError> {
        SqliteStore::open(&self.store_path, &self.config.store.table_prefix)
    }

    /// Open a fresh connection and resolve one element map.
    fn resolve(&self, id: i64) -> Result<ElementMap, AppError> {
        let store = self.open_store()?;
        Ok(ElementMapper::from_config(&store, &self.config).element_map(id)?)
    }
}

// =============================================================================
// Server
// =============================================================================

/// Configuration for `elementmap serve`.
pub struct ServeConfig {
    pub host: String,
    pub port: u16,
    pub store_path: PathBuf,
    pub map: MapConfig,
}

/// Build the router with every route and the CORS layer.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/actions/elementMap/getElementMap", get(handlers::element_map))
        .route("/api/element-map", get(handlers::element_map))
        .route("/health", get(handlers::health))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET]),
        )
        .with_state(state)
}

/// Bind and serve until Ctrl+C.
pub async fn start_server(config: ServeConfig) -> anyhow::Result<()> {
    if !config.store_path.exists() {
        warn!(
            store = %config.store_path.display(),
            "content store does not exist yet; requests will fail until it does"
        );
    }

    let state = Arc::new(AppState {
        store_path: config.store_path,
        config: config.map,
    });

    let listener = TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?;
    let addr = listener.local_addr()?;
    info!(%addr, store = %state.store_path.display(), "serving element maps");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("element map server failed")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "could not install Ctrl+C handler; serving until killed");
        std::future::pending::<()>().await;
    }
}
