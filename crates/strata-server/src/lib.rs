//! Strata Server - HTTP host for the snapshot diff service
//!
//! Routes:
//! - `GET /api/reconstructions/diff?from=&to=`
//! - `GET /api/metrics/basic`

use std::sync::Arc;

use anyhow::Context;
use axum::{routing::get, Router};
use tokio::{net::TcpListener, signal};
use tracing::info;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use config::ServerConfig;
use routes::{diff_handler, metrics_handler};
use state::AppState;
use strata_engine::SqliteSource;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/reconstructions/diff", get(diff_handler))
        .route("/api/metrics/basic", get(metrics_handler))
        .with_state(state)
}

/// Open the store, bind, and serve until a shutdown signal arrives
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the address cannot be bound.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    info!(path = %config.database.path.display(), "Opening database");
    let source = SqliteSource::open(&config.database.path)
        .with_context(|| format!("opening {}", config.database.path.display()))?;

    let state = AppState::new(source, config.cache_capacity()?);
    let app = router(state);

    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
