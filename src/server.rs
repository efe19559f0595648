//! HTTP server initialization and runtime setup.
//!
//! Handles store loading, writer spawning, prober construction, and the Axum
//! server lifecycle including graceful drain on SIGINT/SIGTERM.

use crate::application::services::LinkSetService;
use crate::config::Config;
use crate::domain::lifecycle::{DrainOutcome, Lifecycle};
use crate::infrastructure::persistence::{SnapshotFile, SnapshotStore};
use crate::infrastructure::probe::HttpProber;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// Runs the HTTP server with the given configuration until SIGINT or SIGTERM.
///
/// Initializes:
/// - Link set store from the snapshot file
/// - Background snapshot writer
/// - Pooled HTTP prober
/// - Axum HTTP server
///
/// # Shutdown
///
/// On SIGINT or SIGTERM the lifecycle switches to draining: new work gets 503
/// while admitted requests run to completion, bounded by
/// `SHUTDOWN_TIMEOUT_SECS`. The store is flushed before returning.
///
/// # Errors
///
/// Returns an error if:
/// - The prober client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    run_with_shutdown(config, shutdown_signal()).await
}

/// Like [`run`], but drains when `shutdown` resolves instead of on a signal.
///
/// `LISTEN` may name a host, which is resolved before binding.
pub async fn run_with_shutdown(
    config: Config,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let listener = TcpListener::bind(config.listen_addr.as_str())
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    serve_until(config, listener, shutdown).await
}

/// Serves on an already bound listener until `shutdown` resolves and the
/// drain finishes, then flushes the store.
pub async fn serve_until(
    config: Config,
    listener: TcpListener,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let file = SnapshotFile::new(config.storage_file.clone());
    let (store, worker) = SnapshotStore::open(file, config.snapshot_write_attempts).await;
    let store = Arc::new(store);
    tokio::spawn(worker.run());
    tracing::info!("Snapshot writer started");

    let prober = HttpProber::new(&config.prober_settings()).context("Failed to build HTTP client")?;
    let service = Arc::new(LinkSetService::new(
        Arc::new(prober),
        store.clone(),
        config.check_deadline(),
    ));

    let lifecycle = Arc::new(Lifecycle::new());
    let state = AppState::new(service, lifecycle.clone(), config.max_links_per_request);

    let app = app_router(state);

    let addr = listener.local_addr().context("Listener has no local address")?;
    tracing::info!("Listening on http://{addr}");

    let (drained_tx, drained_rx) = oneshot::channel();
    let ceiling = config.shutdown_timeout();

    let server = tokio::spawn(async move {
        axum::serve(
            listener,
            ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
        )
        .with_graceful_shutdown(drain_after(shutdown, lifecycle, ceiling, drained_tx))
        .await
    });

    match drained_rx.await {
        Ok(DrainOutcome::Completed) => server.await??,
        Ok(DrainOutcome::TimedOut { in_flight }) => {
            tracing::warn!(in_flight, "Abandoning remaining requests");
            server.abort();
        }
        // Server stopped before any shutdown signal arrived.
        Err(_) => server.await??,
    }

    match store.flush().await {
        Ok(()) => tracing::info!("Link sets flushed to disk"),
        Err(e) => tracing::error!(error = %e, "Final snapshot write failed"),
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolves once the drain after `shutdown` has finished.
async fn drain_after(
    shutdown: impl Future<Output = ()>,
    lifecycle: Arc<Lifecycle>,
    ceiling: Duration,
    drained: oneshot::Sender<DrainOutcome>,
) {
    shutdown.await;
    tracing::info!(
        in_flight = lifecycle.in_flight(),
        "Shutdown signal received, draining"
    );

    let outcome = lifecycle.drain(ceiling).await;
    let _ = drained.send(outcome);
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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
