//! Server lifecycle — bind, serve, graceful shutdown.
//!
//! Pattern: bind → spawn background task → return handle with shutdown
//! channel, so callers (and tests) control the lifetime explicitly.

use std::net::SocketAddr;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::router::analyzer_router;
use crate::api::types::ApiContext;

/// Handle to a running analyzer server.
pub struct AnalyzerServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl AnalyzerServer {
    /// Signal the server to stop accepting connections. Idempotent.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("analyzer server shutdown signal sent");
        }
    }

    /// Signal shutdown and wait for the serve task to finish.
    pub async fn shutdown_and_wait(mut self) {
        self.shutdown();
        let _ = self.task.await;
    }
}

/// Bind `addr` and serve the analyzer API in a background task.
///
/// Accepts `127.0.0.1:0` so tests can grab an ephemeral port; the bound
/// address is reported on the returned handle.
pub async fn start(ctx: ApiContext, addr: SocketAddr) -> Result<AnalyzerServer, std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let addr = listener.local_addr()?;

    let app = analyzer_router(ctx);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("analyzer server received shutdown signal");
        };

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("analyzer server error: {e}");
        }

        tracing::info!("analyzer server stopped");
    });

    tracing::info!(%addr, "analyzer server started");

    Ok(AnalyzerServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}
