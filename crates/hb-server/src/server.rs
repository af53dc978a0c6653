use std::sync::Arc;

use hb_store::{HashStore, StoreError};
use tokio::net::TcpListener;
use tokio::sync::Notify;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Hashbank HTTP server.
pub struct HbServer {
    config: ServerConfig,
    state: AppState,
}

impl HbServer {
    /// Build the server and its (not yet started) hash store.
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let store = Arc::new(HashStore::new(config.store.clone())?);
        Ok(Self {
            state: AppState::new(store),
            config,
        })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<HashStore> {
        &self.state.store
    }

    /// Handle that stops the server when notified, like `POST /shutdown`.
    pub fn shutdown_handle(&self) -> Arc<Notify> {
        Arc::clone(&self.state.shutdown)
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Bind the configured address and serve until shutdown.
    pub async fn serve(self) -> ServerResult<()> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        self.serve_on(listener).await
    }

    /// Serve on an already bound listener.
    ///
    /// Stops on `POST /shutdown`, the shutdown handle, or Ctrl-C. Once the
    /// listener has stopped, the store is shut down and drained before this
    /// returns.
    pub async fn serve_on(self, listener: TcpListener) -> ServerResult<()> {
        self.state.store.start()?;

        let addr = listener.local_addr()?;
        tracing::info!("Hashbank server listening on {}", addr);

        let shutdown = Arc::clone(&self.state.shutdown);
        let app = build_router(self.state.clone());
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = shutdown.notified() => {}
                    _ = tokio::signal::ctrl_c() => {
                        tracing::info!("interrupt received");
                    }
                }
            })
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?;

        tracing::info!("Closing the server gracefully");
        match self.state.store.shutdown().await {
            Ok(()) | Err(StoreError::NotInitialized) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
