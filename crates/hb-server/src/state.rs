use std::sync::Arc;

use hb_store::HashStore;
use tokio::sync::Notify;

/// Shared state handed to every handler.
#[derive(Clone, Debug)]
pub struct AppState {
    pub store: Arc<HashStore>,
    /// Signalled by `POST /shutdown`; the server stops accepting connections.
    pub shutdown: Arc<Notify>,
}

impl AppState {
    pub fn new(store: Arc<HashStore>) -> Self {
        Self {
            store,
            shutdown: Arc::new(Notify::new()),
        }
    }
}
