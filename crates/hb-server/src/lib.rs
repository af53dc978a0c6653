//! HTTP server for Hashbank.
//!
//! Exposes a [`HashStore`](hb_store::HashStore) over HTTP: submit payloads,
//! fetch their base64 digests once visible, read statistics, and request a
//! graceful shutdown.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::HbServer;
pub use state::AppState;
