//! HTTP protocol for Hashbank.
//!
//! Defines the endpoint paths and the JSON bodies exchanged between Hashbank
//! clients and the server, plus the base64 transport encoding for digests.

pub mod encoding;
pub mod endpoint;
pub mod error;
pub mod message;

pub use encoding::{decode_digest, encode_digest};
pub use endpoint::endpoints;
pub use error::{ProtocolError, ProtocolResult};
pub use message::{HashForm, HashIdResponse, HashResponse, StatsResponse};
