//! Digest functions for Hashbank.
//!
//! A digest function is a pure, total mapping from a payload to a fixed-length
//! byte string. The store treats it as pluggable through the [`Digester`]
//! trait; [`DigestAlgorithm`] provides the built-in implementations.

pub mod error;
pub mod hasher;

pub use error::CryptoError;
pub use hasher::{timed_digest, DigestAlgorithm, Digester};
