use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hash id: {0:?}")]
    InvalidId(String),

    #[error("hash id must be non-zero")]
    ZeroId,

    #[error("digest too long: {0} bytes")]
    DigestTooLong(usize),
}
