use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("invalid digest encoding: {0}")]
    InvalidDigest(String),
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
