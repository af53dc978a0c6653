/// Errors from digest configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CryptoError {
    #[error("unknown digest algorithm: {0}")]
    UnknownAlgorithm(String),
}
