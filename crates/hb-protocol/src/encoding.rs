use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{ProtocolError, ProtocolResult};

/// Encode digest bytes for transport (standard alphabet, padded).
pub fn encode_digest(digest: &[u8]) -> String {
    STANDARD.encode(digest)
}

/// Decode a digest produced by [`encode_digest`].
pub fn decode_digest(encoded: &str) -> ProtocolResult<Vec<u8>> {
    STANDARD
        .decode(encoded)
        .map_err(|e| ProtocolError::InvalidDigest(e.to_string()))
}
