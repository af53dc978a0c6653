use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};

use crate::error::CryptoError;

/// A pure payload-to-digest function.
///
/// Implementations must be total and deterministic: every payload, of any
/// length, maps to the same digest every time.
pub trait Digester: Send + Sync {
    /// The algorithm this digester implements.
    fn algorithm(&self) -> DigestAlgorithm;

    /// Hash `payload`.
    fn digest(&self, payload: &[u8]) -> Bytes;
}

/// Built-in digest algorithms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    /// SHA-512, 64-byte digests.
    #[default]
    Sha512,
    /// SHA-256, 32-byte digests.
    Sha256,
    /// BLAKE3, 32-byte digests.
    Blake3,
}

impl DigestAlgorithm {
    pub const ALL: [Self; 3] = [Self::Sha512, Self::Sha256, Self::Blake3];

    /// Length in bytes of the digests this algorithm produces.
    pub const fn digest_len(self) -> usize {
        match self {
            Self::Sha512 => 64,
            Self::Sha256 | Self::Blake3 => 32,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Sha512 => "sha512",
            Self::Sha256 => "sha256",
            Self::Blake3 => "blake3",
        }
    }
}

impl Digester for DigestAlgorithm {
    fn algorithm(&self) -> DigestAlgorithm {
        *self
    }

    fn digest(&self, payload: &[u8]) -> Bytes {
        match self {
            Self::Sha512 => Bytes::copy_from_slice(&Sha512::digest(payload)),
            Self::Sha256 => Bytes::copy_from_slice(&Sha256::digest(payload)),
            Self::Blake3 => Bytes::copy_from_slice(blake3::hash(payload).as_bytes()),
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|algo| algo.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| CryptoError::UnknownAlgorithm(s.to_string()))
    }
}

/// Hash `payload` and measure how long the computation took.
pub fn timed_digest(digester: &dyn Digester, payload: &[u8]) -> (Bytes, Duration) {
    let start = Instant::now();
    let digest = digester.digest(payload);
    (digest, start.elapsed())
}
