use bytes::Bytes;

use crate::error::TypeError;
use crate::id::HashId;

/// A committed hash record.
///
/// Entries are immutable once built. Cloning is cheap: the digest buffer is
/// reference counted and shared between the store and every reader.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    id: HashId,
    digest_len: u16,
    digest: Bytes,
}

impl Entry {
    /// Build an entry for `id` holding `digest`.
    ///
    /// Fails if the digest does not fit the 16-bit length field.
    pub fn new(id: HashId, digest: Bytes) -> Result<Self, TypeError> {
        let digest_len =
            u16::try_from(digest.len()).map_err(|_| TypeError::DigestTooLong(digest.len()))?;
        Ok(Self {
            id,
            digest_len,
            digest,
        })
    }

    pub fn id(&self) -> HashId {
        self.id
    }

    pub fn digest_len(&self) -> u16 {
        self.digest_len
    }

    /// The raw digest bytes. Transport encoding is left to the caller.
    pub fn digest(&self) -> &Bytes {
        &self.digest
    }
}
