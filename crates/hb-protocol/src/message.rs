use hb_types::{Entry, HashId, StatsSnapshot};
use serde::{Deserialize, Serialize};

use crate::encoding::encode_digest;

/// Form body of `POST /hash`. A missing field decodes as an empty payload.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct HashForm {
    #[serde(default)]
    pub password: String,
}

/// Response to `POST /hash`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashIdResponse {
    pub id: HashId,
}

/// Response to `GET /hash/{id}`: the digest in base64.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashResponse {
    pub id: HashId,
    pub hash: String,
}

impl From<&Entry> for HashResponse {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id(),
            hash: encode_digest(entry.digest()),
        }
    }
}

/// Response to `GET /stats`. `average` is in microseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total: u64,
    pub average: u64,
}

impl From<StatsSnapshot> for StatsResponse {
    fn from(stats: StatsSnapshot) -> Self {
        Self {
            total: stats.count,
            average: stats.average_micros(),
        }
    }
}
