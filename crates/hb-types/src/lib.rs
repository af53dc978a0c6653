//! Foundation types for Hashbank.
//!
//! Every other Hashbank crate depends on `hb-types`.
//!
//! # Key Types
//!
//! - [`HashId`]: Sequential identifier issued for every submitted payload
//! - [`Entry`]: An immutable, committed (id, digest) record
//! - [`StatsSnapshot`]: Count of visible entries and their average latency

pub mod entry;
pub mod error;
pub mod id;
pub mod stats;

pub use entry::Entry;
pub use error::TypeError;
pub use id::HashId;
pub use stats::StatsSnapshot;
