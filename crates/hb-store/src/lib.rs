//! Concurrent hash store for Hashbank.
//!
//! Payloads submitted with [`HashStore::put`] receive an id immediately. The
//! digest is computed by a worker pool in the background and committed by a
//! single writer task, which owns the entry map outright.
//!
//! # Pipeline
//!
//! ```text
//! put ──▶ IdAllocator ──▶ job queue ──▶ WorkerPool (N) ──▶ WriterHandle ──▶ StoreWriter
//!                                          hash + time      commit + ack     settle timer
//!                                                                              │
//!                              get / stats ◀── visible entries, StatsCell ◀────┘
//! ```
//!
//! # Design Rules
//!
//! 1. Ids are issued in strictly increasing order with no gaps.
//! 2. `put` never waits on hashing; an overloaded queue rejects instead.
//! 3. Only the writer mutates the entry map. There is no lock around it.
//! 4. An entry is visible only after its settling delay has elapsed and its
//!    id is no greater than the settled count. "Still processing" and "never
//!    submitted" look the same to readers.
//! 5. Settling is a timer polled by the writer, never a blocking sleep.
//! 6. Statistics are read lock-free and may be momentarily inconsistent.

pub mod allocator;
pub mod config;
pub mod error;
pub mod stats;
pub mod store;
pub mod worker;
pub mod writer;

pub use allocator::IdAllocator;
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use stats::{RunningMean, StatsCell};
pub use store::HashStore;
pub use worker::{PendingJob, WorkerPool};
pub use writer::{CompletionRecord, WriterHandle};
