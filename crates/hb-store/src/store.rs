use std::sync::{Arc, RwLock};

use hb_crypto::Digester;
use hb_types::{Entry, HashId, StatsSnapshot};
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};

use crate::allocator::IdAllocator;
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::stats::StatsCell;
use crate::worker::{PendingJob, WorkerPool};
use crate::writer::WriterHandle;

/// Lifecycle of a store: `Idle -> Running -> Stopped -> Running ...`.
enum Lifecycle {
    Idle,
    Running {
        jobs: mpsc::Sender<PendingJob>,
        pool: WorkerPool,
        writer: WriterHandle,
    },
    /// Not accepting jobs. The writer stays up so lookups keep working.
    Stopped { writer: WriterHandle },
}

impl Lifecycle {
    fn writer(&self) -> Option<&WriterHandle> {
        match self {
            Self::Idle => None,
            Self::Running { writer, .. } | Self::Stopped { writer } => Some(writer),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running { .. } => "running",
            Self::Stopped { .. } => "stopped",
        }
    }
}

/// Concurrent store of payload digests.
///
/// `put` hands out an id immediately and hashes in the background; the
/// resulting entry becomes readable through `get` only once its settling
/// delay has elapsed. Stores are independent objects: any number can coexist
/// in one process.
pub struct HashStore {
    config: StoreConfig,
    digester: Arc<dyn Digester>,
    ids: IdAllocator,
    stats: Arc<StatsCell>,
    state: RwLock<Lifecycle>,
}

impl HashStore {
    /// Create a store hashing with `config.algorithm`. Call [`start`](Self::start)
    /// before submitting payloads.
    pub fn new(config: StoreConfig) -> StoreResult<Self> {
        let digester = Arc::new(config.algorithm);
        Self::with_digester(config, digester)
    }

    /// Create a store with a custom digest function. `config.algorithm` is
    /// ignored.
    pub fn with_digester(config: StoreConfig, digester: Arc<dyn Digester>) -> StoreResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            digester,
            ids: IdAllocator::new(),
            stats: Arc::new(StatsCell::new()),
            state: RwLock::new(Lifecycle::Idle),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Spawn the writer and the worker pool on the current tokio runtime.
    ///
    /// A stopped store can be started again; it keeps its entries, ids and
    /// statistics.
    pub fn start(&self) -> StoreResult<()> {
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(StoreError::NoRuntime);
        }

        let mut state = self.state.write().expect("lock poisoned");
        let writer = match &*state {
            Lifecycle::Running { .. } => {
                warn!("hash store start requested, but it is already running");
                return Err(StoreError::AlreadyInitialized);
            }
            Lifecycle::Idle => WriterHandle::spawn(
                self.config.writer_capacity,
                self.config.settle_delay(),
                Arc::clone(&self.stats),
            ),
            Lifecycle::Stopped { writer } => writer.clone(),
        };

        let (jobs, queue) = mpsc::channel(self.config.queue_capacity);
        let pool = WorkerPool::spawn(
            self.config.pool_size,
            queue,
            Arc::clone(&self.digester),
            writer.clone(),
        );
        *state = Lifecycle::Running { jobs, pool, writer };

        info!(
            pool_size = self.config.pool_size,
            queue_capacity = self.config.queue_capacity,
            settle_delay_ms = self.config.settle_delay_ms,
            algorithm = %self.digester.algorithm(),
            "hash store started"
        );
        Ok(())
    }

    /// Queue `payload` for hashing and return its id without waiting.
    ///
    /// The entry is not retrievable until it has been hashed and settled.
    /// A rejected call does not consume an id.
    pub fn put(&self, payload: impl Into<String>) -> StoreResult<HashId> {
        let state = self.state.read().expect("lock poisoned");
        let Lifecycle::Running { jobs, .. } = &*state else {
            return Err(StoreError::NotInitialized);
        };

        // Reserve the queue slot first so a full queue never burns an id.
        let permit = jobs.try_reserve().map_err(|e| match e {
            TrySendError::Full(()) => StoreError::QueueFull {
                capacity: self.config.queue_capacity,
            },
            TrySendError::Closed(()) => StoreError::NotInitialized,
        })?;
        let id = self.ids.allocate();
        permit.send(PendingJob {
            id,
            payload: payload.into(),
        });

        debug!(%id, "queued hash job");
        Ok(id)
    }

    /// Fetch a visible entry.
    ///
    /// Returns `None` for ids that were never issued, are still being hashed,
    /// have not settled yet, or lie above the settled count; these cases are
    /// indistinguishable.
    pub async fn get(&self, id: HashId) -> Option<Entry> {
        if id.get() > self.ids.issued() {
            return None;
        }
        let writer = self.state.read().expect("lock poisoned").writer().cloned()?;
        match writer.lookup(id).await {
            Ok(entry) => entry,
            Err(e) => {
                warn!(%id, error = %e, "hash lookup failed");
                None
            }
        }
    }

    /// Visible entry count and mean digest latency.
    ///
    /// Lock-free; the two values may be from slightly different moments.
    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    /// Number of ids issued so far.
    pub fn issued(&self) -> u64 {
        self.ids.issued()
    }

    pub fn is_running(&self) -> bool {
        matches!(*self.state.read().expect("lock poisoned"), Lifecycle::Running { .. })
    }

    /// Stop accepting jobs and drain.
    ///
    /// Every job queued before this call is hashed and committed, and every
    /// committed entry is allowed to settle before this returns. Lookups keep
    /// working afterwards. Calling it on a store that is not running logs a
    /// warning, changes nothing and returns [`StoreError::NotInitialized`].
    pub async fn shutdown(&self) -> StoreResult<()> {
        let (pool, writer) = {
            let mut state = self.state.write().expect("lock poisoned");
            match std::mem::replace(&mut *state, Lifecycle::Idle) {
                Lifecycle::Running { jobs, pool, writer } => {
                    drop(jobs);
                    *state = Lifecycle::Stopped {
                        writer: writer.clone(),
                    };
                    (pool, writer)
                }
                other => {
                    warn!(state = other.name(), "hash store shutdown requested, but it is not running");
                    *state = other;
                    return Err(StoreError::NotInitialized);
                }
            }
        };

        info!(workers = pool.len(), "closing hash queue");
        let processed = pool.join().await;
        writer.drain().await?;

        let stats = self.stats();
        info!(
            processed,
            issued = self.issued(),
            available = stats.count,
            "hash store shut down"
        );
        Ok(())
    }
}

impl std::fmt::Debug for HashStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read().expect("lock poisoned").name();
        f.debug_struct("HashStore")
            .field("state", &state)
            .field("issued", &self.issued())
            .field("available", &self.stats.available())
            .finish()
    }
}
