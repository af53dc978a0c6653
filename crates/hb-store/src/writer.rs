//! The store writer: sole owner of the entry map.
//!
//! A single tokio task processes requests one at a time, so commits and
//! lookups never race and no lock guards the map. Committing is two-phase:
//! the entry is written first, then a settling timer is queued on the
//! writer's own [`JoinSet`]. When the timer fires the entry is marked settled
//! and its latency is folded into the running mean. A settled entry is only
//! returned once its id is within the settled count. Timers are polled by the
//! writer's `select!` loop and never block request handling.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use hb_types::{Entry, HashId};
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error};

use crate::error::{StoreError, StoreResult};
use crate::stats::{RunningMean, StatsCell};

/// A finished hash, produced by a worker and consumed once by the writer.
#[derive(Clone, Debug)]
pub struct CompletionRecord {
    pub id: HashId,
    pub digest: Bytes,
    pub latency: Duration,
}

enum WriterRequest {
    Commit {
        record: CompletionRecord,
        ack: oneshot::Sender<()>,
    },
    Lookup {
        id: HashId,
        reply: oneshot::Sender<Option<Entry>>,
    },
    Drain {
        done: oneshot::Sender<()>,
    },
}

/// Cloneable handle used by workers and the facade to talk to the writer.
///
/// The writer task exits once every handle has been dropped.
#[derive(Clone, Debug)]
pub struct WriterHandle {
    requests: mpsc::Sender<WriterRequest>,
}

impl WriterHandle {
    /// Spawn a writer on the current tokio runtime.
    pub fn spawn(capacity: usize, settle_delay: Duration, stats: Arc<StatsCell>) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        let writer = StoreWriter {
            requests: rx,
            entries: HashMap::new(),
            settling: JoinSet::new(),
            drain_waiters: Vec::new(),
            settle_delay,
            mean: RunningMean::new(),
            stats,
        };
        tokio::spawn(writer.run());
        Self { requests: tx }
    }

    /// Hand a completion to the writer and wait until it has been committed.
    pub async fn commit(&self, record: CompletionRecord) -> StoreResult<()> {
        let (ack, acked) = oneshot::channel();
        self.send(WriterRequest::Commit { record, ack }).await?;
        acked.await.map_err(|_| StoreError::WriterClosed)
    }

    /// Look up a settled entry.
    pub async fn lookup(&self, id: HashId) -> StoreResult<Option<Entry>> {
        let (reply, response) = oneshot::channel();
        self.send(WriterRequest::Lookup { id, reply }).await?;
        response.await.map_err(|_| StoreError::WriterClosed)
    }

    /// Resolve once no committed entry is waiting to settle.
    pub async fn drain(&self) -> StoreResult<()> {
        let (done, drained) = oneshot::channel();
        self.send(WriterRequest::Drain { done }).await?;
        drained.await.map_err(|_| StoreError::WriterClosed)
    }

    async fn send(&self, request: WriterRequest) -> StoreResult<()> {
        self.requests
            .send(request)
            .await
            .map_err(|_| StoreError::WriterClosed)
    }
}

/// A committed entry and whether its settling delay has elapsed.
struct Slot {
    entry: Entry,
    settled: bool,
}

struct Settled {
    id: HashId,
    latency: Duration,
}

struct StoreWriter {
    requests: mpsc::Receiver<WriterRequest>,
    entries: HashMap<HashId, Slot>,
    settling: JoinSet<Settled>,
    drain_waiters: Vec<oneshot::Sender<()>>,
    settle_delay: Duration,
    mean: RunningMean,
    stats: Arc<StatsCell>,
}

impl StoreWriter {
    async fn run(mut self) {
        loop {
            tokio::select! {
                request = self.requests.recv() => match request {
                    Some(request) => self.handle(request),
                    None => break,
                },
                Some(joined) = self.settling.join_next(), if !self.settling.is_empty() => {
                    self.settle(joined);
                }
            }
        }
        debug!(
            entries = self.entries.len(),
            unsettled = self.settling.len(),
            "store writer stopped"
        );
    }

    fn handle(&mut self, request: WriterRequest) {
        match request {
            WriterRequest::Commit { record, ack } => {
                self.commit(record);
                // A worker that stopped waiting is not our concern.
                let _ = ack.send(());
            }
            WriterRequest::Lookup { id, reply } => {
                let _ = reply.send(self.lookup(id));
            }
            WriterRequest::Drain { done } => {
                if self.settling.is_empty() {
                    let _ = done.send(());
                } else {
                    self.drain_waiters.push(done);
                }
            }
        }
    }

    fn commit(&mut self, record: CompletionRecord) {
        let CompletionRecord {
            id,
            digest,
            latency,
        } = record;

        if self.entries.contains_key(&id) {
            error!(%id, "duplicate commit for hash id");
            debug_assert!(false, "hash id {id} committed twice");
            return;
        }
        let entry = match Entry::new(id, digest) {
            Ok(entry) => entry,
            Err(e) => {
                error!(%id, error = %e, "cannot build entry");
                debug_assert!(false, "cannot build entry {id}: {e}");
                return;
            }
        };

        self.entries.insert(
            id,
            Slot {
                entry,
                settled: false,
            },
        );

        let delay = self.settle_delay;
        self.settling.spawn(async move {
            tokio::time::sleep(delay).await;
            Settled { id, latency }
        });
        debug!(%id, ?latency, "committed entry");
    }

    /// An entry is visible once its own delay has elapsed and its id is
    /// within the settled count. Both only ever grow, so visibility is
    /// monotone.
    fn lookup(&self, id: HashId) -> Option<Entry> {
        if id.get() > self.mean.count() {
            return None;
        }
        self.entries
            .get(&id)
            .filter(|slot| slot.settled)
            .map(|slot| slot.entry.clone())
    }

    fn settle(&mut self, joined: Result<Settled, JoinError>) {
        match joined {
            Ok(Settled { id, latency }) => match self.entries.get_mut(&id) {
                Some(slot) => {
                    slot.settled = true;
                    let available = self.mean.push(latency);
                    self.stats.publish(&self.mean);
                    debug!(%id, available, "entry settled");
                }
                None => error!(%id, "settled an entry that was never committed"),
            },
            Err(e) => error!(error = %e, "settling timer failed"),
        }

        if self.settling.is_empty() {
            for done in self.drain_waiters.drain(..) {
                let _ = done.send(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_secs(5);

    fn record(id: u64, digest: &'static [u8], latency_us: u64) -> CompletionRecord {
        CompletionRecord {
            id: HashId::from_raw(id),
            digest: Bytes::from_static(digest),
            latency: Duration::from_micros(latency_us),
        }
    }

    fn spawn_writer() -> (WriterHandle, Arc<StatsCell>) {
        let stats = Arc::new(StatsCell::new());
        (WriterHandle::spawn(4, DELAY, Arc::clone(&stats)), stats)
    }

    #[tokio::test(start_paused = true)]
    async fn committed_entry_is_hidden_until_settled() {
        let (writer, stats) = spawn_writer();
        writer.commit(record(1, b"digest-1", 10)).await.unwrap();

        assert_eq!(writer.lookup(HashId::from_raw(1)).await.unwrap(), None);
        assert_eq!(stats.available(), 0);

        tokio::time::sleep(DELAY / 2).await;
        assert_eq!(writer.lookup(HashId::from_raw(1)).await.unwrap(), None);

        tokio::time::sleep(DELAY).await;
        let entry = writer.lookup(HashId::from_raw(1)).await.unwrap().expect("settled");
        assert_eq!(entry.digest().as_ref(), b"digest-1");
        assert_eq!(entry.digest_len(), 8);
        assert_eq!(stats.available(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_id_is_not_found() {
        let (writer, _stats) = spawn_writer();
        assert_eq!(writer.lookup(HashId::from_raw(99)).await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn settling_updates_running_mean() {
        let (writer, stats) = spawn_writer();
        writer.commit(record(2, b"b", 30)).await.unwrap();
        writer.commit(record(1, b"a", 10)).await.unwrap();
        writer.drain().await.unwrap();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.count, 2);
        assert_eq!(snapshot.average, Duration::from_micros(20));
        assert!(writer.lookup(HashId::from_raw(1)).await.unwrap().is_some());
        assert!(writer.lookup(HashId::from_raw(2)).await.unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn settle_does_not_block_commits() {
        let (writer, _stats) = spawn_writer();
        let start = tokio::time::Instant::now();
        for id in 1..=20 {
            writer.commit(record(id, b"x", 1)).await.unwrap();
        }
        // Twenty commits must not each wait out the settling delay.
        assert!(start.elapsed() < DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn drain_on_idle_writer_returns_immediately() {
        let (writer, _stats) = spawn_writer();
        let start = tokio::time::Instant::now();
        writer.drain().await.unwrap();
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn lookups_are_served_while_draining() {
        let (writer, _stats) = spawn_writer();
        writer.commit(record(1, b"a", 1)).await.unwrap();

        let draining = {
            let writer = writer.clone();
            tokio::spawn(async move { writer.drain().await })
        };
        tokio::task::yield_now().await;

        assert_eq!(writer.lookup(HashId::from_raw(1)).await.unwrap(), None);
        draining.await.unwrap().unwrap();
        assert!(writer.lookup(HashId::from_raw(1)).await.unwrap().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn settled_id_above_available_count_is_hidden() {
        let (writer, stats) = spawn_writer();
        writer.commit(record(5, b"five", 1)).await.unwrap();
        writer.drain().await.unwrap();

        assert_eq!(stats.available(), 1);
        assert_eq!(writer.lookup(HashId::from_raw(5)).await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_order_settle_waits_for_count() {
        let (writer, stats) = spawn_writer();
        writer.commit(record(2, b"two", 1)).await.unwrap();
        tokio::time::sleep(DELAY + Duration::from_millis(1)).await;

        // Id 2 has settled but only one entry is available.
        assert_eq!(stats.available(), 1);
        assert_eq!(writer.lookup(HashId::from_raw(2)).await.unwrap(), None);

        writer.commit(record(1, b"one", 1)).await.unwrap();
        assert_eq!(writer.lookup(HashId::from_raw(2)).await.unwrap(), None);

        writer.drain().await.unwrap();
        assert_eq!(stats.available(), 2);
        let one = writer.lookup(HashId::from_raw(1)).await.unwrap().expect("settled");
        let two = writer.lookup(HashId::from_raw(2)).await.unwrap().expect("settled");
        assert_eq!(one.digest().as_ref(), b"one");
        assert_eq!(two.digest().as_ref(), b"two");
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_lookups_are_identical() {
        let (writer, _stats) = spawn_writer();
        writer.commit(record(1, b"same", 5)).await.unwrap();
        writer.drain().await.unwrap();

        let first = writer.lookup(HashId::from_raw(1)).await.unwrap();
        let second = writer.lookup(HashId::from_raw(1)).await.unwrap();
        assert!(first.is_some());
        assert_eq!(first, second);
    }
}
