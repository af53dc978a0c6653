use std::sync::Arc;

use hb_crypto::{timed_digest, Digester};
use hb_types::HashId;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::writer::{CompletionRecord, WriterHandle};

/// Payloads above this size are hashed on the blocking pool.
pub const INLINE_DIGEST_LIMIT: usize = 64 * 1024;

/// A payload waiting for a worker.
#[derive(Clone, Debug)]
pub struct PendingJob {
    pub id: HashId,
    pub payload: String,
}

/// Fixed-size set of hashing workers sharing one job queue.
///
/// Each job is received by exactly one worker. A worker sends its
/// [`CompletionRecord`] to the writer and waits for the acknowledgement
/// before taking the next job, so at most `size` completions are in flight.
/// Workers exit once the job queue is closed and empty.
#[derive(Debug)]
pub struct WorkerPool {
    workers: Vec<JoinHandle<u64>>,
}

impl WorkerPool {
    /// Spawn `size` workers on the current tokio runtime.
    pub fn spawn(
        size: usize,
        jobs: mpsc::Receiver<PendingJob>,
        digester: Arc<dyn Digester>,
        writer: WriterHandle,
    ) -> Self {
        let jobs = Arc::new(Mutex::new(jobs));
        let workers = (0..size)
            .map(|index| {
                tokio::spawn(run_worker(
                    index,
                    Arc::clone(&jobs),
                    Arc::clone(&digester),
                    writer.clone(),
                ))
            })
            .collect();
        Self { workers }
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    /// Wait for every worker to exit. Returns the number of jobs processed.
    pub async fn join(self) -> u64 {
        let mut processed = 0;
        for handle in self.workers {
            match handle.await {
                Ok(count) => processed += count,
                Err(e) => error!(error = %e, "hash worker panicked"),
            }
        }
        processed
    }
}

async fn run_worker(
    index: usize,
    jobs: Arc<Mutex<mpsc::Receiver<PendingJob>>>,
    digester: Arc<dyn Digester>,
    writer: WriterHandle,
) -> u64 {
    let mut processed = 0;
    loop {
        // Only the receive happens under the lock; hashing runs unlocked.
        let job = jobs.lock().await.recv().await;
        let Some(PendingJob { id, payload }) = job else {
            break;
        };

        let (digest, latency) = if payload.len() <= INLINE_DIGEST_LIMIT {
            timed_digest(digester.as_ref(), payload.as_bytes())
        } else {
            let digester = Arc::clone(&digester);
            let hashed = tokio::task::spawn_blocking(move || {
                timed_digest(digester.as_ref(), payload.as_bytes())
            })
            .await;
            match hashed {
                Ok(hashed) => hashed,
                Err(e) => {
                    error!(worker = index, %id, error = %e, "digest task failed");
                    continue;
                }
            }
        };
        let record = CompletionRecord {
            id,
            digest,
            latency,
        };
        if let Err(e) = writer.commit(record).await {
            warn!(worker = index, %id, error = %e, "dropping hash, writer unavailable");
            break;
        }
        processed += 1;
    }
    debug!(worker = index, processed, "hash worker stopped");
    processed
}
