use std::sync::atomic::{AtomicU64, Ordering};

use hb_types::HashId;

/// Issues unique, strictly increasing hash ids.
///
/// This is the only piece of store state every `put` touches without going
/// through the writer. Ids are handed out in allocation order with no gaps:
/// the `n`-th call returns `n`.
#[derive(Debug, Default)]
pub struct IdAllocator {
    issued: AtomicU64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next id.
    pub fn allocate(&self) -> HashId {
        let previous = self.issued.fetch_add(1, Ordering::Relaxed);
        HashId::from_raw(previous + 1)
    }

    /// Number of ids issued so far, which is also the highest issued id.
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn starts_at_one() {
        let ids = IdAllocator::new();
        assert_eq!(ids.issued(), 0);
        assert_eq!(ids.allocate(), HashId::FIRST);
        assert_eq!(ids.issued(), 1);
    }

    #[test]
    fn strictly_increasing() {
        let ids = IdAllocator::new();
        let mut prev = ids.allocate();
        for _ in 0..1000 {
            let next = ids.allocate();
            assert!(next > prev, "ids must increase: {prev:?} >= {next:?}");
            prev = next;
        }
    }

    #[test]
    fn concurrent_allocation_is_a_bijection() {
        let ids = Arc::new(IdAllocator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ids = Arc::clone(&ids);
                thread::spawn(move || (0..500).map(|_| ids.allocate().get()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for h in handles {
            for id in h.join().expect("thread should not panic") {
                assert!(seen.insert(id), "id {id} issued twice");
            }
        }
        assert_eq!(seen.len(), 4000);
        assert_eq!(seen, (1..=4000).collect());
        assert_eq!(ids.issued(), 4000);
    }
}
