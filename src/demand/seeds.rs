//! Memoized, append-only seed sequence for common random numbers.

use std::ops::Range;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::rngs::StdRng;
use rand::Rng;

use crate::error::{Result, SarsError};
use crate::random::create_rng;

/// Largest number of replications, and so of seeds, a cache will hold.
pub const MAX_REPLICATIONS: usize = 1_000_000;

/// Extra seeds generated past the requested index on a cache miss.
const GROWTH_CHUNK: usize = 10;

#[derive(Debug)]
struct SeedBuffer {
    seeds: Vec<u64>,
    rng: StdRng,
}

impl SeedBuffer {
    fn ensure(&mut self, len: usize) -> Result<()> {
        if len > MAX_REPLICATIONS {
            return Err(SarsError::ReplicationLimit {
                requested: len,
                limit: MAX_REPLICATIONS,
            });
        }
        if len > self.seeds.len() {
            let target = (len + GROWTH_CHUNK - 1).min(MAX_REPLICATIONS);
            while self.seeds.len() < target {
                let seed = self.rng.random::<u64>();
                self.seeds.push(seed);
            }
        }
        Ok(())
    }
}

/// A lazily extended sequence of replication seeds.
///
/// Index `i` is generated once, memoized, and returned unchanged on every
/// later request, whichever handle asks and in whatever order. Clones are
/// handles onto the same sequence: a candidate evaluated with a clone extends
/// the cache seen by the search that owns the original.
///
/// Extension happens under a mutex, so replications running on worker
/// threads observe a single writer. Indices at or past [`MAX_REPLICATIONS`]
/// are rejected with [`SarsError::ReplicationLimit`].
#[derive(Debug, Clone)]
pub struct SeedCache {
    inner: Arc<Mutex<SeedBuffer>>,
}

impl SeedCache {
    /// Creates an empty cache. `seed` fixes the whole sequence; `None` draws
    /// a fresh one.
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SeedBuffer {
                seeds: Vec::new(),
                rng: create_rng(seed),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SeedBuffer> {
        // The buffer is only ever appended to, so a poisoned lock still holds
        // a consistent prefix.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seed of replication `index`, generating it on first use.
    pub fn get(&self, index: usize) -> Result<u64> {
        let mut buffer = self.lock();
        buffer.ensure(index.saturating_add(1))?;
        Ok(buffer.seeds[index])
    }

    /// Seeds for `range`, extending the cache once if needed.
    ///
    /// An empty or reversed range yields no seeds.
    pub fn range(&self, range: Range<usize>) -> Result<Vec<u64>> {
        if range.is_empty() {
            return Ok(Vec::new());
        }
        let mut buffer = self.lock();
        buffer.ensure(range.end)?;
        Ok(buffer.seeds[range].to_vec())
    }

    /// Number of seeds generated so far.
    pub fn len(&self) -> usize {
        self.lock().seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy of every seed generated so far.
    pub fn snapshot(&self) -> Vec<u64> {
        self.lock().seeds.clone()
    }

    /// Whether both handles refer to the same sequence.
    pub fn same_cache(&self, other: &SeedCache) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_starts_empty_and_grows_in_chunks() {
        let cache = SeedCache::new(Some(1));
        assert!(cache.is_empty());
        cache.get(0).unwrap();
        assert_eq!(cache.len(), GROWTH_CHUNK);
        cache.get(25).unwrap();
        assert_eq!(cache.len(), 26 + GROWTH_CHUNK - 1);
    }

    #[test]
    fn test_range_matches_get() {
        let cache = SeedCache::new(Some(9));
        let seeds = cache.range(3..40).unwrap();
        for (offset, seed) in seeds.iter().enumerate() {
            assert_eq!(*seed, cache.get(3 + offset).unwrap());
        }
        assert!(cache.range(5..5).unwrap().is_empty());
    }

    #[test]
    #[allow(clippy::reversed_empty_ranges)]
    fn test_reversed_range_is_empty() {
        let cache = SeedCache::new(Some(9));
        assert!(cache.range(12..4).unwrap().is_empty());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_indices_past_the_limit_are_rejected() {
        let cache = SeedCache::new(Some(3));
        assert_eq!(
            cache.get(usize::MAX),
            Err(SarsError::ReplicationLimit {
                requested: usize::MAX,
                limit: MAX_REPLICATIONS,
            })
        );
        assert!(matches!(
            cache.range(0..MAX_REPLICATIONS + 1),
            Err(SarsError::ReplicationLimit { .. })
        ));
        assert!(cache.is_empty());

        // The last admissible index is served without over-allocating.
        cache.get(MAX_REPLICATIONS - 1).unwrap();
        assert_eq!(cache.len(), MAX_REPLICATIONS);
    }

    #[test]
    fn test_clones_share_the_sequence() {
        let cache = SeedCache::new(None);
        let handle = cache.clone();
        let far = handle.get(100).unwrap();
        assert!(cache.len() > 100);
        assert_eq!(cache.get(100).unwrap(), far);
        assert!(cache.same_cache(&handle));
        assert!(!cache.same_cache(&SeedCache::new(None)));
    }

    #[test]
    fn test_seeded_caches_agree() {
        let a = SeedCache::new(Some(77));
        let b = SeedCache::new(Some(77));
        // Extension order differs, contents must not.
        b.get(57).unwrap();
        assert_eq!(a.range(0..58).unwrap(), b.range(0..58).unwrap());
    }

    #[test]
    fn test_concurrent_extension_is_consistent() {
        let cache = SeedCache::new(Some(4));
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    (0..200).filter_map(|i| cache.get((i * 7 + t) % 200).ok()).count()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 200);
        }
        let fresh = SeedCache::new(Some(4));
        assert_eq!(cache.range(0..200).unwrap(), fresh.range(0..200).unwrap());
    }

    proptest! {
        #[test]
        fn prop_index_is_stable(indices in prop::collection::vec(0usize..500, 1..40)) {
            let cache = SeedCache::new(None);
            let first: Vec<u64> = indices.iter().map(|&i| cache.get(i).unwrap()).collect();
            let again: Vec<u64> = indices.iter().rev().map(|&i| cache.get(i).unwrap()).collect();
            let again: Vec<u64> = again.into_iter().rev().collect();
            prop_assert_eq!(first, again);
        }
    }
}
