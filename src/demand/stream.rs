//! Memoized demand pairs indexed by replication.

use std::ops::Range;
use std::sync::Arc;

use super::seeds::SeedCache;
use super::source::{DemandParams, DemandPair, DemandSource};
use crate::error::Result;

/// Demand pairs for replications `0, 1, 2, ...`, generated on first use.
///
/// Pair `i` is produced from seed `i` of the underlying [`SeedCache`], so two
/// streams sharing a cache (and parameters) yield identical demands. Once
/// generated, a pair is kept and handed out by reference count; systems being
/// compared consume exactly the same draws without regenerating them.
pub struct DemandStream<'a, D: DemandSource> {
    source: &'a D,
    params: DemandParams,
    seeds: SeedCache,
    demands: Vec<Arc<DemandPair>>,
}

impl<'a, D: DemandSource> DemandStream<'a, D> {
    pub fn new(source: &'a D, params: DemandParams, seeds: SeedCache) -> Self {
        Self {
            source,
            params,
            seeds,
            demands: Vec::new(),
        }
    }

    fn ensure(&mut self, len: usize) -> Result<()> {
        if len <= self.demands.len() {
            return Ok(());
        }
        let seeds = self.seeds.range(self.demands.len()..len)?;
        for seed in seeds {
            let pair = self.source.generate(&self.params, Some(seed));
            self.demands.push(Arc::new(pair));
        }
        Ok(())
    }

    /// Demand pair of replication `index`.
    pub fn get(&mut self, index: usize) -> Result<Arc<DemandPair>> {
        self.ensure(index.saturating_add(1))?;
        Ok(Arc::clone(&self.demands[index]))
    }

    /// Demand pairs for `range`. An empty or reversed range yields no pairs.
    pub fn range(&mut self, range: Range<usize>) -> Result<Vec<Arc<DemandPair>>> {
        if range.is_empty() {
            return Ok(Vec::new());
        }
        self.ensure(range.end)?;
        Ok(self.demands[range].to_vec())
    }

    /// Number of pairs generated so far.
    pub fn len(&self) -> usize {
        self.demands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.demands.is_empty()
    }

    pub fn seeds(&self) -> &SeedCache {
        &self.seeds
    }

    pub fn params(&self) -> &DemandParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demand::CorrelatedExponential;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_pairs_follow_seed_indices() {
        let params = DemandParams::new(12, 0.5, 0.25, 0.3);
        let seeds = SeedCache::new(Some(21));
        let mut stream = DemandStream::new(&CorrelatedExponential, params, seeds.clone());

        let pair = stream.get(4).unwrap();
        assert_eq!(stream.len(), 5);
        let expected = CorrelatedExponential.generate(&params, Some(seeds.get(4).unwrap()));
        assert_eq!(*pair, expected);
    }

    #[test]
    fn test_pairs_are_generated_once() {
        let calls = AtomicUsize::new(0);
        let source = |params: &DemandParams, seed: Option<u64>| {
            calls.fetch_add(1, Ordering::SeqCst);
            let value = seed.unwrap_or_default() as f64;
            DemandPair {
                a: vec![value; params.periods],
                b: vec![value; params.periods],
            }
        };
        let mut stream = DemandStream::new(
            &source,
            DemandParams::new(3, 1.0, 1.0, 0.0),
            SeedCache::new(Some(2)),
        );

        let first = stream.range(0..6).unwrap();
        let again = stream.range(2..6).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 6);
        assert!(Arc::ptr_eq(&first[2], &again[0]));
        assert!(stream.range(6..6).unwrap().is_empty());
    }

    #[test]
    #[allow(clippy::reversed_empty_ranges)]
    fn test_reversed_range_generates_nothing() {
        let mut stream = DemandStream::new(
            &CorrelatedExponential,
            DemandParams::new(4, 1.0, 1.0, 0.0),
            SeedCache::new(Some(6)),
        );
        assert!(stream.range(9..3).unwrap().is_empty());
        assert!(stream.is_empty());
        assert!(stream.seeds().is_empty());
    }

    #[test]
    fn test_index_past_the_limit_is_an_error() {
        let mut stream = DemandStream::new(
            &CorrelatedExponential,
            DemandParams::new(4, 1.0, 1.0, 0.0),
            SeedCache::new(Some(6)),
        );
        assert!(matches!(
            stream.get(usize::MAX),
            Err(crate::SarsError::ReplicationLimit { .. })
        ));
        assert!(stream.is_empty());
    }

    #[test]
    fn test_shared_cache_gives_identical_streams() {
        let params = DemandParams::new(8, 0.1, 0.2, -0.5);
        let seeds = SeedCache::new(None);
        let mut a = DemandStream::new(&CorrelatedExponential, params, seeds.clone());
        let mut b = DemandStream::new(&CorrelatedExponential, params, seeds);
        assert_eq!(*a.get(3).unwrap(), *b.get(3).unwrap());
        assert_eq!(*a.get(0).unwrap(), *b.get(0).unwrap());
    }
}
