//! Ranking-and-selection configuration.

use crate::demand::MAX_REPLICATIONS;
use crate::error::{Result, SarsError};

/// Configuration of the two-stage ranking-and-selection estimator.
///
/// # Examples
///
/// ```
/// use inventory_sars::ranking::RankSelectConfig;
///
/// let config = RankSelectConfig::default()
///     .with_delta(0.5)
///     .with_beta(0.95)
///     .with_seed(7);
/// assert_eq!(config.initial_replications, 20);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankSelectConfig {
    /// Stage-1 replications `n0`. Must be at least 2.
    pub initial_replications: usize,

    /// Indifference-zone half-width. Differences in expected cost smaller than
    /// this are not resolved.
    pub delta: f64,

    /// Confidence level used to look up the Rinott constant `h`.
    pub beta: f64,

    /// Whether to run stage 2. When `false` the estimator returns the
    /// stage-1 mean, which is enough for pilot evaluations.
    pub ranking: bool,

    /// Whether to run replications of one stage on the rayon pool.
    ///
    /// Only effective with the `parallel` feature; otherwise ignored.
    pub parallel: bool,

    /// Seed for seed caches created by the estimator. `None` draws fresh
    /// randomness for each new cache.
    pub seed: Option<u64>,
}

impl Default for RankSelectConfig {
    fn default() -> Self {
        Self {
            initial_replications: 20,
            delta: 1.0,
            beta: 0.9,
            ranking: true,
            parallel: false,
            seed: None,
        }
    }
}

impl RankSelectConfig {
    pub fn with_initial_replications(mut self, n0: usize) -> Self {
        self.initial_replications = n0;
        self
    }

    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_ranking(mut self, ranking: bool) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// `n0 < 2` leaves the stage-1 variance undefined and is reported as
    /// [`SarsError::DegenerateStatistics`].
    pub fn validate(&self) -> Result<()> {
        if self.initial_replications < 2 {
            return Err(SarsError::DegenerateStatistics {
                observations: self.initial_replications,
            });
        }
        if self.initial_replications >= MAX_REPLICATIONS {
            return Err(SarsError::ReplicationLimit {
                requested: self.initial_replications,
                limit: MAX_REPLICATIONS,
            });
        }
        if !(self.delta > 0.0 && self.delta.is_finite()) {
            return Err(SarsError::InvalidConfig(format!(
                "delta must be positive, got {}",
                self.delta
            )));
        }
        if !(self.beta > 0.0 && self.beta < 1.0) {
            return Err(SarsError::InvalidConfig(format!(
                "beta must be in (0, 1), got {}",
                self.beta
            )));
        }
        Ok(())
    }
}
