//! Two-stage sequential estimator (Rinott).
//!
//! # Algorithm
//!
//! 1. **Stage 1**: run `n0` replications, replication `i` driven by seed `i`
//!    of the seed cache. Compute the mean `m1` and variance `v` of the
//!    per-replication average costs.
//! 2. **Sizing**: `h = H(beta)`, `n1 = max(n0 + 1, 1 + floor(v h^2 / delta^2))`.
//! 3. **Stage 2**: run replications `n0..n1` from the same cache; mean `m2`.
//! 4. **Weighting**: the estimate is `w m1 + (1 - w) m2` with the Rinott
//!    weight `w`.
//!
//! The seed cache is returned with the estimate so a later evaluation of a
//! different policy replays the same demand draws.
//!
//! # Reference
//!
//! Rinott, Y. (1978). "On two-stage selection procedures and related
//! probability-inequalities", *Communications in Statistics* A7, 799-811.

use std::sync::Arc;

use tracing::debug;

use super::config::RankSelectConfig;
use super::stats::{mean, mean_variance, rinott_weight, second_stage_size};
use super::table::h_value;
use crate::demand::{Channel, DemandPair, DemandParams, DemandSource, DemandStream, SeedCache};
use crate::error::Result;
use crate::inventory::{Inventory, JointPolicy, Policy};

/// A precision-controlled estimate of expected average cost.
#[derive(Debug, Clone)]
pub struct SampleMean {
    /// The estimate.
    pub value: f64,
    /// Replications used across both stages (at least `n0`).
    pub replications: usize,
    /// Seed cache the replications drew from, possibly extended.
    pub seeds: SeedCache,
}

/// Outcome of comparing an incumbent policy against a candidate under common
/// demand draws.
#[derive(Debug, Clone)]
pub struct Comparison<P> {
    pub incumbent: P,
    pub candidate: P,
    pub incumbent_mean: f64,
    pub candidate_mean: f64,
    /// Total replications used for `[incumbent, candidate]`.
    pub replications: [usize; 2],
}

impl<P: Copy> Comparison<P> {
    /// The policy with the lower estimated cost; the incumbent wins ties.
    pub fn best(&self) -> (P, f64) {
        if self.candidate_mean < self.incumbent_mean {
            (self.candidate, self.candidate_mean)
        } else {
            (self.incumbent, self.incumbent_mean)
        }
    }
}

/// Summary of fixed-size pilot runs of two inventories.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PilotSummary {
    /// Mean and variance of the summed per-replication cost.
    Joint { mean: f64, variance: f64 },
    /// Mean and variance of each inventory's per-replication cost.
    Separate { means: [f64; 2], variances: [f64; 2] },
}

/// What one replication simulates.
enum Subject<'a> {
    /// One inventory fed by one demand channel.
    Single(&'a Inventory, Channel),
    /// Two inventories fed by channels A and B; their costs are summed.
    Joint(&'a Inventory, &'a Inventory),
}

impl Subject<'_> {
    fn replicate(&self, demands: &DemandPair) -> f64 {
        match *self {
            Subject::Single(system, channel) => run_once(system, demands.channel(channel)),
            Subject::Joint(a, b) => {
                run_once(a, demands.channel(Channel::A)) + run_once(b, demands.channel(Channel::B))
            }
        }
    }
}

fn run_once(system: &Inventory, demands: &[f64]) -> f64 {
    let mut run = system.restarted();
    run.simulate(demands);
    run.average_cost()
}

/// Ranking-and-selection estimator over a demand source.
///
/// # Examples
///
/// ```
/// use inventory_sars::demand::{Channel, CorrelatedExponential, DemandParams};
/// use inventory_sars::inventory::{CostParams, Inventory, Policy};
/// use inventory_sars::ranking::{RankSelect, RankSelectConfig};
///
/// let estimator = RankSelect::new(
///     CorrelatedExponential,
///     DemandParams::new(60, 0.10, 0.12, 0.0),
///     RankSelectConfig::default().with_seed(1),
/// )
/// .unwrap();
/// let costs = CostParams::new(1.0, 10.0, 1.0, 10.0, 0);
/// let system = Inventory::new(60.0, costs, Policy::new(50.0, 100.0));
///
/// let estimate = estimator.sample_mean(&system, Channel::A, None).unwrap();
/// assert!(estimate.replications > 20);
///
/// // Re-evaluating with the returned cache replays the same demands.
/// let again = estimator.sample_mean(&system, Channel::A, Some(&estimate.seeds)).unwrap();
/// assert_eq!(estimate.value, again.value);
/// ```
pub struct RankSelect<D: DemandSource> {
    source: D,
    params: DemandParams,
    config: RankSelectConfig,
}

impl<D: DemandSource> RankSelect<D> {
    /// Creates an estimator, validating the configuration and demand
    /// parameters up front.
    pub fn new(source: D, params: DemandParams, config: RankSelectConfig) -> Result<Self> {
        config.validate()?;
        params.validate()?;
        Ok(Self {
            source,
            params,
            config,
        })
    }

    pub fn config(&self) -> &RankSelectConfig {
        &self.config
    }

    pub fn params(&self) -> &DemandParams {
        &self.params
    }

    pub fn source(&self) -> &D {
        &self.source
    }

    /// Estimates the expected average cost of `system` fed by `channel`.
    ///
    /// Without `seeds` a new cache is created from the configured seed.
    pub fn sample_mean(
        &self,
        system: &Inventory,
        channel: Channel,
        seeds: Option<&SeedCache>,
    ) -> Result<SampleMean> {
        self.estimate(&Subject::Single(system, channel), seeds)
    }

    /// Estimates the expected summed average cost of two inventories, `a` fed
    /// by channel A and `b` by channel B of the same correlated draws.
    pub fn joint_sample_mean(
        &self,
        a: &Inventory,
        b: &Inventory,
        seeds: Option<&SeedCache>,
    ) -> Result<SampleMean> {
        self.estimate(&Subject::Joint(a, b), seeds)
    }

    fn estimate(&self, subject: &Subject<'_>, seeds: Option<&SeedCache>) -> Result<SampleMean> {
        let n0 = self.config.initial_replications;
        let seeds = match seeds {
            Some(cache) => cache.clone(),
            None => SeedCache::new(self.config.seed),
        };

        let stage_one = self.replicate_seeds(subject, &seeds.range(0..n0)?);
        let (m1, variance) = mean_variance(&stage_one)?;

        if !self.config.ranking {
            return Ok(SampleMean {
                value: m1,
                replications: n0,
                seeds,
            });
        }

        let h = h_value(self.config.beta);
        let n1 = second_stage_size(n0, variance, h, self.config.delta)?;
        debug!(n0, n1, m1, variance, h, "stage-1 complete");

        let stage_two = self.replicate_seeds(subject, &seeds.range(n0..n1)?);
        let m2 = mean(&stage_two);
        let w = rinott_weight(n0, n1, self.config.delta, variance, h);

        Ok(SampleMean {
            value: w * m1 + (1.0 - w) * m2,
            replications: n1,
            seeds,
        })
    }

    /// Compares the current policy of `system` against `candidate` on the
    /// same inventory, both driven by identical demand draws.
    ///
    /// Both stages always run; `ranking` in the configuration only affects
    /// [`RankSelect::sample_mean`] and [`RankSelect::joint_sample_mean`].
    pub fn compare(
        &self,
        system: &Inventory,
        candidate: Policy,
        channel: Channel,
    ) -> Result<Comparison<Policy>> {
        let incumbent = system.restarted();
        let mut challenger = system.restarted();
        challenger.set_policy(candidate)?;

        let (means, replications) = self.compare_subjects(
            &Subject::Single(&incumbent, channel),
            &Subject::Single(&challenger, channel),
        )?;
        Ok(Comparison {
            incumbent: incumbent.policy(),
            candidate,
            incumbent_mean: means[0],
            candidate_mean: means[1],
            replications,
        })
    }

    /// Compares the current policies of `a` and `b` against `candidate`,
    /// scoring each pair by its summed cost under identical correlated draws.
    pub fn compare_joint(
        &self,
        a: &Inventory,
        b: &Inventory,
        candidate: JointPolicy,
    ) -> Result<Comparison<JointPolicy>> {
        let mut challenger_a = a.restarted();
        let mut challenger_b = b.restarted();
        challenger_a.set_policy(candidate.a)?;
        challenger_b.set_policy(candidate.b)?;

        let (means, replications) = self.compare_subjects(
            &Subject::Joint(a, b),
            &Subject::Joint(&challenger_a, &challenger_b),
        )?;
        Ok(Comparison {
            incumbent: JointPolicy::new(a.policy(), b.policy()),
            candidate,
            incumbent_mean: means[0],
            candidate_mean: means[1],
            replications,
        })
    }

    fn compare_subjects(
        &self,
        incumbent: &Subject<'_>,
        candidate: &Subject<'_>,
    ) -> Result<([f64; 2], [usize; 2])> {
        let n0 = self.config.initial_replications;
        let seeds = SeedCache::new(self.config.seed);
        let mut stream = DemandStream::new(&self.source, self.params, seeds);

        let first = stream.range(0..n0)?;
        let (m1_inc, var_inc) = mean_variance(&self.replicate_demands(incumbent, &first))?;
        let (m1_cand, var_cand) = mean_variance(&self.replicate_demands(candidate, &first))?;

        let h = h_value(self.config.beta);
        let n_inc = second_stage_size(n0, var_inc, h, self.config.delta)?;
        let n_cand = second_stage_size(n0, var_cand, h, self.config.delta)?;
        debug!(n0, n_inc, n_cand, "comparison stage-1 complete");

        let second = stream.range(n0..n_inc.max(n_cand))?;
        let m2_inc = mean(&self.replicate_demands(incumbent, &second[..n_inc - n0]));
        let m2_cand = mean(&self.replicate_demands(candidate, &second[..n_cand - n0]));

        let w_inc = rinott_weight(n0, n_inc, self.config.delta, var_inc, h);
        let w_cand = rinott_weight(n0, n_cand, self.config.delta, var_cand, h);

        Ok((
            [
                w_inc * m1_inc + (1.0 - w_inc) * m2_inc,
                w_cand * m1_cand + (1.0 - w_cand) * m2_cand,
            ],
            [n_inc, n_cand],
        ))
    }

    /// Runs `repeats` replications of `a` (channel A) and `b` (channel B) on
    /// shared draws and summarizes them, either as one summed cost (`joint`)
    /// or per inventory.
    pub fn pilot_runs(
        &self,
        a: &Inventory,
        b: &Inventory,
        repeats: usize,
        joint: bool,
        seeds: Option<&SeedCache>,
    ) -> Result<PilotSummary> {
        let seeds = match seeds {
            Some(cache) => cache.range(0..repeats)?,
            None => SeedCache::new(self.config.seed).range(0..repeats)?,
        };
        let costs_a = self.replicate_seeds(&Subject::Single(a, Channel::A), &seeds);
        let costs_b = self.replicate_seeds(&Subject::Single(b, Channel::B), &seeds);

        if joint {
            let summed: Vec<f64> = costs_a.iter().zip(&costs_b).map(|(x, y)| x + y).collect();
            let (mean, variance) = mean_variance(&summed)?;
            Ok(PilotSummary::Joint { mean, variance })
        } else {
            let (mean_a, var_a) = mean_variance(&costs_a)?;
            let (mean_b, var_b) = mean_variance(&costs_b)?;
            Ok(PilotSummary::Separate {
                means: [mean_a, mean_b],
                variances: [var_a, var_b],
            })
        }
    }

    fn replicate_seeds(&self, subject: &Subject<'_>, seeds: &[u64]) -> Vec<f64> {
        self.map_replications(seeds, |&seed| {
            let demands = self.source.generate(&self.params, Some(seed));
            subject.replicate(&demands)
        })
    }

    fn replicate_demands(&self, subject: &Subject<'_>, demands: &[Arc<DemandPair>]) -> Vec<f64> {
        self.map_replications(demands, |pair| subject.replicate(pair))
    }

    /// Maps each replication input to its cost, in input order.
    fn map_replications<T, F>(&self, items: &[T], f: F) -> Vec<f64>
    where
        T: Sync,
        F: Fn(&T) -> f64 + Sync + Send,
    {
        #[cfg(feature = "parallel")]
        {
            if self.config.parallel {
                use rayon::prelude::*;
                return items.par_iter().map(f).collect();
            }
        }
        items.iter().map(f).collect()
    }
}
