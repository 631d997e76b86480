//! Core trait for the policy search and its two inventory problems.

use std::fmt;

use rand::Rng;

use crate::demand::{Channel, DemandSource, SeedCache};
use crate::error::Result;
use crate::inventory::{Inventory, JointPolicy, Policy};
use crate::ranking::{RankSelect, SampleMean};

/// Defines a policy-search problem with a noisy objective.
///
/// The search framework handles temperature, acceptance and the shared seed
/// cache. The problem supplies the starting point, neighbor proposals and a
/// sample-mean evaluation.
///
/// # Minimization
///
/// Lower sample means are better.
pub trait SaProblem: Sync {
    /// The policy representation.
    type Solution: Clone + Send + fmt::Debug;

    /// The policy the search starts from.
    fn initial_solution(&self) -> Self::Solution;

    /// Estimates the expected cost of `solution`.
    ///
    /// Passing `seeds` replays the same demand draws as earlier evaluations;
    /// the returned estimate carries the cache it used.
    fn evaluate(&self, solution: &Self::Solution, seeds: Option<&SeedCache>) -> Result<SampleMean>;

    /// Proposes a neighbor of `solution`, moving each bound by at most
    /// `max_offset`.
    fn neighbor<R: Rng>(
        &self,
        solution: &Self::Solution,
        max_offset: i32,
        rng: &mut R,
    ) -> Self::Solution;
}

/// Optimizes the policy of one inventory fed by one demand channel.
pub struct SingleInventoryProblem<'a, D: DemandSource> {
    system: Inventory,
    channel: Channel,
    estimator: &'a RankSelect<D>,
}

impl<'a, D: DemandSource> SingleInventoryProblem<'a, D> {
    /// The search starts from `system`'s current policy. The system itself is
    /// never simulated; each evaluation runs on a restarted copy.
    pub fn new(system: &Inventory, channel: Channel, estimator: &'a RankSelect<D>) -> Self {
        Self {
            system: system.restarted(),
            channel,
            estimator,
        }
    }
}

impl<D: DemandSource> SaProblem for SingleInventoryProblem<'_, D> {
    type Solution = Policy;

    fn initial_solution(&self) -> Policy {
        self.system.policy()
    }

    fn evaluate(&self, policy: &Policy, seeds: Option<&SeedCache>) -> Result<SampleMean> {
        let mut system = self.system.restarted();
        system.set_policy(*policy)?;
        self.estimator.sample_mean(&system, self.channel, seeds)
    }

    fn neighbor<R: Rng>(&self, policy: &Policy, max_offset: i32, rng: &mut R) -> Policy {
        policy.neighbor(max_offset, rng)
    }
}

/// Optimizes the policies of two inventories against their summed cost under
/// correlated demand: `a` consumes channel A and `b` channel B.
pub struct JointInventoryProblem<'a, D: DemandSource> {
    a: Inventory,
    b: Inventory,
    estimator: &'a RankSelect<D>,
}

impl<'a, D: DemandSource> JointInventoryProblem<'a, D> {
    pub fn new(a: &Inventory, b: &Inventory, estimator: &'a RankSelect<D>) -> Self {
        Self {
            a: a.restarted(),
            b: b.restarted(),
            estimator,
        }
    }
}

impl<D: DemandSource> SaProblem for JointInventoryProblem<'_, D> {
    type Solution = JointPolicy;

    fn initial_solution(&self) -> JointPolicy {
        JointPolicy::new(self.a.policy(), self.b.policy())
    }

    fn evaluate(&self, policy: &JointPolicy, seeds: Option<&SeedCache>) -> Result<SampleMean> {
        let mut a = self.a.restarted();
        let mut b = self.b.restarted();
        a.set_policy(policy.a)?;
        b.set_policy(policy.b)?;
        self.estimator.joint_sample_mean(&a, &b, seeds)
    }

    fn neighbor<R: Rng>(&self, policy: &JointPolicy, max_offset: i32, rng: &mut R) -> JointPolicy {
        policy.neighbor(max_offset, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demand::{CorrelatedExponential, DemandParams};
    use crate::inventory::CostParams;
    use crate::random::create_rng;
    use crate::ranking::RankSelectConfig;
    use crate::SarsError;

    fn estimator() -> RankSelect<CorrelatedExponential> {
        RankSelect::new(
            CorrelatedExponential,
            DemandParams::new(40, 0.12, 0.10, -0.8),
            RankSelectConfig::default().with_ranking(false).with_seed(4),
        )
        .unwrap()
    }

    #[test]
    fn test_single_problem_evaluates_candidate_policy() {
        let est = estimator();
        let system = Inventory::new(
            50.0,
            CostParams::new(3.0, 5.0, 1.0, 32.0, 0),
            Policy::new(50.0, 100.0),
        );
        let problem = SingleInventoryProblem::new(&system, Channel::A, &est);
        assert_eq!(problem.initial_solution(), Policy::new(50.0, 100.0));

        let seeds = SeedCache::new(Some(1));
        let candidate = Policy::new(10.0, 40.0);
        let via_problem = problem.evaluate(&candidate, Some(&seeds)).unwrap();

        let mut direct = system.restarted();
        direct.set_policy(candidate).unwrap();
        let expected = est.sample_mean(&direct, Channel::A, Some(&seeds)).unwrap();
        assert_eq!(via_problem.value, expected.value);

        assert!(matches!(
            problem.evaluate(&Policy::new(5.0, 5.0), None),
            Err(SarsError::InvalidPolicy { .. })
        ));
    }

    #[test]
    fn test_joint_problem_perturbs_both_policies() {
        let est = estimator();
        let a = Inventory::new(
            50.0,
            CostParams::new(3.0, 5.0, 1.0, 32.0, 0),
            Policy::new(50.0, 100.0),
        );
        let b = Inventory::new(
            50.0,
            CostParams::new(3.0, 20.0, 1.0, 5.0, 0),
            Policy::new(50.0, 100.0),
        );
        let problem = JointInventoryProblem::new(&a, &b, &est);
        let start = problem.initial_solution();

        let mut rng = create_rng(Some(8));
        let mut moved_a = false;
        let mut moved_b = false;
        for _ in 0..50 {
            let next = problem.neighbor(&start, 5, &mut rng);
            moved_a |= next.a != start.a;
            moved_b |= next.b != start.b;
        }
        assert!(moved_a && moved_b);

        let estimate = problem.evaluate(&start, None).unwrap();
        assert!(estimate.value > 0.0);
        assert_eq!(estimate.replications, 20);
    }
}
