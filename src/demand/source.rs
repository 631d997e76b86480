//! Demand generation contract and the Gaussian-copula exponential generator.

use rand::Rng;
use rand_distr::StandardNormal;
use statrs::function::erf::erfc;

use crate::error::{Result, SarsError};
use crate::random::create_rng;

/// Parameters of one pair of demand sequences.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DemandParams {
    /// Number of periods per sequence.
    pub periods: usize,
    /// Rate of the first marginal (mean demand is `1 / rate_a`).
    pub rate_a: f64,
    /// Rate of the second marginal.
    pub rate_b: f64,
    /// Correlation of the underlying Gaussian pair, in `[-1, 1]`.
    pub correlation: f64,
}

impl DemandParams {
    pub fn new(periods: usize, rate_a: f64, rate_b: f64, correlation: f64) -> Self {
        Self {
            periods,
            rate_a,
            rate_b,
            correlation,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.rate_a > 0.0 && self.rate_a.is_finite()) {
            return Err(SarsError::InvalidDemand(format!(
                "rate_a must be positive, got {}",
                self.rate_a
            )));
        }
        if !(self.rate_b > 0.0 && self.rate_b.is_finite()) {
            return Err(SarsError::InvalidDemand(format!(
                "rate_b must be positive, got {}",
                self.rate_b
            )));
        }
        if !(-1.0..=1.0).contains(&self.correlation) {
            return Err(SarsError::InvalidDemand(format!(
                "correlation must be in [-1, 1], got {}",
                self.correlation
            )));
        }
        Ok(())
    }
}

/// Which sequence of a [`DemandPair`] an inventory consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Channel {
    A,
    B,
}

/// Two equal-length sequences of non-negative demands.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandPair {
    pub a: Vec<f64>,
    pub b: Vec<f64>,
}

impl DemandPair {
    pub fn channel(&self, channel: Channel) -> &[f64] {
        match channel {
            Channel::A => &self.a,
            Channel::B => &self.b,
        }
    }

    pub fn len(&self) -> usize {
        self.a.len()
    }

    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }
}

/// Produces pairs of demand sequences.
///
/// With `Some(seed)` the call must be deterministic in
/// `(params, seed)`; with `None` it draws fresh randomness.
///
/// Closures of the form `Fn(&DemandParams, Option<u64>) -> DemandPair`
/// implement this trait, which keeps test doubles short.
pub trait DemandSource: Send + Sync {
    fn generate(&self, params: &DemandParams, seed: Option<u64>) -> DemandPair;
}

impl<F> DemandSource for F
where
    F: Fn(&DemandParams, Option<u64>) -> DemandPair + Send + Sync,
{
    fn generate(&self, params: &DemandParams, seed: Option<u64>) -> DemandPair {
        self(params, seed)
    }
}

/// Correlated exponential demands via a bivariate Gaussian copula.
///
/// Draws `(z1, z2)` standard normal with correlation `rho` and maps each
/// through `-ln(Phi(z)) / rate`, which yields exponential marginals with means
/// `1 / rate_a` and `1 / rate_b`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorrelatedExponential;

impl DemandSource for CorrelatedExponential {
    fn generate(&self, params: &DemandParams, seed: Option<u64>) -> DemandPair {
        let mut rng = create_rng(seed);
        let rho = params.correlation;
        let tail = (1.0 - rho * rho).max(0.0).sqrt();

        let mut a = Vec::with_capacity(params.periods);
        let mut b = Vec::with_capacity(params.periods);
        for _ in 0..params.periods {
            let x: f64 = rng.sample(StandardNormal);
            let y: f64 = rng.sample(StandardNormal);
            let z1 = x;
            let z2 = rho * x + tail * y;
            a.push(exponential_quantile(z1, params.rate_a));
            b.push(exponential_quantile(z2, params.rate_b));
        }
        DemandPair { a, b }
    }
}

fn exponential_quantile(z: f64, rate: f64) -> f64 {
    let u = normal_cdf(z).max(f64::MIN_POSITIVE);
    (-u.ln() / rate).max(0.0)
}

/// Standard normal CDF.
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * erfc(-z / std::f64::consts::SQRT_2)
}
