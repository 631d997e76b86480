//! SA configuration.

use crate::error::{Result, SarsError};

/// Configuration for the policy search.
///
/// The temperature stays fixed for `markov_length` proposals, then is
/// multiplied by `cooling_factor`. The search stops once `repeats` proposals
/// have been evaluated in total.
///
/// # Examples
///
/// ```
/// use inventory_sars::sa::SaConfig;
///
/// let config = SaConfig::default()
///     .with_initial_temperature(10.0)
///     .with_cooling_factor(0.5)
///     .with_markov_length(50)
///     .with_repeats(200)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaConfig {
    /// Initial temperature. Higher values accept more uphill moves.
    pub initial_temperature: f64,

    /// Geometric cooling factor in (0, 1): `T_{k+1} = cooling_factor * T_k`.
    pub cooling_factor: f64,

    /// Proposals evaluated at each temperature level.
    pub markov_length: usize,

    /// Total proposals before the search stops. The current Markov chain is
    /// always completed, so the count can overshoot by up to
    /// `markov_length - 1`.
    pub repeats: usize,

    /// Largest integer offset applied to a policy bound in one proposal.
    pub max_offset: i32,

    /// Random seed for proposals and acceptance draws.
    pub seed: Option<u64>,

    /// Optional wall-clock budget in milliseconds.
    ///
    /// Checked before each proposal; a run that hits it returns the best
    /// policy found so far with `cancelled` set.
    pub time_limit_ms: Option<u64>,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temperature: 10.0,
            cooling_factor: 0.5,
            markov_length: 50,
            repeats: 100,
            max_offset: 5,
            seed: None,
            time_limit_ms: None,
        }
    }
}

impl SaConfig {
    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = t;
        self
    }

    pub fn with_cooling_factor(mut self, factor: f64) -> Self {
        self.cooling_factor = factor;
        self
    }

    pub fn with_markov_length(mut self, n: usize) -> Self {
        self.markov_length = n;
        self
    }

    pub fn with_repeats(mut self, n: usize) -> Self {
        self.repeats = n;
        self
    }

    pub fn with_max_offset(mut self, offset: i32) -> Self {
        self.max_offset = offset;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.initial_temperature > 0.0 && self.initial_temperature.is_finite()) {
            return Err(SarsError::InvalidConfig(format!(
                "initial_temperature must be positive, got {}",
                self.initial_temperature
            )));
        }
        if self.cooling_factor <= 0.0 || self.cooling_factor >= 1.0 {
            return Err(SarsError::InvalidConfig(format!(
                "cooling_factor must be in (0, 1), got {}",
                self.cooling_factor
            )));
        }
        if self.max_offset < 1 {
            return Err(SarsError::InvalidConfig(format!(
                "max_offset must be at least 1, got {}",
                self.max_offset
            )));
        }
        Ok(())
    }
}
