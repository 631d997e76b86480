//! SA execution loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rand::Rng;
use tracing::{debug, info, instrument};

use super::config::SaConfig;
use super::types::SaProblem;
use crate::demand::SeedCache;
use crate::error::Result;
use crate::random::create_rng;

/// Result of a policy search.
#[derive(Debug, Clone)]
pub struct SaResult<S: Clone> {
    /// The best policy accepted during the search.
    pub best: S,

    /// Sample mean of the best policy when it was accepted.
    pub best_mean: f64,

    /// The policy the chain ended on.
    pub current: S,

    /// Sample mean of the final policy.
    pub current_mean: f64,

    /// Sample mean of every accepted proposal, in acceptance order.
    pub history: Vec<f64>,

    /// Proposals evaluated.
    pub iterations: usize,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of proposals whose mean did not exceed the current one.
    pub improving_moves: usize,

    /// Temperature when the search stopped.
    pub final_temperature: f64,

    /// Whether the search was cancelled or ran out of time.
    pub cancelled: bool,

    /// Seed cache shared by every evaluation of the run.
    pub seeds: SeedCache,
}

/// Executes the policy search.
pub struct SaRunner;

impl SaRunner {
    /// Runs the search to completion.
    pub fn run<P: SaProblem>(problem: &P, config: &SaConfig) -> Result<SaResult<P::Solution>> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs the search with an optional cancellation token.
    ///
    /// The initial policy is evaluated with a fresh seed cache; every
    /// proposal afterwards reuses the cache of the accepted estimate, so all
    /// policies are compared under common random numbers.
    #[instrument(skip_all, fields(repeats = config.repeats, markov_length = config.markov_length))]
    pub fn run_with_cancel<P: SaProblem>(
        problem: &P,
        config: &SaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SaResult<P::Solution>> {
        config.validate()?;

        let mut rng = create_rng(config.seed);
        let started = Instant::now();

        let mut current = problem.initial_solution();
        let initial = problem.evaluate(&current, None)?;
        let mut current_mean = initial.value;
        let mut seeds = initial.seeds;
        let mut best = current.clone();
        let mut best_mean = current_mean;

        let mut temperature = config.initial_temperature;
        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut cancelled = false;
        let mut history = Vec::new();

        // An empty chain would never advance the proposal count.
        'search: while config.markov_length > 0 && iterations < config.repeats {
            for _ in 0..config.markov_length {
                if should_stop(cancel.as_deref(), started, config.time_limit_ms) {
                    cancelled = true;
                    break 'search;
                }

                let candidate = problem.neighbor(&current, config.max_offset, &mut rng);
                let estimate = problem.evaluate(&candidate, Some(&seeds))?;

                // Metropolis acceptance criterion
                let accept = if estimate.value <= current_mean {
                    improving_moves += 1;
                    true
                } else {
                    let probability = (-(estimate.value - current_mean) / temperature).exp();
                    rng.random_range(0.0..1.0) <= probability
                };

                if accept {
                    current = candidate;
                    current_mean = estimate.value;
                    seeds = estimate.seeds;
                    accepted_moves += 1;
                    history.push(current_mean);
                    debug!(iteration = iterations, mean = current_mean, temperature, "accepted");

                    if current_mean <= best_mean {
                        best = current.clone();
                        best_mean = current_mean;
                    }
                }

                iterations += 1;
            }

            temperature *= config.cooling_factor;
        }

        info!(
            iterations,
            accepted_moves,
            best_mean,
            cancelled,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search finished"
        );

        Ok(SaResult {
            best,
            best_mean,
            current,
            current_mean,
            history,
            iterations,
            accepted_moves,
            improving_moves,
            final_temperature: temperature,
            cancelled,
            seeds,
        })
    }
}

fn should_stop(cancel: Option<&AtomicBool>, started: Instant, time_limit_ms: Option<u64>) -> bool {
    if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
        return true;
    }
    time_limit_ms.is_some_and(|ms| started.elapsed().as_millis() >= u128::from(ms))
}
