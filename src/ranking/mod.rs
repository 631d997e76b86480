//! Ranking and selection (R&S).
//!
//! A sequential indifference-zone procedure that turns noisy simulation
//! averages into a sample mean whose precision is controlled by `delta`
//! (indifference-zone half-width) and `beta` (confidence). Replications reuse
//! cached seeds so that competing policies face common random numbers.
//!
//! # References
//!
//! - Rinott, Y. (1978), "On two-stage selection procedures and related
//!   probability-inequalities"
//! - Law, A. M. (2015), *Simulation Modeling and Analysis*, §10.4

mod config;
mod estimator;
mod stats;
mod table;

pub use config::RankSelectConfig;
pub use estimator::{Comparison, PilotSummary, RankSelect, SampleMean};
pub use stats::{mean_variance, rinott_weight, second_stage_size};
pub use table::{h_value, H_TABLE};
