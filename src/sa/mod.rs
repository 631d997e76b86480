//! Simulated annealing policy search (SARS).
//!
//! Searches (s, S) policies by simulated annealing where every objective
//! value is a ranking-and-selection sample mean. All evaluations in a run
//! share one seed cache, so a proposal and the policy it challenges are
//! scored on the same demand draws.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Ahmed & Alkhamis (2002), "Simulation-based optimization using simulated
//!   annealing with ranking and selection"

mod config;
mod runner;
mod types;

pub use config::SaConfig;
pub use runner::{SaResult, SaRunner};
pub use types::{JointInventoryProblem, SaProblem, SingleInventoryProblem};
