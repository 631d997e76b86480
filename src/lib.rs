//! Simulation-based optimization of (s, S) inventory policies.
//!
//! The crate combines three layers:
//!
//! - **Inventory**: a periodic-review (s, S) system with lead time, setup,
//!   unit, holding and backlog costs.
//! - **Ranking & selection**: Rinott's two-stage procedure, turning noisy
//!   replications into a sample mean with controlled precision. Replications
//!   draw demand from a shared seed cache (common random numbers).
//! - **Simulated annealing**: policy search over one inventory or a pair of
//!   inventories fed by negatively correlated demand.
//!
//! # Example
//!
//! ```
//! use inventory_sars::demand::{Channel, CorrelatedExponential, DemandParams};
//! use inventory_sars::inventory::{CostParams, Inventory, Policy};
//! use inventory_sars::ranking::{RankSelect, RankSelectConfig};
//! use inventory_sars::sa::{SaConfig, SaRunner, SingleInventoryProblem};
//!
//! let estimator = RankSelect::new(
//!     CorrelatedExponential,
//!     DemandParams::new(30, 0.12, 0.10, -0.8),
//!     RankSelectConfig::default().with_seed(3),
//! )
//! .unwrap();
//! let costs = CostParams::new(3.0, 5.0, 1.0, 32.0, 0);
//! let system = Inventory::new(50.0, costs, Policy::new(50.0, 100.0));
//! let problem = SingleInventoryProblem::new(&system, Channel::A, &estimator);
//!
//! let config = SaConfig::default().with_markov_length(5).with_repeats(10).with_seed(3);
//! let result = SaRunner::run(&problem, &config).unwrap();
//! assert!(result.best.low < result.best.top);
//! ```

pub mod demand;
pub mod error;
pub mod inventory;
pub mod random;
pub mod ranking;
pub mod sa;

pub use error::{Result, SarsError};
