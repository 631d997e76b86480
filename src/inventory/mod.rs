//! Periodic-review (s, S) inventory simulation.
//!
//! An [`Inventory`] is a value type: it owns its trajectory histories and can
//! be copied freely, so comparison runs never perturb the system they were
//! derived from.

mod state;
mod types;

pub use state::Inventory;
pub use types::{CostParams, JointPolicy, Policy};
