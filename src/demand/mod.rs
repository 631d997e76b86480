//! Demand generation and random-number reuse.
//!
//! The [`DemandSource`] trait is the contract the rest of the crate depends
//! on. [`SeedCache`] and [`DemandStream`] implement common random numbers:
//! replication `i` always draws its demand from seed `i`, so systems compared
//! against each other see identical demand.

mod seeds;
mod source;
mod stream;

pub use seeds::{SeedCache, MAX_REPLICATIONS};
pub use source::{
    normal_cdf, Channel, CorrelatedExponential, DemandPair, DemandParams, DemandSource,
};
pub use stream::DemandStream;
