//! Policy and cost parameter types.

use rand::Rng;
use tracing::warn;

use crate::error::{Result, SarsError};

/// An (s, S) replenishment policy.
///
/// When the inventory level drops strictly below `low` and no order is in
/// flight, an order is placed that brings the level back up to `top`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Policy {
    /// Reorder point `s`.
    pub low: f64,
    /// Order-up-to level `S`.
    pub top: f64,
}

impl Policy {
    /// Creates a policy without checking `low < top`.
    ///
    /// Use [`Policy::checked`] when the bounds come from untrusted input.
    pub fn new(low: f64, top: f64) -> Self {
        Self { low, top }
    }

    /// Creates a policy, rejecting `low >= top`.
    pub fn checked(low: f64, top: f64) -> Result<Self> {
        let policy = Self { low, top };
        policy.validate()?;
        Ok(policy)
    }

    /// Checks the `low < top` invariant.
    pub fn validate(&self) -> Result<()> {
        if self.low < self.top {
            Ok(())
        } else {
            Err(SarsError::InvalidPolicy {
                low: self.low,
                top: self.top,
            })
        }
    }

    /// Proposes a random neighboring policy.
    ///
    /// Each bound moves by an independent integer offset drawn uniformly from
    /// `[-max_offset, max_offset]`. If the bounds cross they are swapped; if
    /// they coincide, `top` is pushed one unit up so the result always
    /// satisfies `low < top`.
    pub fn neighbor<R: Rng>(&self, max_offset: i32, rng: &mut R) -> Self {
        let mut low = self.low + f64::from(rng.random_range(-max_offset..=max_offset));
        let mut top = self.top + f64::from(rng.random_range(-max_offset..=max_offset));
        if low > top {
            std::mem::swap(&mut low, &mut top);
        }
        if low == top {
            warn!(low, "proposed policy collapsed to a single level; widening top");
            top += 1.0;
        }
        Self { low, top }
    }
}

impl From<(f64, f64)> for Policy {
    fn from((low, top): (f64, f64)) -> Self {
        Self::new(low, top)
    }
}

/// Policies of two inventories optimized jointly.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JointPolicy {
    pub a: Policy,
    pub b: Policy,
}

impl JointPolicy {
    pub fn new(a: Policy, b: Policy) -> Self {
        Self { a, b }
    }

    /// Perturbs both policies independently.
    pub fn neighbor<R: Rng>(&self, max_offset: i32, rng: &mut R) -> Self {
        Self {
            a: self.a.neighbor(max_offset, rng),
            b: self.b.neighbor(max_offset, rng),
        }
    }
}

/// Cost structure and lead time of one inventory, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostParams {
    /// Purchase cost per unit ordered.
    pub unit_cost: f64,
    /// Penalty per backlogged unit per period.
    pub backlog_cost: f64,
    /// Holding cost per in-stock unit per period.
    pub hold_cost: f64,
    /// Fixed cost charged once per order placed.
    pub setup_cost: f64,
    /// Periods between placing an order and receiving it.
    pub lead_time: u32,
}

impl CostParams {
    pub fn new(
        unit_cost: f64,
        backlog_cost: f64,
        hold_cost: f64,
        setup_cost: f64,
        lead_time: u32,
    ) -> Self {
        Self {
            unit_cost,
            backlog_cost,
            hold_cost,
            setup_cost,
            lead_time,
        }
    }

    /// Rejects negative or non-finite costs.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("unit_cost", self.unit_cost),
            ("backlog_cost", self.backlog_cost),
            ("hold_cost", self.hold_cost),
            ("setup_cost", self.setup_cost),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(SarsError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}
