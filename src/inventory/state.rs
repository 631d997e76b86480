//! Periodic-review inventory state machine.
//!
//! Each call to [`Inventory::step`] consumes one period of demand:
//!
//! 1. Demand is subtracted from the level; the resulting backlog is recorded.
//! 2. An in-flight order whose lead time has elapsed is received.
//! 3. If the level is strictly below the reorder point and nothing is in
//!    flight, an order for `top - level` units is placed.
//! 4. Level, order arrival and one-period cost are appended to the histories.
//!
//! The setup and per-unit purchase costs are charged once, in the period the
//! order is placed.

use std::fmt;

use super::types::{CostParams, Policy};
use crate::error::Result;

/// State of a single (s, S) inventory together with its trajectory.
///
/// `Clone` is a deep copy of the full state, histories included. Use
/// [`Inventory::restarted`] for an independent system that starts over from
/// the initial level.
#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    level: f64,
    initial_level: f64,
    in_stock: f64,
    backlog: f64,
    /// Quantity ordered in the current period, zero otherwise.
    placed_order: f64,
    /// Quantity in flight, received once `order_elapsed >= lead_time`.
    pending_order: f64,
    order_elapsed: u32,
    order_in_flight: bool,
    policy: Policy,
    costs: CostParams,
    level_history: Vec<f64>,
    order_arrivals: Vec<f64>,
    backlog_history: Vec<f64>,
    cost_history: Vec<f64>,
}

impl Inventory {
    /// Creates an inventory at `level`. The policy is not validated here;
    /// [`Inventory::set_policy`] is the checked entry point.
    pub fn new(level: f64, costs: CostParams, policy: Policy) -> Self {
        let mut inventory = Self {
            level,
            initial_level: level,
            in_stock: 0.0,
            backlog: 0.0,
            placed_order: 0.0,
            pending_order: 0.0,
            order_elapsed: 0,
            order_in_flight: false,
            policy,
            costs,
            level_history: Vec::new(),
            order_arrivals: Vec::new(),
            backlog_history: Vec::new(),
            cost_history: Vec::new(),
        };
        inventory.reset();
        inventory
    }

    /// Returns a fresh, independent system built from this one's initial
    /// level, cost parameters and current policy.
    ///
    /// Mid-run state and histories are not carried over, so replications and
    /// candidate evaluations always start from a common baseline.
    pub fn restarted(&self) -> Self {
        Self::new(self.initial_level, self.costs, self.policy)
    }

    /// Restores the construction-time state and discards all history.
    pub fn reset(&mut self) {
        self.level = self.initial_level;
        self.in_stock = self.level.max(0.0);
        self.backlog = (-self.level).max(0.0);
        self.placed_order = 0.0;
        self.pending_order = 0.0;
        self.order_elapsed = 0;
        self.order_in_flight = false;

        self.level_history.clear();
        self.order_arrivals.clear();
        self.backlog_history.clear();
        self.cost_history.clear();

        self.level_history.push(self.level);
        self.order_arrivals.push(0.0);
        self.backlog_history.push(self.backlog);
        let cost = self.period_cost(self.backlog);
        self.cost_history.push(cost);
    }

    /// Replaces the policy. On `low >= top` the previous policy is kept and
    /// [`SarsError::InvalidPolicy`](crate::SarsError::InvalidPolicy) is returned.
    pub fn set_policy(&mut self, policy: Policy) -> Result<()> {
        policy.validate()?;
        self.policy = policy;
        Ok(())
    }

    /// Advances the system by one period with demand `demand`.
    ///
    /// The shortfall left by demand, before any delivery, is what the period
    /// records and charges as backlog. The `backlog` state is refreshed after
    /// a delivery, so a period ends with stock or backlog but never both.
    pub fn step(&mut self, demand: f64) {
        self.placed_order = 0.0;
        self.level -= demand;
        let shortfall = (-self.level).max(0.0);
        self.backlog_history.push(shortfall);

        let mut arrived = 0.0;
        if self.order_in_flight && self.order_elapsed >= self.costs.lead_time {
            self.level += self.pending_order;
            arrived = self.pending_order;
            self.pending_order = 0.0;
            self.order_elapsed = 0;
            self.order_in_flight = false;
        }
        self.order_arrivals.push(arrived);

        if self.level < self.policy.low && !self.order_in_flight {
            self.placed_order = self.policy.top - self.level;
            self.pending_order = self.placed_order;
            self.order_in_flight = true;
        }

        self.in_stock = self.level.max(0.0);
        self.backlog = (-self.level).max(0.0);
        self.level_history.push(self.level);

        if self.order_in_flight {
            self.order_elapsed += 1;
        }

        let cost = self.period_cost(shortfall);
        self.cost_history.push(cost);
    }

    /// Runs one period per element of `demands`, in order.
    pub fn simulate(&mut self, demands: &[f64]) {
        for &demand in demands {
            self.step(demand);
        }
    }

    /// Mean of the cost history, including the period-0 entry.
    pub fn average_cost(&self) -> f64 {
        // The history always holds at least the period-0 entry.
        self.cost_history.iter().sum::<f64>() / self.cost_history.len() as f64
    }

    /// Cost charged for the most recent period, period 0 before any step.
    pub fn one_period_cost(&self) -> f64 {
        self.cost_history.last().copied().unwrap_or_default()
    }

    fn period_cost(&self, backlog: f64) -> f64 {
        let mut cost = self.in_stock * self.costs.hold_cost + backlog * self.costs.backlog_cost;
        if self.placed_order != 0.0 {
            cost += self.costs.setup_cost + self.costs.unit_cost * self.placed_order;
        }
        cost
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn costs(&self) -> CostParams {
        self.costs
    }

    pub fn level(&self) -> f64 {
        self.level
    }

    pub fn initial_level(&self) -> f64 {
        self.initial_level
    }

    pub fn in_stock(&self) -> f64 {
        self.in_stock
    }

    pub fn backlog(&self) -> f64 {
        self.backlog
    }

    /// Units in flight, zero when no order is outstanding.
    pub fn pending_order(&self) -> f64 {
        self.pending_order
    }

    /// Periods elapsed since the outstanding order was placed.
    pub fn order_elapsed(&self) -> u32 {
        self.order_elapsed
    }

    pub fn order_in_flight(&self) -> bool {
        self.order_in_flight
    }

    /// Quantity ordered in the most recent period, zero if none.
    pub fn placed_order(&self) -> f64 {
        self.placed_order
    }

    pub fn level_history(&self) -> &[f64] {
        &self.level_history
    }

    pub fn backlog_history(&self) -> &[f64] {
        &self.backlog_history
    }

    pub fn cost_history(&self) -> &[f64] {
        &self.cost_history
    }

    /// Quantity received in each period, zero where nothing arrived.
    pub fn order_arrivals(&self) -> &[f64] {
        &self.order_arrivals
    }

    /// Number of simulated periods, excluding period 0.
    pub fn periods(&self) -> usize {
        self.level_history.len() - 1
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Inventory level............ {}", self.level)?;
        writeln!(f, "In-stock items............. {}", self.in_stock)?;
        writeln!(f, "Backlogged items........... {}", self.backlog)?;
        writeln!(f, "Placed order............... {}", self.placed_order)?;
        writeln!(f, "Pending order.............. {}", self.pending_order)?;
        writeln!(f, "Lead time.................. {}", self.costs.lead_time)?;
        writeln!(f, "Lead time elapsed.......... {}", self.order_elapsed)?;
        writeln!(
            f,
            "Policy (s, S).............. ({}, {})",
            self.policy.low, self.policy.top
        )?;
        writeln!(f, "Cost per item.............. {}", self.costs.unit_cost)?;
        writeln!(f, "Backlog cost per item...... {}", self.costs.backlog_cost)?;
        writeln!(f, "Holding cost per item...... {}", self.costs.hold_cost)?;
        writeln!(f, "Set-up cost................ {}", self.costs.setup_cost)?;
        writeln!(f, "One period cost............ {}", self.one_period_cost())?;
        write!(f, "Average cost............... {}", self.average_cost())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SarsError;
    use proptest::prelude::*;

    fn reference_inventory() -> Inventory {
        Inventory::new(
            50.0,
            CostParams::new(3.0, 5.0, 1.0, 32.0, 0),
            Policy::new(50.0, 100.0),
        )
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {b}, got {a}");
    }

    #[test]
    fn test_initial_state() {
        let inv = reference_inventory();
        assert_eq!(inv.level_history(), &[50.0]);
        assert_eq!(inv.backlog_history(), &[0.0]);
        assert_eq!(inv.order_arrivals(), &[0.0]);
        assert_eq!(inv.cost_history(), &[50.0]);
        assert_eq!(inv.periods(), 0);
        assert_close(inv.average_cost(), 50.0);
    }

    #[test]
    fn test_reorder_point_is_strict() {
        // Level equal to `low` must not trigger an order.
        let mut inv = reference_inventory();
        inv.step(0.0);
        assert!(!inv.order_in_flight());
        assert_eq!(inv.placed_order(), 0.0);
    }

    #[test]
    fn test_reference_trajectory() {
        let mut inv = reference_inventory();

        // Period 1: 50 - 2.1 = 47.9 < 50, order 52.1 units.
        inv.step(2.1);
        assert!(inv.order_in_flight());
        assert_close(inv.placed_order(), 52.1);
        assert_close(inv.pending_order(), 52.1);
        assert_eq!(inv.order_elapsed(), 1);
        assert_close(inv.cost_history()[1], 47.9 + 32.0 + 3.0 * 52.1);

        // Period 2: order arrives (lead time 0), no new order.
        inv.step(10.6);
        assert!(!inv.order_in_flight());
        assert_close(inv.order_arrivals()[2], 52.1);
        assert_close(inv.level(), 89.4);
        assert_eq!(inv.order_elapsed(), 0);
        assert_close(inv.cost_history()[2], 89.4);

        inv.simulate(&[19.6, 5.9]);
        let expected_levels = [50.0, 47.9, 89.4, 69.8, 63.9];
        for (got, want) in inv.level_history().iter().zip(expected_levels) {
            assert_close(*got, want);
        }
        assert_eq!(inv.periods(), 4);
        assert_close(
            inv.average_cost(),
            (50.0 + 236.2 + 89.4 + 69.8 + 63.9) / 5.0,
        );
    }

    #[test]
    fn test_lead_time_delays_arrival() {
        let mut inv = Inventory::new(
            10.0,
            CostParams::new(1.0, 2.0, 1.0, 0.0, 2),
            Policy::new(5.0, 20.0),
        );
        inv.step(6.0); // level 4, order 16 placed, elapsed 1
        assert!(inv.order_in_flight());
        inv.step(1.0); // elapsed 1 < 2, still in flight, elapsed 2
        assert!(inv.order_in_flight());
        assert_close(inv.level(), 3.0);
        // No second order while one is in flight.
        assert_eq!(inv.placed_order(), 0.0);
        inv.step(1.0); // elapsed 2 >= 2, arrives
        assert!(!inv.order_in_flight());
        assert_close(inv.level(), 18.0);
        assert_close(inv.order_arrivals()[3], 16.0);
    }

    #[test]
    fn test_backlog_cost() {
        let mut inv = Inventory::new(
            2.0,
            CostParams::new(1.0, 4.0, 1.0, 10.0, 3),
            Policy::new(-100.0, 0.0),
        );
        inv.step(5.0);
        assert_close(inv.backlog(), 3.0);
        assert_eq!(inv.in_stock(), 0.0);
        assert_close(inv.cost_history()[1], 12.0);
    }

    #[test]
    fn test_delivery_into_backlog_clears_backlog_state() {
        let mut inv = Inventory::new(
            50.0,
            CostParams::new(3.0, 5.0, 1.0, 32.0, 1),
            Policy::new(10.0, 60.0),
        );
        inv.step(45.0); // level 5, order 55 placed
        inv.step(20.0); // level -15, then the order lands: 40

        assert_close(inv.level(), 40.0);
        assert_close(inv.in_stock(), 40.0);
        assert_eq!(inv.backlog(), 0.0);
        assert_eq!(inv.in_stock() * inv.backlog(), 0.0);

        // The period still records and pays for the pre-delivery shortfall.
        assert_close(inv.backlog_history()[2], 15.0);
        assert_close(inv.cost_history()[2], 40.0 + 5.0 * 15.0);
        assert_close(inv.one_period_cost(), 115.0);
    }

    #[test]
    fn test_set_policy_rejects_inverted() {
        let mut inv = reference_inventory();
        let err = inv.set_policy(Policy::new(100.0, 50.0)).unwrap_err();
        assert!(matches!(err, SarsError::InvalidPolicy { .. }));
        assert_eq!(inv.policy(), Policy::new(50.0, 100.0));

        inv.set_policy(Policy::new(10.0, 40.0)).unwrap();
        assert_eq!(inv.policy(), Policy::new(10.0, 40.0));
    }

    #[test]
    fn test_restarted_uses_initial_level_and_current_policy() {
        let mut inv = reference_inventory();
        inv.simulate(&[30.0, 5.0]);
        inv.set_policy(Policy::new(10.0, 40.0)).unwrap();

        let fresh = inv.restarted();
        assert_eq!(fresh.level(), 50.0);
        assert_eq!(fresh.periods(), 0);
        assert_eq!(fresh.policy(), Policy::new(10.0, 40.0));
        assert!(!fresh.order_in_flight());
    }

    #[test]
    fn test_display_mentions_policy() {
        let text = reference_inventory().to_string();
        assert!(text.contains("Policy (s, S).............. (50, 100)"));
        assert!(text.contains("Average cost"));
    }

    fn demands() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(0.0f64..60.0, 0..80)
    }

    fn policies() -> impl Strategy<Value = Policy> {
        (-50.0f64..80.0, 1.0f64..120.0).prop_map(|(low, gap)| Policy::new(low, low + gap))
    }

    proptest! {
        #[test]
        fn prop_stock_and_backlog_exclusive(
            policy in policies(),
            level in -40.0f64..150.0,
            lead_time in 0u32..4,
            demands in demands(),
        ) {
            let costs = CostParams::new(3.0, 5.0, 1.0, 32.0, lead_time);
            let mut inv = Inventory::new(level, costs, policy);
            prop_assert_eq!(inv.in_stock() * inv.backlog(), 0.0);
            for d in demands {
                inv.step(d);
                prop_assert_eq!(inv.in_stock() * inv.backlog(), 0.0);
                prop_assert!(inv.pending_order() <= 0.0 || inv.order_in_flight());
            }
        }

        #[test]
        fn prop_reset_reproduces_histories(policy in policies(), demands in demands()) {
            let mut once = Inventory::new(50.0, CostParams::new(3.0, 5.0, 1.0, 32.0, 1), policy);
            once.simulate(&demands);

            let mut replay = Inventory::new(50.0, CostParams::new(3.0, 5.0, 1.0, 32.0, 1), policy);
            replay.simulate(&[7.0, 40.0, 3.5]);
            replay.reset();
            replay.simulate(&demands);

            prop_assert_eq!(once.cost_history(), replay.cost_history());
            prop_assert_eq!(once.level_history(), replay.level_history());
            prop_assert_eq!(once.backlog_history(), replay.backlog_history());
            prop_assert_eq!(once.order_arrivals(), replay.order_arrivals());
        }

        #[test]
        fn prop_copies_do_not_alias(policy in policies(), demands in demands()) {
            let costs = CostParams::new(3.0, 5.0, 1.0, 32.0, 0);
            let mut original = Inventory::new(50.0, costs, policy);
            original.simulate(&[4.0, 9.0]);
            let before = original.clone();

            let mut deep = original.clone();
            deep.simulate(&demands);
            let mut fresh = original.restarted();
            fresh.simulate(&demands);

            prop_assert_eq!(&original, &before);
        }
    }
}
