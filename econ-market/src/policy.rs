//! Solving for the tax or subsidy rate that meets a target.
//!
//! Taxes are paid by producers and subsidies are paid to consumers, as in
//! [`PolicyKind::default_incidence`]. Each requested target is solved on its own, and a failure
//! to meet one target does not affect the others.

use crate::{
    curve::Curve,
    equilibrium::{solve_wedge, Market},
    error::Error,
    intervention::{wedge_offsets, PolicyKind},
    options::{RootPolicy, SolverOptions},
};
use econ_compute::{
    numerical::roots::{real_roots, scan_roots},
    primitive::rational_from_f64,
    symbolic::Polynomial,
};
use rug::Rational;
use std::fmt;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The targets to solve for. Targets that are [`None`] are skipped.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PolicyTargets {
    /// The change in traded quantity, as a magnitude. A tax decreases the quantity by this
    /// amount and a subsidy increases it.
    pub quantity_change: Option<f64>,

    /// The deadweight loss to reach.
    pub max_dwl: Option<f64>,

    /// The tax revenue or subsidy expense to reach.
    pub budget: Option<f64>,
}

impl PolicyTargets {
    /// Returns the requested targets, in the order quantity change, deadweight loss, budget.
    pub fn requested(&self) -> Vec<PolicyTarget> {
        [
            self.quantity_change.map(PolicyTarget::QuantityChange),
            self.max_dwl.map(PolicyTarget::DeadweightLoss),
            self.budget.map(PolicyTarget::Budget),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// A single target for the policy rate.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PolicyTarget {
    QuantityChange(f64),
    DeadweightLoss(f64),
    Budget(f64),
}

/// The outcome of solving for one target.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SolverResult {
    /// The rate that meets the target.
    Success(f64),

    /// The target cannot be met.
    Failure(FailureReason),
}

/// Why a target could not be met.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FailureReason {
    /// The equations have no solution, or no economically valid one.
    NoSolution,

    /// The equation for the rate has no real roots.
    NoRealSolution,

    /// The target is only supported for markets with linear curves.
    NonLinearMarket,

    /// The market with the policy in place has no equilibrium.
    NoEquilibrium,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FailureReason::NoSolution => write!(f, "No solution found"),
            FailureReason::NoRealSolution => write!(f, "No real solution found"),
            FailureReason::NonLinearMarket => write!(f, "Not applicable for non-linear market"),
            FailureReason::NoEquilibrium => write!(f, "Could not solve equilibrium with the policy"),
        }
    }
}

/// The number of times the budget scan window may double before giving up.
const MAX_BRACKET_EXPANSIONS: usize = 16;

/// Solves for the per-unit tax on producers that meets each target.
pub fn solve_tax(market: &Market, targets: &PolicyTargets) -> Vec<(PolicyTarget, SolverResult)> {
    solve(market, PolicyKind::Tax, targets)
}

/// Solves for the per-unit subsidy to consumers that meets each target.
pub fn solve_subsidy(market: &Market, targets: &PolicyTargets) -> Vec<(PolicyTarget, SolverResult)> {
    solve(market, PolicyKind::Subsidy, targets)
}

/// Solves for the rate of the given policy that meets each target.
pub fn solve(market: &Market, kind: PolicyKind, targets: &PolicyTargets) -> Vec<(PolicyTarget, SolverResult)> {
    targets.requested()
        .into_iter()
        .map(|target| {
            let result = match target {
                PolicyTarget::QuantityChange(change) => quantity_target(market, kind, change),
                PolicyTarget::DeadweightLoss(dwl) => dwl_target(market, kind, dwl),
                PolicyTarget::Budget(budget) => budget_target(market, kind, budget),
            };
            debug!(%kind, ?target, ?result, "solved policy target");
            (target, result)
        })
        .collect()
}

/// The sign of the quantity change caused by a positive rate.
fn direction(kind: PolicyKind) -> f64 {
    match kind {
        PolicyKind::Tax => -1.0,
        PolicyKind::Subsidy => 1.0,
    }
}

/// Picks a rate among the real roots of an equation for it, preferring positive rates.
fn select_rate(roots: &[f64], options: &SolverOptions) -> SolverResult {
    match options.root_policy.select(roots, |r| r > 0.0, "policy rate") {
        Ok(rate) => SolverResult::Success(rate),
        Err(Error::NoEquilibrium) => SolverResult::Failure(FailureReason::NoRealSolution),
        Err(_) => SolverResult::Failure(FailureReason::NoSolution),
    }
}

/// Finds the rate at which the traded quantity is `Q₀ ± change`.
///
/// At the new quantity `Q*`, buyers pay `D⁻¹(Q*)` and sellers receive `S⁻¹(Q*)`, so the rate is
/// the gap between the two prices.
fn quantity_target(market: &Market, kind: PolicyKind, change: f64) -> SolverResult {
    let target = market.equilibrium().quantity + direction(kind) * change;
    let options = market.options();
    let prices = market.demand()
        .inverse(options)
        .eval(target)
        .and_then(|buyer| Ok((buyer, market.supply().inverse(options).eval(target)?)));

    match prices {
        Ok((buyer_price, seller_price)) => {
            let rate = match kind {
                PolicyKind::Tax => buyer_price - seller_price,
                PolicyKind::Subsidy => seller_price - buyer_price,
            };
            select_rate(&[rate], options)
        },
        Err(_) => SolverResult::Failure(FailureReason::NoSolution),
    }
}

/// Finds the rate whose deadweight loss, `½ · |Q(r) − Q₀| · r`, equals `dwl`. The formula only
/// holds for linear markets.
fn dwl_target(market: &Market, kind: PolicyKind, dwl: f64) -> SolverResult {
    if !market.is_linear() {
        return SolverResult::Failure(FailureReason::NonLinearMarket);
    }
    let (Some(quantity), Some(dwl)) = (linear_quantity(market, kind), rational_from_f64(dwl)) else {
        return SolverResult::Failure(FailureReason::NoEquilibrium);
    };

    // ½ · σ · (Q(r) − Q(0)) · r − dwl, where σ makes the quantity change positive
    let sign = Rational::from(direction(kind) as i32);
    let change = &quantity - &Polynomial::constant(quantity.coeff(0));
    let equation = &(&change * &Polynomial::x()).scale(&(sign / 2u32)) - &Polynomial::constant(dwl);
    if equation.is_zero() {
        return SolverResult::Failure(FailureReason::NoSolution);
    }
    select_rate(&real_roots(&equation, market.options().tolerance), market.options())
}

/// Finds the rate whose revenue or expense, `r · Q(r)`, equals `budget`.
///
/// In a linear market this is a quadratic in `r`. Otherwise `Q(r)` is found by solving the
/// market at each of a range of sampled rates, and sign changes are refined by bisection.
fn budget_target(market: &Market, kind: PolicyKind, budget: f64) -> SolverResult {
    let options = market.options();
    if market.is_linear() {
        let (Some(quantity), Some(budget)) = (linear_quantity(market, kind), rational_from_f64(budget)) else {
            return SolverResult::Failure(FailureReason::NoEquilibrium);
        };
        let equation = &(&quantity * &Polynomial::x()) - &Polynomial::constant(budget);
        if equation.is_zero() {
            return SolverResult::Failure(FailureReason::NoSolution);
        }
        return select_rate(&real_roots(&equation, options.tolerance), options);
    }

    // samples without a valid equilibrium are skipped rather than falling back to another root
    let strict = options.into_builder().root_policy(RootPolicy::StrictPositive).build();
    let budget_gap = |rate: f64| {
        let (demand_offset, supply_offset) = wedge_offsets(kind, rate, kind.default_incidence());
        solve_wedge(market.demand(), market.supply(), demand_offset, supply_offset, &strict)
            .ok()
            .map(|wedge| rate * wedge.quantity - budget)
    };

    let initial = 10.0 * market.equilibrium().price.abs().max(1.0);
    let (mut lower, mut upper) = (-initial, initial);
    let mut roots = scan_roots(&budget_gap, lower, upper, options.scan_steps, options.tolerance);

    // widen the window on each side that still has an equilibrium at its edge
    for _ in 0..MAX_BRACKET_EXPANSIONS {
        if !roots.is_empty() {
            break;
        }
        let grow_upper = budget_gap(upper).is_some();
        let grow_lower = budget_gap(lower).is_some();
        if !grow_upper && !grow_lower {
            break;
        }
        if grow_upper {
            roots.extend(scan_roots(&budget_gap, upper, 2.0 * upper, options.scan_steps, options.tolerance));
            upper *= 2.0;
        }
        if grow_lower {
            roots.extend(scan_roots(&budget_gap, 2.0 * lower, lower, options.scan_steps, options.tolerance));
            lower *= 2.0;
        }
        debug!(lower, upper, found = roots.len(), "widened budget scan");
    }

    roots.sort_by(f64::total_cmp);
    select_rate(&roots, options)
}

/// Returns the traded quantity as an exact polynomial in the rate, for a market with linear
/// curves. Returns [`None`] if the curves are parallel.
fn linear_quantity(market: &Market, kind: PolicyKind) -> Option<Polynomial> {
    let at = |rate: f64| {
        let (u, v) = wedge_offsets(kind, rate, kind.default_incidence());
        linear_wedge_quantity(market.demand(), market.supply(), &rational_from_f64(u)?, &rational_from_f64(v)?)
    };

    // the offsets are linear in the rate, and so is the quantity
    let q0 = at(0.0)?;
    let q1 = at(1.0)?;
    Some(Polynomial::new(vec![q0.clone(), q1 - q0]))
}

/// Solves `D(x + u) = S(x + v)` exactly for linear `D = a + bP` and `S = c + dP`, and returns
/// the quantity `D(x + u)`.
fn linear_wedge_quantity(demand: &Curve, supply: &Curve, u: &Rational, v: &Rational) -> Option<Rational> {
    let demand = demand.function().as_polynomial()?;
    let supply = supply.function().as_polynomial()?;
    let (a, b) = (demand.coeff(0), demand.coeff(1));
    let (c, d) = (supply.coeff(0), supply.coeff(1));

    let slope_gap = Rational::from(&b - &d);
    if slope_gap.cmp0().is_eq() {
        return None;
    }

    // a + b(x + u) = c + d(x + v)  =>  x = (c + dv − a − bu) / (b − d)
    let x = (c + Rational::from(&d * v) - &a - Rational::from(&b * u)) / slope_gap;
    Some(a + b * (x + u))
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use pretty_assertions::assert_eq;
    use super::*;

    fn market(demand: &str, supply: &str) -> Market {
        Market::parse(demand, supply, SolverOptions::default()).unwrap()
    }

    fn rate(result: SolverResult) -> f64 {
        match result {
            SolverResult::Success(rate) => rate,
            SolverResult::Failure(reason) => panic!("expected a rate, got {reason}"),
        }
    }

    #[test]
    fn requested_order() {
        let targets = PolicyTargets { quantity_change: Some(5.0), max_dwl: None, budget: Some(1.0) };
        assert_eq!(targets.requested(), vec![PolicyTarget::QuantityChange(5.0), PolicyTarget::Budget(1.0)]);
        assert_eq!(PolicyTargets::default().requested(), vec![]);
    }

    #[test]
    fn linear_quantity_in_rate() {
        let market = market("Q = 9400 - 1000P", "Q = 1000P - 3600");
        let subsidy = linear_quantity(&market, PolicyKind::Subsidy).unwrap();
        assert_eq!(subsidy.to_f64_coeffs(), vec![2900.0, 500.0]);
        let tax = linear_quantity(&market, PolicyKind::Tax).unwrap();
        assert_eq!(tax.to_f64_coeffs(), vec![2900.0, -500.0]);
    }

    #[test]
    fn subsidy_budget() {
        let market = market("Q = 9400 - 1000P", "Q = 1000P - 3600");
        let targets = PolicyTargets { budget: Some(49875.0), ..Default::default() };
        let results = solve_subsidy(&market, &targets);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, PolicyTarget::Budget(49875.0));
        assert_float_absolute_eq!(rate(results[0].1), 7.5, 1e-9);
    }

    #[test]
    fn tax_quantity_change() {
        // Q = 2900 - 500t, so a decrease of 500 needs t = 1
        let market = market("Q = 9400 - 1000P", "Q = 1000P - 3600");
        let targets = PolicyTargets { quantity_change: Some(500.0), ..Default::default() };
        assert_float_absolute_eq!(rate(solve_tax(&market, &targets)[0].1), 1.0, 1e-9);
    }

    #[test]
    fn dwl_target_linear() {
        // DWL(t) = 250 t^2
        let market = market("Q = 9400 - 1000P", "Q = 1000P - 3600");
        let targets = PolicyTargets { max_dwl: Some(1000.0), ..Default::default() };
        assert_float_absolute_eq!(rate(solve_tax(&market, &targets)[0].1), 2.0, 1e-9);
        assert_float_absolute_eq!(rate(solve_subsidy(&market, &targets)[0].1), 2.0, 1e-9);
    }

    #[test]
    fn dwl_target_nonlinear() {
        let market = market("Q = 100 - P", "Q = P^2");
        let targets = PolicyTargets { max_dwl: Some(10.0), ..Default::default() };
        assert_eq!(
            solve_tax(&market, &targets)[0].1,
            SolverResult::Failure(FailureReason::NonLinearMarket),
        );
    }

    #[test]
    fn negative_dwl_has_no_real_rate() {
        let market = market("Q = 9400 - 1000P", "Q = 1000P - 3600");
        let targets = PolicyTargets { max_dwl: Some(-10.0), ..Default::default() };
        assert_eq!(
            solve_tax(&market, &targets)[0].1,
            SolverResult::Failure(FailureReason::NoRealSolution),
        );
    }

    #[test]
    fn budget_nonlinear() {
        // Q = 100 - P, S = P^2. With a tax t on producers, D(x) = S(x - t).
        let market = market("Q = 100 - P", "Q = P^2");
        let targets = PolicyTargets { budget: Some(50.0), ..Default::default() };
        let t = rate(solve_tax(&market, &targets)[0].1);
        let outcome = market.apply(crate::intervention::Intervention::tax(t)).unwrap();
        assert_float_absolute_eq!(t * outcome.quantity, 50.0, 1e-6);
    }

    #[test]
    fn budget_beyond_initial_window() {
        // P0 is about 9.51, so the first window ends near 95 while the rate is about 150
        let market = market("Q = 100 - P", "Q = P^2");
        let targets = PolicyTargets { budget: Some(35205.0), ..Default::default() };
        let s = rate(solve_subsidy(&market, &targets)[0].1);
        assert!(s > 100.0, "rate {s} should lie outside the initial window");
        let outcome = market.apply(crate::intervention::Intervention::subsidy(s)).unwrap();
        assert_float_absolute_eq!(s * outcome.quantity, 35205.0, 1e-3);
    }

    #[test]
    fn quantity_target_respects_root_policy() {
        // a tax that raises the quantity by 500 would have to be negative
        let targets = PolicyTargets { quantity_change: Some(-500.0), ..Default::default() };

        let lenient = market("Q = 9400 - 1000P", "Q = 1000P - 3600");
        assert_float_absolute_eq!(rate(solve_tax(&lenient, &targets)[0].1), -1.0, 1e-9);

        let strict = SolverOptions::default().into_builder().root_policy(RootPolicy::StrictPositive).build();
        let strict = Market::parse("Q = 9400 - 1000P", "Q = 1000P - 3600", strict).unwrap();
        assert_eq!(
            solve_tax(&strict, &targets)[0].1,
            SolverResult::Failure(FailureReason::NoSolution),
        );
    }

    #[test]
    fn quantity_change_without_inverse() {
        // a constant demand curve has no inverse
        let market = market("Q = 5000", "Q = 1000P - 3600");
        let targets = PolicyTargets { quantity_change: Some(100.0), ..Default::default() };
        assert_eq!(
            solve_tax(&market, &targets)[0].1,
            SolverResult::Failure(FailureReason::NoSolution),
        );
    }
}
