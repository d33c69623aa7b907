//! Text reports of market solutions.
//!
//! Each report borrows the values it describes and implements [`Display`]. Numbers are rounded
//! to [`FormatOptions::decimals`] places only when the report is formatted.

use crate::{
    equilibrium::EquilibriumPoint,
    intervention::{Imbalance, Intervention, InterventionOutcome, PolicyKind},
    policy::{FailureReason, PolicyTarget, SolverResult},
};
use std::fmt::{self, Display, Formatter};

/// Options for formatting reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    /// The number of digits after the decimal point.
    ///
    /// The default is `2`.
    pub decimals: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self { decimals: 2 }
    }
}

impl FormatOptions {
    /// Wraps the given [`FormatOptions`] into a builder for further customization.
    pub fn into_builder(self) -> FormatOptionsBuilder {
        FormatOptionsBuilder(self)
    }

    /// Formats a number with the configured number of decimals. Values that round to zero are
    /// printed without a sign.
    fn num(&self, value: f64) -> Number {
        Number { value, decimals: self.decimals }
    }
}

/// Helper struct to build a [`FormatOptions`] struct.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptionsBuilder(FormatOptions);

impl FormatOptionsBuilder {
    /// Creates a new builder with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of digits after the decimal point.
    pub fn decimals(mut self, decimals: usize) -> Self {
        self.0.decimals = decimals;
        self
    }

    /// Builds the [`FormatOptions`] struct.
    pub fn build(self) -> FormatOptions {
        self.0
    }
}

struct Number {
    value: f64,
    decimals: usize,
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let text = format!("{:.*}", self.decimals, self.value);
        match text.strip_prefix('-') {
            Some(rest) if rest.chars().all(|c| c == '0' || c == '.') => write!(f, "{}", rest),
            _ => write!(f, "{}", text),
        }
    }
}

/// A one-line report of a market equilibrium.
#[derive(Debug, Clone, Copy)]
pub struct EquilibriumReport<'a> {
    pub point: &'a EquilibriumPoint,
    pub options: FormatOptions,
}

impl Display for EquilibriumReport<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "Market equilibrium price: {}, Quantity: {}",
            self.options.num(self.point.price),
            self.options.num(self.point.quantity),
        )
    }
}

/// A report of the state of a market after an intervention.
#[derive(Debug, Clone, Copy)]
pub struct OutcomeReport<'a> {
    pub outcome: &'a InterventionOutcome,
    pub options: FormatOptions,
}

impl OutcomeReport<'_> {
    fn fmt_tax(&self, f: &mut Formatter) -> fmt::Result {
        let (o, n) = (self.outcome, |x| self.options.num(x));
        writeln!(f, "After tax buyers pay: {} (more by {})", n(o.buyer_price), n(o.buyer_price_change.abs()))?;
        writeln!(f, "After tax sellers make: {} (less by {})", n(o.seller_price), n(o.seller_price_change.abs()))?;
        writeln!(f, "Tax Revenue: {}, DWL: {}", n(o.transfer.amount()), n(o.deadweight_loss))?;
        write!(
            f,
            "After Tax Consumer Surplus: {}, Producer Surplus: {}",
            n(o.surplus_after.consumer),
            n(o.surplus_after.producer),
        )
    }

    fn fmt_subsidy(&self, f: &mut Formatter) -> fmt::Result {
        let (o, n) = (self.outcome, |x| self.options.num(x));
        writeln!(
            f,
            "After subsidy buyers pay: {} (less by {}) and sellers make: {} (more by {})",
            n(o.buyer_price),
            n(o.buyer_price_change.abs()),
            n(o.seller_price),
            n(o.seller_price_change.abs()),
        )?;
        writeln!(f, "Cost of Subsidy to Gov: {}, DWL: {}", n(o.transfer.amount()), n(o.deadweight_loss))?;
        write!(
            f,
            "After Subsidy Consumer Surplus: {}, Producer Surplus: {}",
            n(o.surplus_after.consumer),
            n(o.surplus_after.producer),
        )
    }

    fn fmt_guarantee(&self, f: &mut Formatter) -> fmt::Result {
        let (o, n) = (self.outcome, |x| self.options.num(x));
        let purchase = match o.imbalance {
            Imbalance::Excess { government_purchase, .. } => government_purchase,
            _ => 0.0,
        };
        writeln!(f, "Government needs to buy: {}", n(purchase))?;
        writeln!(
            f,
            "Producer Surplus: {}, and Consumer Surplus: {}",
            n(o.surplus_after.producer),
            n(o.surplus_after.consumer),
        )?;
        write!(f, "total cost to Gov (including storage cost): {}", n(o.transfer.amount()))
    }

    fn fmt_control(&self, f: &mut Formatter, name: &str, price: f64) -> fmt::Result {
        let (o, n) = (self.outcome, |x| self.options.num(x));
        match o.imbalance {
            Imbalance::Balanced => return write!(f, "A {name} of {} is not binding", n(price)),
            Imbalance::Shortage { demanded, supplied } => {
                writeln!(f, "With a {name} of {} buyers and sellers trade: {}", n(price), n(o.quantity))?;
                writeln!(
                    f,
                    "Quantity demanded: {}, Quantity supplied: {} (shortage of {})",
                    n(demanded),
                    n(supplied),
                    n(demanded - supplied),
                )?;
            },
            Imbalance::Excess { demanded, supplied, .. } => {
                writeln!(f, "With a {name} of {} buyers and sellers trade: {}", n(price), n(o.quantity))?;
                writeln!(
                    f,
                    "Quantity demanded: {}, Quantity supplied: {} (excess of {})",
                    n(demanded),
                    n(supplied),
                    n(supplied - demanded),
                )?;
            },
        }
        write!(
            f,
            "Consumer Surplus: {}, Producer Surplus: {}, DWL: {}",
            n(o.surplus_after.consumer),
            n(o.surplus_after.producer),
            n(o.deadweight_loss),
        )
    }
}

impl Display for OutcomeReport<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let baseline = &self.outcome.baseline;
        match self.outcome.intervention {
            Intervention::Tax { .. } => {
                writeln!(f, "{}", EquilibriumReport { point: baseline, options: self.options })?;
                self.fmt_tax(f)
            },
            Intervention::Subsidy { .. } => {
                writeln!(f, "{}", EquilibriumReport { point: baseline, options: self.options })?;
                self.fmt_subsidy(f)
            },
            Intervention::PriceGuarantee { .. } => {
                writeln!(
                    f,
                    "Market Equilibrium Price: {}, and Quantity: {}",
                    self.options.num(baseline.price),
                    self.options.num(baseline.quantity),
                )?;
                self.fmt_guarantee(f)
            },
            Intervention::PriceCeiling { price } => {
                writeln!(f, "{}", EquilibriumReport { point: baseline, options: self.options })?;
                self.fmt_control(f, "price ceiling", price)
            },
            Intervention::PriceFloor { price } => {
                writeln!(f, "{}", EquilibriumReport { point: baseline, options: self.options })?;
                self.fmt_control(f, "price floor", price)
            },
        }
    }
}

/// A report of the rates found by the policy solver, one line per target.
#[derive(Debug, Clone, Copy)]
pub struct PolicyReport<'a> {
    pub kind: PolicyKind,
    pub baseline: &'a EquilibriumPoint,
    pub results: &'a [(PolicyTarget, SolverResult)],
    pub options: FormatOptions,
}

impl Display for PolicyReport<'_> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(
            f,
            "Market Equilibrium Price: {} and Quantity: {}",
            self.options.num(self.baseline.price),
            self.options.num(self.baseline.quantity),
        )?;

        for (target, result) in self.results {
            writeln!(f)?;
            match (self.kind, target) {
                (PolicyKind::Tax, PolicyTarget::QuantityChange(change)) => write!(f, "Tax to decrease Q by {change}: ")?,
                (PolicyKind::Tax, PolicyTarget::DeadweightLoss(_)) => write!(f, "Tax to maximize DWL: ")?,
                (PolicyKind::Tax, PolicyTarget::Budget(_)) => write!(f, "Tax to maximize Revenue: ")?,
                (PolicyKind::Subsidy, PolicyTarget::QuantityChange(change)) => write!(f, "Subsidy to increase by {change}: ")?,
                (PolicyKind::Subsidy, PolicyTarget::DeadweightLoss(_)) => write!(f, "Subsidy to maximize DWL: ")?,
                (PolicyKind::Subsidy, PolicyTarget::Budget(_)) => write!(f, "Subsidy to maximize Expense Budget: ")?,
            }

            match result {
                SolverResult::Success(rate) => write!(f, "{}", self.options.num(*rate))?,
                SolverResult::Failure(FailureReason::NoEquilibrium) => {
                    write!(f, "Could not solve equilibrium with {}", self.kind)?
                },
                SolverResult::Failure(reason) => write!(f, "{reason}")?,
            }
        }
        Ok(())
    }
}

/// Formats the equilibrium of a market.
pub fn equilibrium(point: &EquilibriumPoint, options: FormatOptions) -> String {
    EquilibriumReport { point, options }.to_string()
}

/// Formats the outcome of an intervention.
pub fn outcome(outcome: &InterventionOutcome, options: FormatOptions) -> String {
    OutcomeReport { outcome, options }.to_string()
}

/// Formats the results of the policy solver.
pub fn policy(
    kind: PolicyKind,
    baseline: &EquilibriumPoint,
    results: &[(PolicyTarget, SolverResult)],
    options: FormatOptions,
) -> String {
    PolicyReport { kind, baseline, results, options }.to_string()
}

#[cfg(test)]
mod tests {
    use crate::{equilibrium::Market, options::SolverOptions, policy::{solve_subsidy, PolicyTargets}};
    use pretty_assertions::assert_eq;
    use super::*;

    fn market() -> Market {
        Market::parse("Q = 9400 - 1000P", "Q = 1000P - 3600", SolverOptions::default()).unwrap()
    }

    #[test]
    fn numbers() {
        let options = FormatOptions::default();
        assert_eq!(options.num(6.5).to_string(), "6.50");
        assert_eq!(options.num(-0.001).to_string(), "0.00");
        assert_eq!(options.num(-1.239).to_string(), "-1.24");
        let options = options.into_builder().decimals(0).build();
        assert_eq!(options.num(-0.2).to_string(), "0");
    }

    #[test]
    fn equilibrium_line() {
        let market = market();
        assert_eq!(
            equilibrium(&market.equilibrium(), FormatOptions::default()),
            "Market equilibrium price: 6.50, Quantity: 2900.00",
        );
    }

    #[test]
    fn tax_report() {
        let outcome = market().apply(Intervention::tax(2.0)).unwrap();
        assert_eq!(
            super::outcome(&outcome, FormatOptions::default()),
            "Market equilibrium price: 6.50, Quantity: 2900.00\n\
             After tax buyers pay: 7.50 (more by 1.00)\n\
             After tax sellers make: 5.50 (less by 1.00)\n\
             Tax Revenue: 3800.00, DWL: 1000.00\n\
             After Tax Consumer Surplus: 1805.00, Producer Surplus: 1805.00",
        );
    }

    #[test]
    fn guarantee_report() {
        let outcome = market().apply(Intervention::PriceGuarantee { price: 8.0, storage_cost: 0.5 }).unwrap();
        assert_eq!(
            super::outcome(&outcome, FormatOptions::default()),
            "Market Equilibrium Price: 6.50, and Quantity: 2900.00\n\
             Government needs to buy: 3000.00\n\
             Producer Surplus: 9680.00, and Consumer Surplus: 980.00\n\
             total cost to Gov (including storage cost): 25500.00",
        );
    }

    #[test]
    fn policy_report() {
        let market = market();
        let targets = PolicyTargets { quantity_change: Some(500.0), budget: Some(49875.0), ..Default::default() };
        let results = solve_subsidy(&market, &targets);
        assert_eq!(
            policy(PolicyKind::Subsidy, &market.equilibrium(), &results, FormatOptions::default()),
            "Market Equilibrium Price: 6.50 and Quantity: 2900.00\n\
             Subsidy to increase by 500: 1.00\n\
             Subsidy to maximize Expense Budget: 7.50",
        );
    }

    #[test]
    fn failure_lines() {
        let baseline = EquilibriumPoint { price: 1.0, quantity: 2.0 };
        let results = [
            (PolicyTarget::DeadweightLoss(3.0), SolverResult::Failure(FailureReason::NonLinearMarket)),
            (PolicyTarget::Budget(4.0), SolverResult::Failure(FailureReason::NoEquilibrium)),
        ];
        assert_eq!(
            policy(PolicyKind::Tax, &baseline, &results, FormatOptions::default()),
            "Market Equilibrium Price: 1.00 and Quantity: 2.00\n\
             Tax to maximize DWL: Not applicable for non-linear market\n\
             Tax to maximize Revenue: Could not solve equilibrium with tax",
        );
    }
}
