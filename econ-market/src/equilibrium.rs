use crate::{
    curve::{Curve, Side},
    error::Error,
    options::SolverOptions,
};
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A price and quantity at which demand equals supply.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EquilibriumPoint {
    pub price: f64,
    pub quantity: f64,
}

/// The solution of a market in which buyers and sellers face different prices.
///
/// Buyers pay `x + demand_offset` and sellers receive `x + supply_offset`, where `x` is the
/// solved price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wedge {
    /// The price that was solved for.
    pub price: f64,

    /// The quantity traded.
    pub quantity: f64,
}

/// A pair of demand and supply curves, along with their undistorted equilibrium.
#[derive(Debug, Clone)]
pub struct Market {
    demand: Curve,
    supply: Curve,
    options: SolverOptions,
    equilibrium: EquilibriumPoint,
}

impl Market {
    /// Creates a market from its curves and solves for the baseline equilibrium.
    pub fn new(demand: Curve, supply: Curve, options: SolverOptions) -> Result<Self, Error> {
        let wedge = solve_wedge(&demand, &supply, 0.0, 0.0, &options)?;
        let equilibrium = EquilibriumPoint { price: wedge.price, quantity: wedge.quantity };
        debug!(price = equilibrium.price, quantity = equilibrium.quantity, "baseline equilibrium");
        Ok(Self { demand, supply, options, equilibrium })
    }

    /// Parses both curves and creates a market from them.
    pub fn parse(demand: &str, supply: &str, options: SolverOptions) -> Result<Self, Error> {
        let demand = Curve::parse_with(Side::Demand, demand, &options)?;
        let supply = Curve::parse_with(Side::Supply, supply, &options)?;
        Self::new(demand, supply, options)
    }

    /// Returns the demand curve.
    pub fn demand(&self) -> &Curve {
        &self.demand
    }

    /// Returns the supply curve.
    pub fn supply(&self) -> &Curve {
        &self.supply
    }

    /// Returns the options used to solve this market.
    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    /// Returns the undistorted equilibrium.
    pub fn equilibrium(&self) -> EquilibriumPoint {
        self.equilibrium
    }

    /// Returns true if both curves are linear in price.
    pub fn is_linear(&self) -> bool {
        self.demand.is_linear() && self.supply.is_linear()
    }

    /// Solves `D(x + demand_offset) = S(x + supply_offset)` for `x`. See [`solve_wedge`].
    pub fn solve_wedge(&self, demand_offset: f64, supply_offset: f64) -> Result<Wedge, Error> {
        solve_wedge(&self.demand, &self.supply, demand_offset, supply_offset, &self.options)
    }
}

/// Solves `D(x + demand_offset) = S(x + supply_offset)` for `x` over the reals.
///
/// A root is valid if `x` is strictly positive and the quantity `D(x + demand_offset)` is
/// strictly positive. The [`RootPolicy`](crate::options::RootPolicy) in `options` decides what
/// happens if there are several valid roots or none.
pub fn solve_wedge(
    demand: &Curve,
    supply: &Curve,
    demand_offset: f64,
    supply_offset: f64,
    options: &SolverOptions,
) -> Result<Wedge, Error> {
    let (Some(demand), Some(supply)) = (demand.shifted(demand_offset), supply.shifted(supply_offset)) else {
        return Err(Error::NoEquilibrium);
    };

    let excess = demand.function() - supply.function();
    if excess.is_zero() {
        // the curves coincide, so every price is an equilibrium
        return Err(Error::NoEquilibrium);
    }

    let roots = excess.real_zeros(options.tolerance);
    let price = options.root_policy.select(
        &roots,
        |x| x > 0.0 && demand.eval(x).is_some_and(|q| q > 0.0),
        "equilibrium price",
    )?;
    let quantity = demand.eval(price).ok_or(Error::NoEquilibrium)?;

    debug!(demand_offset, supply_offset, ?roots, price, quantity, "solved equilibrium");
    Ok(Wedge { price, quantity })
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use crate::options::RootPolicy;
    use super::*;

    fn market(demand: &str, supply: &str) -> Result<Market, Error> {
        Market::parse(demand, supply, SolverOptions::default())
    }

    #[test]
    fn linear_equilibrium() {
        let market = market("Q = 9400 - 1000P", "Q = 1000P - 3600").unwrap();
        assert_eq!(market.equilibrium(), EquilibriumPoint { price: 6.5, quantity: 2900.0 });
        assert!(market.is_linear());
    }

    #[test]
    fn decimal_coefficients() {
        // (3040 - 1.8) / (25 + 9)
        let market = market("Q = 3040 - 25P", "Q = 1.8 + 9P").unwrap();
        let point = market.equilibrium();
        assert_float_absolute_eq!(point.price, 3038.2 / 34.0, 1e-12);
        assert_float_absolute_eq!(point.quantity, 3040.0 - 25.0 * 3038.2 / 34.0, 1e-9);
    }

    #[test]
    fn quadratic_supply() {
        // 100 - P = P^2  =>  P = (-1 + sqrt(401)) / 2
        let market = market("Q = 100 - P", "Q = P^2").unwrap();
        let expected = (-1.0 + 401f64.sqrt()) / 2.0;
        assert_float_absolute_eq!(market.equilibrium().price, expected, 1e-9);
        assert!(!market.is_linear());
    }

    #[test]
    fn parallel_curves() {
        assert!(matches!(market("Q = 10 - P", "Q = 20 - P"), Err(Error::NoEquilibrium)));
    }

    #[test]
    fn identical_curves() {
        assert!(matches!(market("Q = 10 - P", "Q = 10 - P"), Err(Error::NoEquilibrium)));
    }

    #[test]
    fn no_real_equilibrium() {
        assert!(matches!(market("Q = -1 - P^2", "Q = P"), Err(Error::NoEquilibrium)));
    }

    #[test]
    fn negative_equilibrium_falls_back() {
        // demand and supply cross at P = -2
        let market = market("Q = 8 + P", "Q = 10 + 2P").unwrap();
        assert_eq!(market.equilibrium().price, -2.0);
    }

    #[test]
    fn negative_equilibrium_strict() {
        let options = SolverOptions::default()
            .into_builder()
            .root_policy(RootPolicy::StrictPositive)
            .build();
        let result = Market::parse("Q = 8 + P", "Q = 10 + 2P", options);
        assert!(matches!(result, Err(Error::NoValidRoot { .. })));
    }

    #[test]
    fn producer_tax_wedge() {
        let market = market("Q = 9400 - 1000P", "Q = 1000P - 3600").unwrap();
        // buyers pay x, sellers receive x - 2
        let wedge = market.solve_wedge(0.0, -2.0).unwrap();
        assert_float_absolute_eq!(wedge.price, 7.5, 1e-12);
        assert_float_absolute_eq!(wedge.quantity, 1900.0, 1e-9);
    }
}
