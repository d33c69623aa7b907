//! Equilibrium, surplus and policy analysis for a market in a single good.
//!
//! A [`Market`] is built from a demand and a supply [`Curve`], each written as
//! `Q = <expression in P>`. Curves may be polynomials or ratios of polynomials in the price; they
//! are stored with exact rational coefficients. Building a market solves for its undistorted
//! [`EquilibriumPoint`].
//!
//! From there, [`Market::apply`] evaluates a known [`Intervention`] (a tax, a subsidy, a price
//! guarantee or a price control), and [`policy::solve_tax`] / [`policy::solve_subsidy`] find
//! the rate that meets a target quantity change, deadweight loss or budget.
//!
//! ```
//! use econ_market::{Intervention, Market, SolverOptions};
//!
//! let market = Market::parse("Q = 9400 - 1000P", "Q = 1000P - 3600", SolverOptions::default())?;
//! assert_eq!(market.equilibrium().price, 6.5);
//! assert_eq!(market.equilibrium().quantity, 2900.0);
//!
//! let outcome = market.apply(Intervention::tax(2.0))?;
//! assert!((outcome.buyer_price - outcome.seller_price - 2.0).abs() < 1e-9);
//! # Ok::<(), econ_market::Error>(())
//! ```
//!
//! Whenever an equation has several real roots, the [`RootPolicy`] in [`SolverOptions`] decides
//! which one is used.

pub mod curve;
pub mod equilibrium;
pub mod error;
pub mod intervention;
pub mod inverse;
pub mod options;
pub mod policy;
pub mod report;
pub mod surplus;

pub use curve::{Curve, Side};
pub use equilibrium::{EquilibriumPoint, Market};
pub use error::Error;
pub use intervention::{
    GovernmentTransfer,
    Imbalance,
    Incidence,
    Intervention,
    InterventionOutcome,
    PolicyKind,
};
pub use inverse::InverseCurve;
pub use options::{RootPolicy, SolverOptions, SolverOptionsBuilder};
pub use policy::{FailureReason, PolicyTarget, PolicyTargets, SolverResult};
pub use surplus::Surplus;
