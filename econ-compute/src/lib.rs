//! Exact algebra and numerics behind the market engine.
//!
//! Market curves are written as `Q = <expression in P>`. The [`symbolic`] module normalizes the
//! right-hand side into a [`RationalFn`](symbolic::RationalFn) with exact [`rug::Rational`]
//! coefficients, so that linear markets are solved without any rounding at all. The
//! [`numerical`] module finds real roots and evaluates definite integrals when a closed form is
//! not available.
//!
//! ```
//! use econ_compute::symbolic::RationalFn;
//! use econ_parser::parser::parse_equation;
//!
//! let equation = parse_equation("Q = 3040 - 25P").unwrap();
//! let demand = RationalFn::from_expr(&equation.rhs, "P", 16).unwrap();
//! assert!(demand.is_linear());
//! assert_eq!(demand.eval_f64(100.0), Some(540.0));
//! ```

pub mod numerical;
pub mod primitive;
pub mod symbolic;
