//! Exact algebra on curves.
//!
//! # Representation
//!
//! The right-hand side of a curve such as `Q = 59(P) - 3(P^2)` is normalized into a
//! [`RationalFn`]: a quotient of two [`Polynomial`]s with exact rational coefficients, reduced so
//! that the numerator and denominator share no common factor. Every expression the parser
//! accepts that mentions only the price variable and uses integer constant exponents has such a
//! form, which gives equilibrium solving, shifting and integration a single, closed
//! representation to work with.
//!
//! Normalization is lossy in the same way any simplification is: spans and the user's grouping
//! are discarded. Errors found along the way still carry the span of the offending
//! subexpression.

pub mod convert;
pub mod error;
pub mod poly;
pub mod rational_fn;

pub use convert::Normalizer;
pub use poly::Polynomial;
pub use rational_fn::RationalFn;
