//! Floating point root finding and integration.

pub mod quadrature;
pub mod roots;
