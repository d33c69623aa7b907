//! Errors raised while normalizing an equation into a [`RationalFn`](super::RationalFn).

use ariadne::Fmt;
use econ_attrs::ErrorKind;
use econ_error::{ErrorKind, EXPR};

/// A number literal could not be converted into an exact value.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` is not a valid number", literal),
    labels = ["this number"],
)]
pub struct InvalidNumber {
    /// The literal as written.
    pub literal: String,
}

/// A symbol other than the price variable appeared in the expression.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("unknown variable `{}`", name),
    labels = ["this variable"],
    help = format!("curves must be written in terms of the price {}", expected.fg(EXPR)),
)]
pub struct UnknownVariable {
    /// The name of the symbol.
    pub name: String,

    /// The name of the price variable.
    pub expected: String,
}

/// An exponent was not an integer constant.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "exponents must be integer constants",
    labels = ["this exponent"],
    note = "curves must be polynomial or rational functions of the price",
)]
pub struct NonIntegerExponent;

/// The degree of the expression exceeds the configured maximum.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "degree of expression is too large",
    labels = [format!("this has degree {}", degree)],
    help = format!("the maximum supported degree is {}", max),
)]
pub struct ExponentTooLarge {
    /// The degree that was reached.
    pub degree: u64,

    /// The maximum degree allowed.
    pub max: usize,
}

/// The expression divides by something that is identically zero.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "division by zero",
    labels = ["this is zero"],
)]
pub struct DivisionByZero;

/// The left-hand side of a curve is not the quantity.
#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = "the left-hand side must be the quantity",
    labels = [format!("expected one of {}", allowed.join(", "))],
    help = format!("write the curve as {}", "Q = 100 - 2P".fg(EXPR)),
)]
pub struct UnsupportedLhs {
    /// The names accepted on the left-hand side.
    pub allowed: &'static [&'static str],
}
