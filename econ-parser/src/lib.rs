//! Tokenizer and parser for market equations.
//!
//! The input language is tiny: an equation of the form `Q = <expression>`, where the expression
//! is built from numbers, symbols, parentheses, `+`, `-`, `*`, `/` and `^` (or `**`).
//! Multiplication can be implied by juxtaposition, so `25P`, `3(P^2)` and `P(P + 1)` all parse.
//!
//! ```
//! use econ_parser::parser::parse_equation;
//!
//! let equation = parse_equation("Q = 3040 - 25P").unwrap();
//! assert_eq!(equation.rhs.to_string(), "3040 - 25P");
//! ```

pub mod parser;
pub mod tokenizer;
