use crate::curve::Side;
use thiserror::Error;

/// Errors produced by the market engine.
#[derive(Debug, Error)]
pub enum Error {
    /// A curve could not be parsed or normalized. The inner error points into `input`.
    #[error("could not parse the {side} curve `{input}`")]
    Parse {
        /// Which curve failed to parse.
        side: Side,

        /// The text that was parsed.
        input: String,

        /// The span-carrying error, which can be rendered against `input`.
        error: econ_error::Error,
    },

    /// The demand and supply curves never meet at a real price.
    #[error("no real equilibrium exists")]
    NoEquilibrium,

    /// Real solutions exist, but none has a positive price and a positive quantity, and the root
    /// policy does not allow falling back to another root.
    #[error("no economically valid root among {roots:?}")]
    NoValidRoot {
        /// The real roots that were rejected, in ascending order.
        roots: Vec<f64>,
    },

    /// A curve cannot be inverted to express price as a function of quantity.
    #[error("the {side} curve cannot be inverted at quantity {quantity}")]
    Inversion {
        /// Which curve failed to invert.
        side: Side,

        /// The quantity at which the inverse was requested.
        quantity: f64,
    },

    /// The requested operation is not supported for this market.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),
}
