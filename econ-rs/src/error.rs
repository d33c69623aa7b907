use econ_market::Error as MarketError;
use thiserror::Error;

/// Utility enum to package errors from the command line or the REPL.
#[derive(Debug, Error)]
pub enum Error {
    /// The market could not be built or solved.
    #[error(transparent)]
    Market(#[from] MarketError),

    /// A REPL command was malformed.
    #[error("{0}")]
    Command(String),
}

impl Error {
    /// Report this error to stderr. Parse errors are rendered against the curve that failed to
    /// parse.
    pub fn report_to_stderr(&self) {
        match self {
            Self::Market(MarketError::Parse { side, input, error }) => {
                let src_id = side.to_string();
                if error.report_to_stderr(&src_id, input).is_err() {
                    eprintln!("error: {}", self);
                }
            },
            other => eprintln!("error: {}", other),
        }
    }
}
