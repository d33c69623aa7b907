pub mod kind;

pub use econ_error::Error;
