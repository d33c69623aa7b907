use crate::error::Error;
use tracing::warn;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How to choose among several real roots of an equation, such as several equilibrium prices.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RootPolicy {
    /// Take the first valid root in ascending order. If no root is valid, fall back to the first
    /// real root and log a warning.
    ///
    /// This is the default option.
    #[default]
    FirstPositive,

    /// Take the first valid root in ascending order. If no root is valid, fail with
    /// [`Error::NoValidRoot`].
    StrictPositive,
}

impl RootPolicy {
    /// Selects a root from `roots`, which must be sorted in ascending order. A root is valid if
    /// `is_valid` returns true for it. `what` names the quantity being solved for in log messages.
    pub fn select<F>(self, roots: &[f64], is_valid: F, what: &str) -> Result<f64, Error>
    where
        F: Fn(f64) -> bool,
    {
        if let Some(&root) = roots.iter().find(|&&root| is_valid(root)) {
            return Ok(root);
        }

        let Some(&first) = roots.first() else {
            return Err(Error::NoEquilibrium);
        };

        match self {
            RootPolicy::FirstPositive => {
                warn!(?roots, chosen = first, "no valid {what}; falling back to the first real root");
                Ok(first)
            },
            RootPolicy::StrictPositive => Err(Error::NoValidRoot { roots: roots.to_vec() }),
        }
    }
}

/// Options that control how markets are solved.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolverOptions {
    /// How to choose among several real roots.
    pub root_policy: RootPolicy,

    /// The numeric tolerance used when refining roots and comparing values.
    ///
    /// The default is `1e-9`.
    pub tolerance: f64,

    /// The maximum degree of the numerator or denominator of a curve. Larger curves are rejected
    /// when they are parsed, which bounds the cost of root finding.
    ///
    /// The default is `16`.
    pub max_degree: usize,

    /// The number of samples taken when scanning for the policy rate that meets a budget in a
    /// non-linear market.
    ///
    /// The default is `4000`.
    pub scan_steps: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            root_policy: RootPolicy::default(),
            tolerance: 1e-9,
            max_degree: 16,
            scan_steps: 4000,
        }
    }
}

impl SolverOptions {
    /// Wraps the given [`SolverOptions`] into a builder for further customization.
    pub fn into_builder(self) -> SolverOptionsBuilder {
        SolverOptionsBuilder(self)
    }
}

/// Helper struct to build a [`SolverOptions`] struct.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SolverOptionsBuilder(SolverOptions);

impl SolverOptionsBuilder {
    /// Creates a new builder with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root policy. See [`RootPolicy`] for more information.
    pub fn root_policy(mut self, root_policy: RootPolicy) -> Self {
        self.0.root_policy = root_policy;
        self
    }

    /// Sets the numeric tolerance.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.0.tolerance = tolerance;
        self
    }

    /// Sets the maximum degree of a curve.
    pub fn max_degree(mut self, max_degree: usize) -> Self {
        self.0.max_degree = max_degree;
        self
    }

    /// Sets the number of samples used by the budget scan.
    pub fn scan_steps(mut self, scan_steps: usize) -> Self {
        self.0.scan_steps = scan_steps;
        self
    }

    /// Builds the [`SolverOptions`] struct.
    pub fn build(self) -> SolverOptions {
        self.0
    }
}
