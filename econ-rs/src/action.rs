use econ_market::{
    policy,
    report::{self, FormatOptions},
    Error,
    Intervention,
    Market,
    PolicyKind,
    PolicyTargets,
};

/// Something to compute for a market.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Report the undistorted equilibrium.
    Equilibrium,

    /// Apply an intervention with a known parameter.
    Apply(Intervention),

    /// Solve for the rate of a tax or subsidy.
    Target(PolicyKind, PolicyTargets),
}

impl Action {
    /// Runs the action on the market and returns the text report.
    pub fn run(&self, market: &Market, options: FormatOptions) -> Result<String, Error> {
        match self {
            Action::Equilibrium => Ok(report::equilibrium(&market.equilibrium(), options)),
            Action::Apply(intervention) => {
                let outcome = market.apply(*intervention)?;
                Ok(report::outcome(&outcome, options))
            },
            Action::Target(kind, targets) => {
                let results = policy::solve(market, *kind, targets);
                Ok(report::policy(*kind, &market.equilibrium(), &results, options))
            },
        }
    }
}
