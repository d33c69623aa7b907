use clap::{Args, Parser, Subcommand};
use econ_market::{Incidence, Intervention, PolicyKind, PolicyTargets, RootPolicy, SolverOptions};
use econ_market::report::FormatOptions;
use crate::action::Action;

/// Solve for market equilibrium and evaluate taxes, subsidies and price controls.
///
/// Curves are written as `Q = <expression in P>`, for example `Q = 3040 - 25P`.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Number of digits after the decimal point in reports
    #[arg(long, global = true, default_value_t = 2)]
    pub decimals: usize,

    /// Fail instead of falling back to a non-positive root when no root is economically valid
    #[arg(long, global = true)]
    pub strict_roots: bool,
}

impl Cli {
    /// Returns the solver options selected on the command line.
    pub fn solver_options(&self) -> SolverOptions {
        let root_policy = if self.strict_roots {
            RootPolicy::StrictPositive
        } else {
            RootPolicy::FirstPositive
        };
        SolverOptions::default().into_builder().root_policy(root_policy).build()
    }

    /// Returns the report options selected on the command line.
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions::default().into_builder().decimals(self.decimals).build()
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report the equilibrium price and quantity
    Equilibrium {
        #[command(flatten)]
        market: MarketArgs,
    },

    /// Apply a per-unit tax
    Tax {
        #[command(flatten)]
        market: MarketArgs,

        /// The tax per unit
        rate: f64,

        /// Who pays the tax: `C` (consumers) or `P` (producers)
        #[arg(long, default_value = "P")]
        on: Incidence,
    },

    /// Apply a per-unit subsidy
    Subsidy {
        #[command(flatten)]
        market: MarketArgs,

        /// The subsidy per unit
        rate: f64,

        /// Who receives the subsidy: `C` (consumers) or `P` (producers)
        #[arg(long, default_value = "C")]
        to: Incidence,
    },

    /// Guarantee a price, with the government buying the excess supply
    Guarantee {
        #[command(flatten)]
        market: MarketArgs,

        /// The guaranteed price
        price: f64,

        /// The cost of storing each unit the government buys
        #[arg(long, default_value_t = 0.0)]
        storage_cost: f64,
    },

    /// Impose a maximum price
    Ceiling {
        #[command(flatten)]
        market: MarketArgs,

        /// The highest legal price
        price: f64,
    },

    /// Impose a minimum price
    Floor {
        #[command(flatten)]
        market: MarketArgs,

        /// The lowest legal price
        price: f64,
    },

    /// Find the tax that meets one or more targets
    TaxTarget {
        #[command(flatten)]
        market: MarketArgs,

        #[command(flatten)]
        targets: TargetArgs,
    },

    /// Find the subsidy that meets one or more targets
    SubsidyTarget {
        #[command(flatten)]
        market: MarketArgs,

        #[command(flatten)]
        targets: TargetArgs,
    },

    /// Start an interactive session
    Repl,
}

impl Command {
    /// Splits the command into the market it describes and the action to take on it. Returns
    /// [`None`] for [`Command::Repl`].
    pub fn into_parts(self) -> Option<(MarketArgs, Action)> {
        let parts = match self {
            Command::Equilibrium { market } => (market, Action::Equilibrium),
            Command::Tax { market, rate, on } => (market, Action::Apply(Intervention::Tax { rate, on })),
            Command::Subsidy { market, rate, to } => (market, Action::Apply(Intervention::Subsidy { rate, to })),
            Command::Guarantee { market, price, storage_cost } => {
                (market, Action::Apply(Intervention::PriceGuarantee { price, storage_cost }))
            },
            Command::Ceiling { market, price } => (market, Action::Apply(Intervention::PriceCeiling { price })),
            Command::Floor { market, price } => (market, Action::Apply(Intervention::PriceFloor { price })),
            Command::TaxTarget { market, targets } => (market, Action::Target(PolicyKind::Tax, targets.into())),
            Command::SubsidyTarget { market, targets } => {
                (market, Action::Target(PolicyKind::Subsidy, targets.into()))
            },
            Command::Repl => return None,
        };
        Some(parts)
    }
}

#[derive(Debug, Args)]
pub struct MarketArgs {
    /// The demand curve, such as `Q = 3040 - 25P`
    pub demand: String,

    /// The supply curve, such as `Q = 1.8 + 9P`
    pub supply: String,
}

#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Change the traded quantity by this much
    #[arg(long)]
    pub quantity_change: Option<f64>,

    /// Reach this deadweight loss (linear markets only)
    #[arg(long)]
    pub max_dwl: Option<f64>,

    /// Raise this much revenue, or spend this much on the subsidy
    #[arg(long, visible_aliases = ["revenue", "expense"])]
    pub budget: Option<f64>,
}

impl From<TargetArgs> for PolicyTargets {
    fn from(args: TargetArgs) -> Self {
        PolicyTargets {
            quantity_change: args.quantity_change,
            max_dwl: args.max_dwl,
            budget: args.budget,
        }
    }
}
