//! The interactive session.
//!
//! Each line is one command. Curves are entered with `demand Q = ...` and `supply Q = ...`; once
//! both are known, the market is solved and the remaining commands run against it.

use crate::{action::Action, error::Error};
use econ_market::{
    report::FormatOptions,
    Curve,
    Incidence,
    Intervention,
    Market,
    PolicyKind,
    PolicyTargets,
    Side,
    SolverOptions,
};
use rustyline::{error::ReadlineError, DefaultEditor};
use tracing::debug;

const HELP: &str = "\
commands:
  demand Q = <expr in P>         set the demand curve
  supply Q = <expr in P>         set the supply curve
  equilibrium                    report the equilibrium
  tax <rate> [C|P]               apply a tax (default: producers pay)
  subsidy <rate> [C|P]           apply a subsidy (default: consumers receive)
  guarantee <price> [storage]    guarantee a price
  ceiling <price>                impose a maximum price
  floor <price>                  impose a minimum price
  tax-target <target>...         find a tax; targets are quantity=<n>, dwl=<n>, budget=<n>
  subsidy-target <target>...     find a subsidy
  help                           show this message
  quit                           leave the session";

/// A command entered in the REPL.
#[derive(Debug, Clone, PartialEq)]
pub enum Line<'a> {
    Curve(Side, &'a str),
    Run(Action),
    Help,
    Quit,
}

/// Parses one line of input.
pub fn parse_line(input: &str) -> Result<Line<'_>, Error> {
    let input = input.trim();
    let (command, rest) = input.split_once(char::is_whitespace).unwrap_or((input, ""));
    let rest = rest.trim();
    let args = rest.split_whitespace().collect::<Vec<_>>();

    let line = match command {
        "demand" => Line::Curve(Side::Demand, rest),
        "supply" => Line::Curve(Side::Supply, rest),
        "equilibrium" | "eq" => Line::Run(Action::Equilibrium),
        "tax" => {
            let rate = number(&args, 0, "tax rate")?;
            let on = incidence(&args, 1)?.unwrap_or(PolicyKind::Tax.default_incidence());
            Line::Run(Action::Apply(Intervention::Tax { rate, on }))
        },
        "subsidy" => {
            let rate = number(&args, 0, "subsidy rate")?;
            let to = incidence(&args, 1)?.unwrap_or(PolicyKind::Subsidy.default_incidence());
            Line::Run(Action::Apply(Intervention::Subsidy { rate, to }))
        },
        "guarantee" => {
            let price = number(&args, 0, "guaranteed price")?;
            let storage_cost = if args.len() > 1 { number(&args, 1, "storage cost")? } else { 0.0 };
            Line::Run(Action::Apply(Intervention::PriceGuarantee { price, storage_cost }))
        },
        "ceiling" => Line::Run(Action::Apply(Intervention::PriceCeiling { price: number(&args, 0, "price")? })),
        "floor" => Line::Run(Action::Apply(Intervention::PriceFloor { price: number(&args, 0, "price")? })),
        "tax-target" => Line::Run(Action::Target(PolicyKind::Tax, targets(&args)?)),
        "subsidy-target" => Line::Run(Action::Target(PolicyKind::Subsidy, targets(&args)?)),
        "help" | "?" => Line::Help,
        "quit" | "exit" => Line::Quit,
        other => return Err(Error::Command(format!("unknown command `{other}`; try `help`"))),
    };
    Ok(line)
}

fn number(args: &[&str], index: usize, what: &str) -> Result<f64, Error> {
    let arg = args.get(index).ok_or_else(|| Error::Command(format!("missing {what}")))?;
    arg.parse().map_err(|_| Error::Command(format!("`{arg}` is not a valid {what}")))
}

fn incidence(args: &[&str], index: usize) -> Result<Option<Incidence>, Error> {
    args.get(index)
        .map(|arg| arg.parse::<Incidence>().map_err(|err| Error::Command(format!("{err}"))))
        .transpose()
}

fn targets(args: &[&str]) -> Result<PolicyTargets, Error> {
    let mut targets = PolicyTargets::default();
    for arg in args {
        let (name, value) = arg.split_once('=')
            .ok_or_else(|| Error::Command(format!("expected `<target>=<value>`, found `{arg}`")))?;
        let value = number(&[value], 0, name)?;
        match name {
            "quantity" | "q" => targets.quantity_change = Some(value),
            "dwl" => targets.max_dwl = Some(value),
            "budget" | "revenue" | "expense" => targets.budget = Some(value),
            other => return Err(Error::Command(format!("unknown target `{other}`"))),
        }
    }
    if targets.requested().is_empty() {
        return Err(Error::Command("no targets given".to_string()));
    }
    Ok(targets)
}

/// The curves entered so far, and the market built from them.
#[derive(Debug, Default)]
pub struct Session {
    solver: SolverOptions,
    format: FormatOptions,
    demand: Option<Curve>,
    supply: Option<Curve>,
    market: Option<Market>,
}

impl Session {
    /// Creates an empty session.
    pub fn new(solver: SolverOptions, format: FormatOptions) -> Self {
        Self { solver, format, ..Default::default() }
    }

    /// Executes one line of input and returns the text to print, if any.
    pub fn execute(&mut self, input: &str) -> Result<Option<String>, Error> {
        match parse_line(input)? {
            Line::Curve(side, source) => {
                let curve = Curve::parse_with(side, source, &self.solver)?;
                debug!(%side, %curve, "set curve");
                match side {
                    Side::Demand => self.demand = Some(curve),
                    Side::Supply => self.supply = Some(curve),
                }
                self.rebuild()
            },
            Line::Run(action) => {
                let market = self.market.as_ref()
                    .ok_or_else(|| Error::Command("enter both `demand` and `supply` curves first".to_string()))?;
                Ok(Some(action.run(market, self.format)?))
            },
            Line::Help => Ok(Some(HELP.to_string())),
            Line::Quit => Ok(None),
        }
    }

    /// Solves the market once both curves are known, and reports its equilibrium.
    fn rebuild(&mut self) -> Result<Option<String>, Error> {
        self.market = None;
        let (Some(demand), Some(supply)) = (&self.demand, &self.supply) else {
            return Ok(None);
        };
        let market = Market::new(demand.clone(), supply.clone(), self.solver)?;
        let text = Action::Equilibrium.run(&market, self.format)?;
        self.market = Some(market);
        Ok(Some(text))
    }
}

/// Runs the interactive session until the user quits.
pub fn run(solver: SolverOptions, format: FormatOptions) -> Result<(), ReadlineError> {
    let mut rl = DefaultEditor::new()?;
    let mut session = Session::new(solver, format);
    println!("type `help` for a list of commands");

    loop {
        let input = match rl.readline("> ") {
            Ok(input) => input,
            Err(ReadlineError::Eof | ReadlineError::Interrupted) => return Ok(()),
            Err(err) => return Err(err),
        };
        if input.trim().is_empty() {
            continue;
        }
        rl.add_history_entry(&input)?;

        if matches!(parse_line(&input), Ok(Line::Quit)) {
            return Ok(());
        }
        match session.execute(&input) {
            Ok(Some(text)) => println!("{}", text),
            Ok(None) => (),
            Err(err) => err.report_to_stderr(),
        }
    }
}
