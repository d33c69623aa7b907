mod action;
mod cli;
mod error;
mod repl;

use clap::Parser as _;
use action::Action;
use cli::{Cli, Command, MarketArgs};
use econ_market::{report::FormatOptions, Market, SolverOptions};
use error::Error;
use repl::Session;
use std::{io::{self, BufRead, IsTerminal}, process::ExitCode};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter};

/// Builds the market from the command line and runs a single action on it.
fn run_once(
    market: &MarketArgs,
    action: &Action,
    solver: SolverOptions,
    format: FormatOptions,
) -> Result<String, Error> {
    let market = Market::parse(&market.demand, &market.supply, solver)?;
    Ok(action.run(&market, format)?)
}

/// Runs every line of stdin as a REPL command. Returns false if any command failed.
fn run_script(solver: SolverOptions, format: FormatOptions) -> bool {
    let mut session = Session::new(solver, format);
    let mut ok = true;
    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                eprintln!("error: {}", err);
                return false;
            },
        };
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }

        match session.execute(&line) {
            Ok(Some(text)) => println!("{}", text),
            Ok(None) => (),
            Err(err) => {
                err.report_to_stderr();
                ok = false;
            },
        }
    }
    ok
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let (solver, format) = (cli.solver_options(), cli.format_options());

    match cli.command.map(Command::into_parts) {
        Some(Some((market, action))) => match run_once(&market, &action, solver, format) {
            Ok(text) => {
                println!("{}", text);
                ExitCode::SUCCESS
            },
            Err(err) => {
                err.report_to_stderr();
                ExitCode::FAILURE
            },
        },
        Some(None) => interactive(solver, format),
        None if io::stdin().is_terminal() => interactive(solver, format),
        None => {
            if run_script(solver, format) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        },
    }
}

/// Runs the REPL, reporting any terminal error.
fn interactive(solver: SolverOptions, format: FormatOptions) -> ExitCode {
    match repl::run(solver, format) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        },
    }
}
