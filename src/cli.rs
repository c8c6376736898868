//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report::{format_bounds_table, format_points};
use crate::domain::config_validation::{
    leg_sections, parse_ceiling, parse_leg, parse_valuation_date, validate_strategy_config,
    STRATEGY_SECTION,
};
use crate::domain::error::PayoffError;
use crate::domain::payoff_curve::PayoffCurve;
use crate::domain::rates::{self, CashFlow};
use crate::domain::statistics;
use crate::domain::strategy::Strategy;
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "payoffkit", about = "Option payoff diagrams and price bounds")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the aggregate payoff curve of a strategy file
    Payoff {
        #[arg(short, long)]
        strategy: PathBuf,
        /// Write the breakpoints as CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Evaluate the curve at this underlying price (repeatable)
        #[arg(long)]
        at: Vec<f64>,
    },
    /// Print intrinsic value and no-arbitrage bounds for each leg
    Bounds {
        #[arg(short, long)]
        strategy: PathBuf,
    },
    /// Validate a strategy file
    Validate {
        #[arg(short, long)]
        strategy: PathBuf,
    },
    /// Solve a bond's yield and report duration and convexity
    BondYield {
        /// Cash flow as AMOUNT@TERM, term in years (repeatable)
        #[arg(long = "cash-flow", required = true)]
        cash_flows: Vec<String>,
        #[arg(long)]
        price: f64,
    },
    /// Minimum-variance hedge ratio from paired price changes
    HedgeRatio {
        #[arg(long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
        spot: Vec<f64>,
        #[arg(long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
        futures: Vec<f64>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Payoff {
            strategy,
            output,
            at,
        } => run_payoff(&strategy, output.as_ref(), &at),
        Command::Bounds { strategy } => run_bounds(&strategy),
        Command::Validate { strategy } => run_validate(&strategy),
        Command::BondYield { cash_flows, price } => run_bond_yield(&cash_flows, price),
        Command::HedgeRatio { spot, futures } => run_hedge_ratio(&spot, &futures),
    }
}

fn fail(err: PayoffError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, PayoffError> {
    FileConfigAdapter::from_file(path).map_err(|e| PayoffError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Validate and load a strategy file.
pub fn load_strategy(path: &PathBuf) -> Result<Strategy, PayoffError> {
    eprintln!("Loading strategy from {}", path.display());
    let adapter = load_config(path)?;
    validate_strategy_config(&adapter)?;
    build_strategy(&adapter)
}

pub fn build_strategy(adapter: &dyn ConfigPort) -> Result<Strategy, PayoffError> {
    let name = adapter
        .get_string(STRATEGY_SECTION, "name")
        .unwrap_or_else(|| "Unnamed".to_string());
    let description = adapter
        .get_string(STRATEGY_SECTION, "description")
        .unwrap_or_default();
    let ceiling = parse_ceiling(adapter)?;
    let valuation = parse_valuation_date(adapter)?;

    let mut strategy = Strategy::new(name, ceiling).with_description(description);
    for section in leg_sections(adapter) {
        let leg = parse_leg(adapter, &section, valuation)?;
        strategy = strategy.with_leg(leg.contract, leg.quantity);
    }
    Ok(strategy)
}

/// Evaluation results of the payoff command.
#[derive(Debug, Clone)]
pub struct PayoffOutput {
    pub curve: PayoffCurve,
    /// `(price, value)` for every requested evaluation price.
    pub evaluations: Vec<(f64, f64)>,
}

/// Combine the legs, evaluate at each requested price and hand the curve to
/// `report_port` when an output path is given.
pub fn run_payoff_pipeline(
    strategy: &Strategy,
    report_port: &dyn ReportPort,
    output_path: Option<&str>,
    at: &[f64],
) -> Result<PayoffOutput, PayoffError> {
    let curve = strategy.payoff_curve()?;
    let evaluations = at
        .iter()
        .map(|&price| curve.evaluate(price).map(|value| (price, value)))
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(path) = output_path {
        report_port.write(strategy, &curve, path)?;
    }
    Ok(PayoffOutput { curve, evaluations })
}

fn run_payoff(strategy_path: &PathBuf, output_path: Option<&PathBuf>, at: &[f64]) -> ExitCode {
    let strategy = match load_strategy(strategy_path) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    eprintln!(
        "Combining {} legs of '{}' over [0, {}]",
        strategy.legs.len(),
        strategy.name,
        strategy.ceiling
    );

    let output_str = output_path.map(|p| p.to_string_lossy().into_owned());
    let report = CsvReportAdapter;
    let output = match run_payoff_pipeline(&strategy, &report, output_str.as_deref(), at) {
        Ok(o) => o,
        Err(e) => return fail(e),
    };

    println!("{}", format_points(&output.curve));
    for (price, value) in &output.evaluations {
        println!("{value}@{price}");
    }
    if let Some(path) = output_path {
        eprintln!("Payoff written to {}", path.display());
    }

    ExitCode::SUCCESS
}

fn run_bounds(strategy_path: &PathBuf) -> ExitCode {
    match load_strategy(strategy_path) {
        Ok(strategy) => {
            print!("{}", format_bounds_table(&strategy));
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_validate(strategy_path: &PathBuf) -> ExitCode {
    match load_strategy(strategy_path) {
        Ok(strategy) => {
            println!(
                "Strategy '{}' is valid ({} legs)",
                strategy.name,
                strategy.legs.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

/// Parse `AMOUNT@TERM`.
pub fn parse_cash_flow(raw: &str) -> Result<CashFlow, PayoffError> {
    let invalid = || PayoffError::InvalidInput {
        reason: format!("cash flow '{raw}' must look like AMOUNT@TERM"),
    };
    let (amount, term) = raw.split_once('@').ok_or_else(invalid)?;
    let amount: f64 = amount.trim().parse().map_err(|_| invalid())?;
    let term: f64 = term.trim().parse().map_err(|_| invalid())?;
    if term < 0.0 {
        return Err(PayoffError::InvalidInput {
            reason: format!("cash flow term must be non-negative, got {term}"),
        });
    }
    Ok(CashFlow::new(amount, term))
}

fn run_bond_yield(raw_flows: &[String], price: f64) -> ExitCode {
    let flows = match raw_flows
        .iter()
        .map(|s| parse_cash_flow(s))
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(f) => f,
        Err(e) => return fail(e),
    };
    eprintln!("Solving yield for {} cash flows at price {}", flows.len(), price);

    let result = rates::bond_yield(&flows, price).and_then(|y| {
        let duration = rates::bond_duration(&flows, y, price)?;
        let convexity = rates::bond_convexity(&flows, y, price)?;
        Ok((y, duration, convexity))
    });

    match result {
        Ok((y, duration, convexity)) => {
            println!("yield: {y:.6}");
            println!("duration: {duration:.6}");
            println!("convexity: {convexity:.6}");
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

fn run_hedge_ratio(spot: &[f64], futures: &[f64]) -> ExitCode {
    eprintln!("Computing hedge ratio over {} observations", spot.len());
    match statistics::hedge_ratio(spot, futures) {
        Ok(h) => {
            println!("hedge ratio: {h:.6}");
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}
