//! IRR Calculator CLI
//!
//! One subcommand per cash-flow type plus `compare` for multi-project scenario files.
//! Solver settings come from IRR_* environment variables, then command-line flags.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use irr_calculator::{
    report::{self, format_rate},
    scenario::load_scenarios,
    CashFlowKind, Scenario, ScenarioOutcome, ScenarioRunner, SolverConfig,
};
use log::info;
use std::path::PathBuf;

/// Internal rate of return calculator
#[derive(Parser, Debug)]
#[command(name = "irr_calculator")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Initial guess for the root-finder; the closest root wins
    #[arg(long, global = true, allow_negative_numbers = true)]
    guess: Option<f64>,

    /// NPV tolerance (relative for schedules smaller than one unit)
    #[arg(long, global = true)]
    tolerance: Option<f64>,

    /// Iteration bound for each solver run
    #[arg(long, global = true)]
    max_iterations: Option<usize>,

    /// Also report each rate compounded to an annual figure (text, table and JSON)
    #[arg(long, global = true)]
    periods_per_year: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Level perpetuity
    Perpetuity {
        /// Initial investment (negative)
        #[arg(short, long, default_value_t = -1000.0, allow_negative_numbers = true)]
        investment: f64,

        /// Cash flow per period
        #[arg(short, long, default_value_t = 100.0, allow_negative_numbers = true)]
        cash_flow: f64,
    },

    /// Growing perpetuity (Gordon growth model)
    GrowingPerpetuity {
        /// Initial investment (negative)
        #[arg(short, long, default_value_t = -1000.0, allow_negative_numbers = true)]
        investment: f64,

        /// First period cash flow
        #[arg(short, long, default_value_t = 100.0, allow_negative_numbers = true)]
        cash_flow: f64,

        /// Growth rate per period, must be < 1
        #[arg(short, long, default_value_t = 0.02, allow_negative_numbers = true)]
        growth_rate: f64,
    },

    /// Level cash flow for a fixed number of periods
    Finite {
        /// Initial investment (negative)
        #[arg(short, long, default_value_t = -1000.0, allow_negative_numbers = true)]
        investment: f64,

        /// Cash flow per period
        #[arg(short, long, default_value_t = 100.0, allow_negative_numbers = true)]
        cash_flow: f64,

        /// Number of periods
        #[arg(short, long, default_value_t = 5)]
        periods: usize,
    },

    /// Level cash flow with a residual value added to the last period
    FiniteResidual {
        /// Initial investment (negative)
        #[arg(short, long, default_value_t = -1000.0, allow_negative_numbers = true)]
        investment: f64,

        /// Cash flow per period
        #[arg(short, long, default_value_t = 100.0, allow_negative_numbers = true)]
        cash_flow: f64,

        /// Number of periods
        #[arg(short, long, default_value_t = 5)]
        periods: usize,

        /// Extra value received with the last period's cash flow
        #[arg(short, long, default_value_t = 200.0, allow_negative_numbers = true)]
        residual: f64,
    },

    /// Growing cash flow for a fixed number of periods, plus a residual
    FiniteGrowing {
        /// Initial investment (negative)
        #[arg(short, long, default_value_t = -1000.0, allow_negative_numbers = true)]
        investment: f64,

        /// First period cash flow
        #[arg(short, long, default_value_t = 100.0, allow_negative_numbers = true)]
        cash_flow: f64,

        /// Growth rate per period
        #[arg(short, long, default_value_t = 0.02, allow_negative_numbers = true)]
        growth_rate: f64,

        /// Number of periods
        #[arg(short, long, default_value_t = 5)]
        periods: usize,

        /// Extra value received with the last period's cash flow
        #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
        residual: f64,
    },

    /// Explicit schedule: time-0 flow first, then one value per period
    Schedule {
        #[arg(required = true, num_args = 1.., allow_negative_numbers = true)]
        flows: Vec<f64>,
    },

    /// Compare scenarios from a CSV or JSON file
    Compare {
        /// Scenario file (.csv or .json)
        file: PathBuf,
    },
}

impl Cli {
    fn solver_config(&self) -> SolverConfig {
        let mut config = SolverConfig::from_env();
        if let Some(guess) = self.guess {
            config.initial_guess = guess;
        }
        if let Some(tolerance) = self.tolerance {
            config.tolerance = tolerance;
        }
        if let Some(max_iterations) = self.max_iterations {
            config.max_iterations = max_iterations;
        }
        config
    }
}

impl Commands {
    fn single_kind(&self) -> Option<CashFlowKind> {
        let kind = match *self {
            Commands::Perpetuity { investment, cash_flow } => {
                CashFlowKind::PerpetualConstant { investment, cash_flow }
            }
            Commands::GrowingPerpetuity { investment, cash_flow, growth_rate } => {
                CashFlowKind::PerpetualGrowing { investment, first_cash_flow: cash_flow, growth_rate }
            }
            Commands::Finite { investment, cash_flow, periods } => {
                CashFlowKind::FiniteConstant { investment, cash_flow, periods }
            }
            Commands::FiniteResidual { investment, cash_flow, periods, residual } => {
                CashFlowKind::FiniteResidual { investment, cash_flow, periods, residual }
            }
            Commands::FiniteGrowing { investment, cash_flow, growth_rate, periods, residual } => {
                CashFlowKind::FiniteGrowingResidual {
                    investment,
                    first_cash_flow: cash_flow,
                    growth_rate,
                    periods,
                    residual,
                }
            }
            Commands::Schedule { ref flows } => CashFlowKind::Explicit { flows: flows.clone().into() },
            Commands::Compare { .. } => return None,
        };
        Some(kind)
    }
}

fn print_single(scenario: &Scenario, outcome: &ScenarioOutcome, periods_per_year: Option<u32>) {
    if let Some(Ok(schedule)) = scenario.kind.schedule() {
        let flows: Vec<String> = schedule.iter().map(|cf| format!("{:.2}", cf)).collect();
        println!("Cash flows: [{}]", flows.join(", "));
    }

    match (outcome.irr, &outcome.failure) {
        (Some(_), _) => {
            println!("IRR = {}", outcome.display);
            if let (Some(p), Some(annual)) = (periods_per_year, outcome.annualized) {
                println!("Annualized ({} periods/year) = {}", p, format_rate(annual));
            }
        }
        (None, Some(reason)) => println!("IRR = {} ({})", outcome.display, reason),
        (None, None) => println!("IRR = {}", outcome.display),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let runner =
        ScenarioRunner::with_config(cli.solver_config()).with_periods_per_year(cli.periods_per_year);
    info!("solver settings: {:?}", runner.config());

    if let Commands::Compare { file } = &cli.command {
        let scenarios = load_scenarios(file)
            .with_context(|| format!("failed to load scenarios from {}", file.display()))?;
        let outcomes = runner.run_batch(&scenarios);

        if cli.json {
            println!("{}", report::to_json(&outcomes)?);
        } else {
            println!("IRR Summary ({} scenarios)\n", outcomes.len());
            print!("{}", report::render_table(&outcomes));
        }
        return Ok(());
    }

    let Some(kind) = cli.command.single_kind() else {
        return Ok(());
    };
    let label = kind.label();
    let scenario = Scenario::new("-", label, kind);
    let outcome = runner.run(&scenario);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_single(&scenario, &outcome, cli.periods_per_year);
    }

    Ok(())
}
