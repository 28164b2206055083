//! Scenario runner for batch IRR comparisons
//!
//! Holds the solver settings once, then evaluates any number of scenarios.
//! Each scenario is independent, so batches run in parallel.

use crate::irr::SolverConfig;
use crate::scenario::{Scenario, ScenarioOutcome};
use log::{debug, info};
use rayon::prelude::*;

/// Evaluates scenarios with shared solver settings
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_env();
/// let outcomes = runner.run_batch(&load_scenarios("scenarios.csv")?);
/// println!("{}", render_table(&outcomes));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    config: SolverConfig,
    periods_per_year: Option<u32>,
}

impl ScenarioRunner {
    /// Runner with default solver settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Runner with `IRR_*` environment overrides applied
    pub fn from_env() -> Self {
        Self::with_config(SolverConfig::from_env())
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self { config, periods_per_year: None }
    }

    /// Also report each periodic IRR as an annual rate
    pub fn with_periods_per_year(mut self, periods_per_year: Option<u32>) -> Self {
        self.periods_per_year = periods_per_year;
        self
    }

    /// Evaluate one scenario
    pub fn run(&self, scenario: &Scenario) -> ScenarioOutcome {
        let result = scenario.evaluate(&self.config);
        debug!(
            "{} / {} ({}): {:?}",
            scenario.project,
            scenario.name,
            scenario.kind.label(),
            result
        );
        let outcome = ScenarioOutcome::from_result(scenario, &result);
        match self.periods_per_year {
            Some(p) => outcome.with_annualized(p),
            None => outcome,
        }
    }

    /// Evaluate many scenarios; output order matches input order
    pub fn run_batch(&self, scenarios: &[Scenario]) -> Vec<ScenarioOutcome> {
        let outcomes: Vec<ScenarioOutcome> = scenarios.par_iter().map(|s| self.run(s)).collect();

        let failed = outcomes.iter().filter(|o| !o.succeeded()).count();
        info!("evaluated {} scenarios ({} failed)", outcomes.len(), failed);
        outcomes
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SolverConfig {
        &mut self.config
    }
}
