//! Scenario definitions and scenario file loading

mod data;
pub mod loader;

pub use data::{CashFlowKind, Scenario, ScenarioOutcome};
pub use loader::{load_scenarios, load_scenarios_from_json, load_scenarios_from_reader, ScenarioLoadError};
