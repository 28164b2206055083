//! Load scenarios from CSV or JSON files
//!
//! CSV columns: project,scenario,type,investment,cash_flow,growth_rate,periods,residual,flows
//! Columns a type does not use may be empty. `flows` holds `;`-separated
//! values for the `explicit` type.

use super::{CashFlowKind, Scenario};
use crate::schedule::CashFlowSchedule;
use csv::{Reader, ReaderBuilder, Trim};
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Errors raised while reading a scenario file
#[derive(Debug, Error)]
pub enum ScenarioLoadError {
    #[error("failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid scenario CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid scenario JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("line {line}: {message}")]
    InvalidRow { line: usize, message: String },

    #[error("unsupported scenario file extension: {0:?}")]
    UnsupportedFormat(String),
}

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    project: String,
    scenario: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    investment: Option<f64>,
    #[serde(default)]
    cash_flow: Option<f64>,
    #[serde(default)]
    growth_rate: Option<f64>,
    #[serde(default)]
    periods: Option<usize>,
    #[serde(default)]
    residual: Option<f64>,
    #[serde(default)]
    flows: Option<String>,
}

fn required<T>(value: Option<T>, column: &str, kind: &str) -> Result<T, String> {
    value.ok_or_else(|| format!("column '{}' is required for type '{}'", column, kind))
}

fn parse_flows(raw: &str) -> Result<CashFlowSchedule, String> {
    raw.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>().map_err(|_| format!("invalid cash flow '{}'", s)))
        .collect::<Result<Vec<_>, _>>()
        .map(CashFlowSchedule::new)
}

impl CsvRow {
    fn to_scenario(self) -> Result<Scenario, String> {
        let kind_label = self.kind.trim().to_string();
        let k = kind_label.as_str();

        let kind = match k {
            "perpetual" => CashFlowKind::PerpetualConstant {
                investment: required(self.investment, "investment", k)?,
                cash_flow: required(self.cash_flow, "cash_flow", k)?,
            },
            "growing-perpetual" => CashFlowKind::PerpetualGrowing {
                investment: required(self.investment, "investment", k)?,
                first_cash_flow: required(self.cash_flow, "cash_flow", k)?,
                growth_rate: required(self.growth_rate, "growth_rate", k)?,
            },
            "finite" => CashFlowKind::FiniteConstant {
                investment: required(self.investment, "investment", k)?,
                cash_flow: required(self.cash_flow, "cash_flow", k)?,
                periods: required(self.periods, "periods", k)?,
            },
            "finite-residual" => CashFlowKind::FiniteResidual {
                investment: required(self.investment, "investment", k)?,
                cash_flow: required(self.cash_flow, "cash_flow", k)?,
                periods: required(self.periods, "periods", k)?,
                residual: required(self.residual, "residual", k)?,
            },
            "finite-growing-residual" => CashFlowKind::FiniteGrowingResidual {
                investment: required(self.investment, "investment", k)?,
                first_cash_flow: required(self.cash_flow, "cash_flow", k)?,
                growth_rate: required(self.growth_rate, "growth_rate", k)?,
                periods: required(self.periods, "periods", k)?,
                residual: self.residual.unwrap_or(0.0),
            },
            "explicit" => CashFlowKind::Explicit {
                flows: parse_flows(&required(self.flows, "flows", k)?)?,
            },
            other => return Err(format!("unknown cash flow type: {}", other)),
        };

        Ok(Scenario::new(self.project, self.scenario, kind))
    }
}

fn read_rows<R: Read>(mut reader: Reader<R>) -> Result<Vec<Scenario>, ScenarioLoadError> {
    let mut scenarios = Vec::new();

    for (index, result) in reader.deserialize().enumerate() {
        // Header is line 1
        let line = index + 2;
        let row: CsvRow = result?;
        let scenario = row
            .to_scenario()
            .map_err(|message| ScenarioLoadError::InvalidRow { line, message })?;
        scenarios.push(scenario);
    }

    Ok(scenarios)
}

/// Load scenarios from any CSV reader (e.g., string buffer, stdin)
pub fn load_scenarios_from_reader<R: Read>(reader: R) -> Result<Vec<Scenario>, ScenarioLoadError> {
    let csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    read_rows(csv_reader)
}

/// Load scenarios from a JSON array
pub fn load_scenarios_from_json<R: Read>(reader: R) -> Result<Vec<Scenario>, ScenarioLoadError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Load scenarios from a `.csv` or `.json` file
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<Scenario>, ScenarioLoadError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    let scenarios = match extension.as_str() {
        "csv" => load_scenarios_from_reader(File::open(path)?)?,
        "json" => load_scenarios_from_json(File::open(path)?)?,
        other => return Err(ScenarioLoadError::UnsupportedFormat(other.to_string())),
    };

    debug!("loaded {} scenarios from {}", scenarios.len(), path.display());
    Ok(scenarios)
}
