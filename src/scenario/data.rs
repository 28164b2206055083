//! Scenario data structures for single and multi-project IRR comparison

use crate::irr::{self, IrrResult, SolverConfig};
use crate::report;
use crate::schedule::CashFlowSchedule;
use serde::{Deserialize, Serialize};

/// Cash-flow type and its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CashFlowKind {
    /// Level perpetuity
    #[serde(rename = "perpetual")]
    PerpetualConstant { investment: f64, cash_flow: f64 },

    /// Perpetuity growing at a constant rate (Gordon growth)
    #[serde(rename = "growing-perpetual")]
    PerpetualGrowing {
        investment: f64,
        first_cash_flow: f64,
        growth_rate: f64,
    },

    /// Level flow for a fixed number of periods
    #[serde(rename = "finite")]
    FiniteConstant {
        investment: f64,
        cash_flow: f64,
        periods: usize,
    },

    /// Level flow with a residual added to the last period
    #[serde(rename = "finite-residual")]
    FiniteResidual {
        investment: f64,
        cash_flow: f64,
        periods: usize,
        residual: f64,
    },

    /// Growing flow with a residual added to the last period
    #[serde(rename = "finite-growing-residual")]
    FiniteGrowingResidual {
        investment: f64,
        first_cash_flow: f64,
        growth_rate: f64,
        periods: usize,
        residual: f64,
    },

    /// Caller-supplied schedule
    #[serde(rename = "explicit")]
    Explicit { flows: CashFlowSchedule },
}

impl CashFlowKind {
    /// Label used in tables and scenario files
    pub fn label(&self) -> &'static str {
        match self {
            CashFlowKind::PerpetualConstant { .. } => "perpetual",
            CashFlowKind::PerpetualGrowing { .. } => "growing-perpetual",
            CashFlowKind::FiniteConstant { .. } => "finite",
            CashFlowKind::FiniteResidual { .. } => "finite-residual",
            CashFlowKind::FiniteGrowingResidual { .. } => "finite-growing-residual",
            CashFlowKind::Explicit { .. } => "explicit",
        }
    }

    /// Build the finite schedule for this kind; `None` for perpetuities
    pub fn schedule(&self) -> Option<Result<CashFlowSchedule, irr::IrrError>> {
        match *self {
            CashFlowKind::PerpetualConstant { .. } | CashFlowKind::PerpetualGrowing { .. } => None,
            CashFlowKind::FiniteConstant { investment, cash_flow, periods } => {
                Some(Ok(CashFlowSchedule::finite_constant(investment, cash_flow, periods)))
            }
            CashFlowKind::FiniteResidual { investment, cash_flow, periods, residual } => {
                Some(CashFlowSchedule::finite_with_residual(investment, cash_flow, periods, residual))
            }
            CashFlowKind::FiniteGrowingResidual {
                investment,
                first_cash_flow,
                growth_rate,
                periods,
                residual,
            } => Some(CashFlowSchedule::finite_growing_with_residual(
                investment,
                first_cash_flow,
                growth_rate,
                periods,
                residual,
            )),
            CashFlowKind::Explicit { ref flows } => Some(Ok(flows.clone())),
        }
    }

    /// Compute the IRR: closed form for perpetuities, root-finding otherwise
    pub fn evaluate(&self, config: &SolverConfig) -> IrrResult {
        match *self {
            CashFlowKind::PerpetualConstant { investment, cash_flow } => {
                irr::perpetuity_irr(investment, cash_flow)
            }
            CashFlowKind::PerpetualGrowing { investment, first_cash_flow, growth_rate } => {
                irr::growing_perpetuity_irr(investment, first_cash_flow, growth_rate)
            }
            _ => match self.schedule() {
                Some(schedule) => schedule?.irr(config),
                None => Err(irr::IrrError::degenerate("no finite schedule for a perpetuity")),
            },
        }
    }
}

/// One named scenario of one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub project: String,
    #[serde(rename = "scenario")]
    pub name: String,
    #[serde(flatten)]
    pub kind: CashFlowKind,
}

impl Scenario {
    pub fn new(project: impl Into<String>, name: impl Into<String>, kind: CashFlowKind) -> Self {
        Self {
            project: project.into(),
            name: name.into(),
            kind,
        }
    }

    pub fn evaluate(&self, config: &SolverConfig) -> IrrResult {
        self.kind.evaluate(config)
    }
}

/// One row of the comparison table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub project: String,
    pub scenario: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Periodic IRR as a decimal, when computed
    pub irr: Option<f64>,
    /// Failure reason, when not
    pub failure: Option<String>,
    /// Percentage string or the failure marker
    pub display: String,
    /// Periodic IRR compounded to an annual rate, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annualized: Option<f64>,
}

impl ScenarioOutcome {
    pub fn from_result(scenario: &Scenario, result: &IrrResult) -> Self {
        Self {
            project: scenario.project.clone(),
            scenario: scenario.name.clone(),
            kind: scenario.kind.label().to_string(),
            irr: result.as_ref().ok().copied(),
            failure: result.as_ref().err().map(|e| e.to_string()),
            display: report::format_result(result),
            annualized: None,
        }
    }

    /// Attach the annual equivalent of a successful periodic rate
    pub fn with_annualized(mut self, periods_per_year: u32) -> Self {
        self.annualized = self.irr.map(|rate| irr::annualize(rate, periods_per_year));
        self
    }

    pub fn succeeded(&self) -> bool {
        self.irr.is_some()
    }
}
