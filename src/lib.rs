//! IRR Calculator - internal rate of return for perpetuities and finite cash-flow schedules
//!
//! This library provides:
//! - Closed-form IRR for level and growing perpetuities
//! - Root-finding IRR for arbitrary finite schedules
//! - Schedule builders for level, residual and growing cash flows
//! - Multi-project scenario comparison with CSV/JSON input

pub mod irr;
pub mod schedule;
pub mod scenario;
pub mod runner;
pub mod report;

// Re-export commonly used types
pub use irr::{
    perpetuity_irr, growing_perpetuity_irr, schedule_irr, schedule_irr_with,
    IrrError, IrrResult, SolverConfig,
};
pub use schedule::CashFlowSchedule;
pub use scenario::{CashFlowKind, Scenario, ScenarioOutcome};
pub use runner::ScenarioRunner;
