//! Cash-flow schedules and the builders for each finite cash-flow type
//!
//! A schedule is index 0 = time 0 (the initial outlay, usually negative), then
//! one entry per period. Validity (length, finiteness) is checked by the engine
//! when the schedule is evaluated.

use crate::irr::{self, IrrError, IrrResult, SolverConfig};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Ordered cash flows, index 0 = time 0
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CashFlowSchedule(Vec<f64>);

impl CashFlowSchedule {
    pub fn new(flows: Vec<f64>) -> Self {
        Self(flows)
    }

    /// `[investment] + [cash_flow] * periods`
    pub fn finite_constant(investment: f64, cash_flow: f64, periods: usize) -> Self {
        let mut flows = Vec::with_capacity(periods + 1);
        flows.push(investment);
        flows.extend(std::iter::repeat(cash_flow).take(periods));
        Self(flows)
    }

    /// `[investment] + [cash_flow] * (periods - 1) + [cash_flow + residual]`
    ///
    /// The residual lands on the last period, it is not an extra period.
    pub fn finite_with_residual(
        investment: f64,
        cash_flow: f64,
        periods: usize,
        residual: f64,
    ) -> Result<Self, IrrError> {
        if periods == 0 {
            return Err(IrrError::degenerate("a schedule with a residual needs at least 1 period"));
        }
        let mut schedule = Self::finite_constant(investment, cash_flow, periods);
        schedule.add_to_last(residual);
        Ok(schedule)
    }

    /// `[investment] + [cf * (1 + g)^0, ..., cf * (1 + g)^(periods - 1)]`,
    /// residual added to the last entry
    pub fn finite_growing_with_residual(
        investment: f64,
        first_cash_flow: f64,
        growth_rate: f64,
        periods: usize,
        residual: f64,
    ) -> Result<Self, IrrError> {
        if periods == 0 {
            return Err(IrrError::degenerate("a schedule with a residual needs at least 1 period"));
        }

        let mut flows = Vec::with_capacity(periods + 1);
        flows.push(investment);
        let mut cash_flow = first_cash_flow;
        for _ in 0..periods {
            flows.push(cash_flow);
            cash_flow *= 1.0 + growth_rate;
        }

        let mut schedule = Self(flows);
        schedule.add_to_last(residual);
        Ok(schedule)
    }

    fn add_to_last(&mut self, amount: f64) {
        if let Some(last) = self.0.last_mut() {
            *last += amount;
        }
    }

    /// Number of periods after time 0
    pub fn periods(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// NPV of the schedule at a periodic rate
    pub fn npv(&self, rate: f64) -> f64 {
        irr::npv(&self.0, rate)
    }

    /// IRR of the schedule
    pub fn irr(&self, config: &SolverConfig) -> IrrResult {
        irr::schedule_irr_with(&self.0, config)
    }
}

impl Deref for CashFlowSchedule {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for CashFlowSchedule {
    fn from(flows: Vec<f64>) -> Self {
        Self(flows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_finite_constant() {
        let schedule = CashFlowSchedule::finite_constant(-1000.0, 100.0, 5);
        assert_eq!(schedule.as_slice(), &[-1000.0, 100.0, 100.0, 100.0, 100.0, 100.0]);
        assert_eq!(schedule.periods(), 5);
    }

    #[test]
    fn test_finite_constant_zero_periods_is_outlay_only() {
        let schedule = CashFlowSchedule::finite_constant(-1000.0, 100.0, 0);
        assert_eq!(schedule.as_slice(), &[-1000.0]);
        assert!(matches!(
            schedule.irr(&SolverConfig::default()),
            Err(IrrError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_residual_added_to_last_period() {
        let schedule = CashFlowSchedule::finite_with_residual(-1000.0, 100.0, 5, 200.0).unwrap();
        assert_eq!(schedule.as_slice(), &[-1000.0, 100.0, 100.0, 100.0, 100.0, 300.0]);
    }

    #[test]
    fn test_residual_single_period() {
        let schedule = CashFlowSchedule::finite_with_residual(-1000.0, 100.0, 1, 200.0).unwrap();
        assert_eq!(schedule.as_slice(), &[-1000.0, 300.0]);
    }

    #[test]
    fn test_residual_requires_a_period() {
        assert!(matches!(
            CashFlowSchedule::finite_with_residual(-1000.0, 100.0, 0, 200.0),
            Err(IrrError::DegenerateInput(_))
        ));
        assert!(matches!(
            CashFlowSchedule::finite_growing_with_residual(-1000.0, 100.0, 0.05, 0, 200.0),
            Err(IrrError::DegenerateInput(_))
        ));
        assert_eq!(
            CashFlowSchedule::finite_with_residual(-1000.0, 100.0, 0, 200.0)
                .unwrap_err()
                .to_string(),
            "degenerate input: a schedule with a residual needs at least 1 period"
        );
    }

    #[test]
    fn test_residual_schedule_matches_explicit_schedule() {
        let config = SolverConfig::default();
        let built = CashFlowSchedule::finite_with_residual(-1000.0, 100.0, 5, 200.0).unwrap();
        let explicit = CashFlowSchedule::new(vec![-1000.0, 100.0, 100.0, 100.0, 100.0, 300.0]);

        let irr = built.irr(&config).unwrap();
        assert_eq!(built.irr(&config), explicit.irr(&config));
        assert!(built.npv(irr).abs() < 1e-6);
    }

    #[test]
    fn test_growing_with_residual() {
        let schedule =
            CashFlowSchedule::finite_growing_with_residual(-1000.0, 100.0, 0.05, 5, 200.0).unwrap();
        let expected = [-1000.0, 100.0, 105.0, 110.25, 115.7625, 121.550625 + 200.0];

        assert_eq!(schedule.len(), expected.len());
        for (got, want) in schedule.iter().zip(expected.iter()) {
            assert_relative_eq!(*got, *want, epsilon = 1e-9);
        }

        let irr = schedule.irr(&SolverConfig::default()).unwrap();
        assert_relative_eq!(irr, -0.074_243_28, epsilon = 1e-6);
    }

    #[test]
    fn test_zero_growth_matches_constant_with_residual() {
        let growing =
            CashFlowSchedule::finite_growing_with_residual(-500.0, 80.0, 0.0, 7, 50.0).unwrap();
        let constant = CashFlowSchedule::finite_with_residual(-500.0, 80.0, 7, 50.0).unwrap();
        assert_eq!(growing, constant);
    }
}
