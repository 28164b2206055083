//! Closed-form IRR for perpetuities

use super::{IrrError, IrrResult};

/// IRR of a level perpetuity: `-cash_flow / investment`
///
/// A zero cash flow is reported as `DegenerateInput` rather than a 0% return.
pub fn perpetuity_irr(investment: f64, cash_flow: f64) -> IrrResult {
    if !investment.is_finite() || !cash_flow.is_finite() {
        return Err(IrrError::degenerate("perpetuity inputs must be finite"));
    }
    if investment == 0.0 {
        return Err(IrrError::degenerate("investment must be nonzero"));
    }
    if cash_flow == 0.0 {
        return Err(IrrError::degenerate("periodic cash flow must be nonzero"));
    }

    Ok(-cash_flow / investment)
}

/// IRR of a growing perpetuity (Gordon growth model solved for the rate)
///
/// From `first_cash_flow / (irr - g) + investment = 0`:
/// `irr = g - first_cash_flow / investment`.
pub fn growing_perpetuity_irr(investment: f64, first_cash_flow: f64, growth_rate: f64) -> IrrResult {
    // NaN fails the `< 1` test too
    if !(growth_rate < 1.0) {
        return Err(IrrError::InvalidGrowthRate(growth_rate));
    }
    if !investment.is_finite() || !first_cash_flow.is_finite() || !growth_rate.is_finite() {
        return Err(IrrError::degenerate("perpetuity inputs must be finite"));
    }
    if investment == 0.0 {
        return Err(IrrError::degenerate("investment must be nonzero"));
    }

    Ok(growth_rate - first_cash_flow / investment)
}
