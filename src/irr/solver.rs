//! Internal Rate of Return (IRR) for finite cash-flow schedules
//!
//! Finds `r > -1` with `sum(cf[t] / (1 + r)^t) = 0`. Candidate roots come from
//! Newton-Raphson started at the configured guess plus a sign-change scan of
//! `[lower_bound, upper_bound]` with each bracket refined by bisection. When
//! several admissible roots exist the one closest to the guess is returned
//! (exact distance ties go to the lower rate).

use super::{IrrError, IrrResult, SolverConfig};

/// Calculate the IRR of a cash-flow schedule with default solver settings
///
/// # Arguments
/// * `cash_flows` - Index 0 is time 0 (usually the negative outlay), then one entry per period
///
/// # Returns
/// * `IrrResult` - Periodic rate as a decimal (e.g., 0.05 for 5%), or the failure reason
pub fn schedule_irr(cash_flows: &[f64]) -> IrrResult {
    schedule_irr_with(cash_flows, &SolverConfig::default())
}

/// Calculate the IRR of a cash-flow schedule with explicit solver settings
pub fn schedule_irr_with(cash_flows: &[f64], config: &SolverConfig) -> IrrResult {
    validate_schedule(cash_flows)?;

    let has_positive = cash_flows.iter().any(|&cf| cf > 0.0);
    let has_negative = cash_flows.iter().any(|&cf| cf < 0.0);
    if !has_positive || !has_negative {
        return Err(IrrError::no_root("all nonzero cash flows have the same sign"));
    }

    // Leading zeros only scale the NPV by (1 + r)^-k, so the roots are unchanged
    let first = cash_flows.iter().position(|&cf| cf != 0.0).unwrap_or(0);
    let cash_flows = &cash_flows[first..];

    let mut candidates = Vec::new();

    if let Some(rate) = newton_raphson(cash_flows, config.initial_guess, config) {
        candidates.push(rate);
    }

    let brackets = sign_change_brackets(cash_flows, config, &mut candidates);
    let bracket_count = brackets.len();
    for (low, high) in brackets {
        if let Some(rate) = bisection(cash_flows, low, high, config) {
            candidates.push(rate);
        }
    }

    if let Some(rate) = closest_to(&candidates, config.initial_guess) {
        return Ok(rate);
    }

    if bracket_count > 0 {
        Err(IrrError::no_root(format!(
            "solver did not converge within {} iterations",
            config.max_iterations
        )))
    } else {
        Err(IrrError::no_root(format!(
            "no real root above -1 found in [{}, {}]",
            config.lower_bound, config.upper_bound
        )))
    }
}

/// Net present value at a periodic rate (time-0 flow undiscounted)
pub fn npv(cash_flows: &[f64], rate: f64) -> f64 {
    npv_terms(cash_flows, rate).0
}

/// Convert a periodic rate to an annual rate
pub fn annualize(rate: f64, periods_per_year: u32) -> f64 {
    (1.0 + rate).powi(periods_per_year as i32) - 1.0
}

fn validate_schedule(cash_flows: &[f64]) -> Result<(), IrrError> {
    if cash_flows.len() < 2 {
        return Err(IrrError::degenerate(format!(
            "schedule needs at least 2 cash flows, got {}",
            cash_flows.len()
        )));
    }
    if let Some(t) = cash_flows.iter().position(|cf| !cf.is_finite()) {
        return Err(IrrError::degenerate(format!("cash flow at period {} is not finite", t)));
    }
    if cash_flows.iter().all(|&cf| cf == 0.0) {
        return Err(IrrError::degenerate("all cash flows are zero"));
    }
    Ok(())
}

/// NPV, its derivative with respect to rate, and the sum of absolute discounted
/// terms (used to judge how close to zero f64 can get)
fn npv_terms(cash_flows: &[f64], rate: f64) -> (f64, f64, f64) {
    let factor = 1.0 / (1.0 + rate);
    let mut discount = 1.0;
    let mut npv = 0.0;
    let mut dnpv = 0.0;
    let mut scale = 0.0;

    for (t, &cf) in cash_flows.iter().enumerate() {
        let term = cf * discount;
        npv += term;
        scale += term.abs();
        if t > 0 {
            dnpv -= (t as f64) * term * factor;
        }
        discount *= factor;
    }

    (npv, dnpv, scale)
}

/// `tolerance` is absolute for schedules of unit size or more, relative to the
/// discounted magnitude below that
fn converged(npv: f64, scale: f64, tolerance: f64) -> bool {
    let abs = npv.abs();
    abs <= tolerance * scale.min(1.0) || abs <= scale * 64.0 * f64::EPSILON
}

fn newton_raphson(cash_flows: &[f64], guess: f64, config: &SolverConfig) -> Option<f64> {
    if !(guess > -1.0) || !guess.is_finite() {
        return None;
    }

    let mut rate = guess;

    for _ in 0..config.max_iterations {
        let (npv, dnpv, scale) = npv_terms(cash_flows, rate);
        if !npv.is_finite() || !dnpv.is_finite() {
            return None;
        }
        if converged(npv, scale, config.tolerance) {
            return Some(rate);
        }
        if dnpv == 0.0 {
            return None;
        }

        let mut next = rate - npv / dnpv;
        if !next.is_finite() {
            return None;
        }
        // Stay inside the domain: halve the distance to -1 instead of overshooting
        if next <= -1.0 {
            next = (rate - 1.0) / 2.0;
        }
        if next == rate {
            return None;
        }
        rate = next;
    }

    None
}

/// Scan for sign changes on a grid uniform in ln(1 + r). Grid points where the
/// NPV is exactly zero go straight into `roots`.
fn sign_change_brackets(cash_flows: &[f64], config: &SolverConfig, roots: &mut Vec<f64>) -> Vec<(f64, f64)> {
    let mut brackets = Vec::new();
    if !(config.lower_bound > -1.0) || !(config.upper_bound > config.lower_bound) || config.scan_steps == 0 {
        return brackets;
    }

    let log_low = (1.0 + config.lower_bound).ln();
    let log_high = (1.0 + config.upper_bound).ln();
    let step = (log_high - log_low) / config.scan_steps as f64;

    let mut prev: Option<(f64, f64)> = None;
    for i in 0..=config.scan_steps {
        let rate = (log_low + step * i as f64).exp() - 1.0;
        let value = npv(cash_flows, rate);
        if !value.is_finite() {
            prev = None;
            continue;
        }
        if value == 0.0 {
            roots.push(rate);
            prev = None;
            continue;
        }
        if let Some((prev_rate, prev_value)) = prev {
            if prev_value.signum() != value.signum() {
                brackets.push((prev_rate, rate));
            }
        }
        prev = Some((rate, value));
    }

    brackets
}

fn bisection(cash_flows: &[f64], mut low: f64, mut high: f64, config: &SolverConfig) -> Option<f64> {
    let mut npv_low = npv(cash_flows, low);

    for _ in 0..config.max_iterations {
        let mid = low + (high - low) / 2.0;
        let (npv_mid, _, scale) = npv_terms(cash_flows, mid);

        if converged(npv_mid, scale, config.tolerance) {
            return Some(mid);
        }
        // Bracket pinned to adjacent floats: this is as close as f64 gets
        if high - low <= f64::EPSILON * mid.abs().max(1.0) {
            return Some(mid);
        }

        if npv_mid.signum() == npv_low.signum() {
            low = mid;
            npv_low = npv_mid;
        } else {
            high = mid;
        }
    }

    None
}

fn closest_to(candidates: &[f64], guess: f64) -> Option<f64> {
    candidates.iter().copied().fold(None, |best: Option<f64>, rate| match best {
        None => Some(rate),
        Some(current) => {
            let d_rate = (rate - guess).abs();
            let d_current = (current - guess).abs();
            if d_rate < d_current || (d_rate == d_current && rate < current) {
                Some(rate)
            } else {
                Some(current)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_round_trip(cash_flows: &[f64], rate: f64) {
        let value = npv(cash_flows, rate);
        assert!(value.abs() < 1e-6, "NPV at {} was {}", rate, value);
    }

    #[test]
    fn test_simple_irr() {
        // Investment of $1000, returns $1100 after 12 periods
        let mut cashflows = vec![-1000.0];
        cashflows.extend(vec![0.0; 11]);
        cashflows.push(1100.0);

        let irr = schedule_irr(&cashflows).unwrap();
        assert_abs_diff_eq!(annualize(irr, 12), 0.10, epsilon = 1e-8);
        assert_round_trip(&cashflows, irr);
    }

    #[test]
    fn test_level_cashflows_loss() {
        // 500 back on a 1000 outlay over 5 periods
        let cashflows = [-1000.0, 100.0, 100.0, 100.0, 100.0, 100.0];
        let irr = schedule_irr(&cashflows).unwrap();
        assert_abs_diff_eq!(irr, -0.194_018_52, epsilon = 1e-6);
        assert_round_trip(&cashflows, irr);
    }

    #[test]
    fn test_level_cashflows_with_residual() {
        let cashflows = [-1000.0, 100.0, 100.0, 100.0, 100.0, 300.0];
        let irr = schedule_irr(&cashflows).unwrap();
        assert_abs_diff_eq!(irr, -0.092_437_37, epsilon = 1e-6);
        assert_round_trip(&cashflows, irr);
    }

    #[test]
    fn test_profitable_schedule() {
        let cashflows = [-1000.0, 300.0, 300.0, 300.0, 300.0, 300.0];
        let irr = schedule_irr(&cashflows).unwrap();
        assert_abs_diff_eq!(irr, 0.152_382_37, epsilon = 1e-6);
        assert_round_trip(&cashflows, irr);
    }

    #[test]
    fn test_loan_cashflows() {
        // Loan of $10000, 12 payments of $900: inverted signs still solve
        let mut cashflows = vec![10000.0];
        cashflows.extend(vec![-900.0; 12]);

        let irr = schedule_irr(&cashflows).unwrap();
        assert!(irr > 0.0);
        assert_round_trip(&cashflows, irr);
    }

    #[test]
    fn test_multiple_roots_pick_closest_to_guess() {
        // Roots at 10% and 20%
        let cashflows = [-100.0, 230.0, -132.0];

        let irr = schedule_irr(&cashflows).unwrap();
        assert_abs_diff_eq!(irr, 0.10, epsilon = 1e-6);

        let config = SolverConfig::default().with_initial_guess(0.25);
        let irr = schedule_irr_with(&cashflows, &config).unwrap();
        assert_abs_diff_eq!(irr, 0.20, epsilon = 1e-6);

        let config = SolverConfig::default().with_initial_guess(-0.5);
        let irr = schedule_irr_with(&cashflows, &config).unwrap();
        assert_abs_diff_eq!(irr, 0.10, epsilon = 1e-6);
    }

    #[test]
    fn test_closest_tie_goes_to_lower_rate() {
        assert_eq!(closest_to(&[0.75, 0.25], 0.5), Some(0.25));
        assert_eq!(closest_to(&[0.25, 0.75], 0.5), Some(0.25));
        assert_eq!(closest_to(&[0.9, 0.3, 0.45], 0.5), Some(0.45));
        assert_eq!(closest_to(&[], 0.1), None);
    }

    #[test]
    fn test_degenerate_schedules() {
        assert!(matches!(schedule_irr(&[0.0, 0.0]), Err(IrrError::DegenerateInput(_))));
        assert!(matches!(schedule_irr(&[-1000.0]), Err(IrrError::DegenerateInput(_))));
        assert!(matches!(schedule_irr(&[]), Err(IrrError::DegenerateInput(_))));
        assert!(matches!(
            schedule_irr(&[-1000.0, f64::NAN, 100.0]),
            Err(IrrError::DegenerateInput(_))
        ));
        assert!(matches!(
            schedule_irr(&[-1000.0, f64::INFINITY]),
            Err(IrrError::DegenerateInput(_))
        ));
    }

    #[test]
    fn test_no_sign_change_has_no_root() {
        assert!(matches!(schedule_irr(&[100.0, 100.0, 100.0]), Err(IrrError::NoConvergentRoot(_))));
        assert!(matches!(schedule_irr(&[-100.0, -5.0]), Err(IrrError::NoConvergentRoot(_))));
        assert!(matches!(schedule_irr(&[5.0, 0.0]), Err(IrrError::NoConvergentRoot(_))));
    }

    #[test]
    fn test_leading_zero_flows_have_no_root_without_outlay() {
        for cashflows in [
            vec![0.0, 100.0],
            vec![0.0, 0.0, 100.0],
            vec![0.0, 100.0, 100.0, 100.0],
        ] {
            assert!(
                matches!(schedule_irr(&cashflows), Err(IrrError::NoConvergentRoot(_))),
                "{:?} should have no root",
                cashflows
            );
        }
    }

    #[test]
    fn test_tiny_same_sign_flows_have_no_root() {
        assert!(matches!(schedule_irr(&[1e-8, 1e-8]), Err(IrrError::NoConvergentRoot(_))));
        assert!(matches!(schedule_irr(&[-1e-9, -1e-9]), Err(IrrError::NoConvergentRoot(_))));
    }

    #[test]
    fn test_tiny_mixed_sign_flows_solve_relative_to_size() {
        // 1e-8 - 2e-8 / (1 + r) = 0 at r = 1
        let irr = schedule_irr(&[1e-8, -2e-8]).unwrap();
        assert_abs_diff_eq!(irr, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_delayed_outlay_keeps_root() {
        let cashflows = [0.0, 0.0, -1000.0, 1100.0];
        let irr = schedule_irr(&cashflows).unwrap();
        assert_abs_diff_eq!(irr, 0.10, epsilon = 1e-6);
        assert_round_trip(&cashflows, irr);
    }

    #[test]
    fn test_iteration_bound_reports_no_convergence() {
        let config = SolverConfig::default().with_max_iterations(1);
        let result = schedule_irr_with(&[-1000.0, 100.0, 100.0, 100.0, 100.0, 100.0], &config);
        assert!(matches!(result, Err(IrrError::NoConvergentRoot(_))));
    }

    #[test]
    fn test_large_magnitudes_converge() {
        let cashflows = [-1.0e12, 3.0e11, 3.0e11, 3.0e11, 3.0e11, 3.0e11];
        let irr = schedule_irr(&cashflows).unwrap();
        assert_abs_diff_eq!(irr, 0.152_382_37, epsilon = 1e-6);
    }

    #[test]
    fn test_idempotent() {
        let cashflows = [-1000.0, 100.0, -50.0, 400.0, 700.0];
        assert_eq!(schedule_irr(&cashflows), schedule_irr(&cashflows));
    }

    #[test]
    fn test_npv_at_zero_rate_is_sum() {
        assert_abs_diff_eq!(npv(&[-1000.0, 400.0, 700.0], 0.0), 100.0, epsilon = 1e-12);
    }

    #[test]
    fn test_annualize() {
        assert_abs_diff_eq!(annualize(0.10, 1), 0.10, epsilon = 1e-15);
        assert_abs_diff_eq!(annualize(0.01, 12), 1.01_f64.powi(12) - 1.0, epsilon = 1e-15);
    }
}
