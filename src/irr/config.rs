//! Root-finder settings
//!
//! Defaults can be overridden through environment variables:
//!   IRR_INITIAL_GUESS, IRR_TOLERANCE, IRR_MAX_ITERATIONS,
//!   IRR_LOWER_BOUND, IRR_UPPER_BOUND, IRR_SCAN_STEPS

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Default starting rate, also the anchor for picking between multiple roots
const DEFAULT_INITIAL_GUESS: f64 = 0.1;

/// Default absolute tolerance on the NPV value
const DEFAULT_TOLERANCE: f64 = 1e-7;

/// Default iteration bound for each Newton / bisection run
const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Settings for the schedule IRR solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Starting rate for Newton-Raphson; the admissible root closest to it wins
    pub initial_guess: f64,

    /// Converged when |NPV| <= tolerance
    pub tolerance: f64,

    /// Iteration bound for each refinement run
    pub max_iterations: usize,

    /// Lowest periodic rate scanned for sign changes (must be > -1)
    pub lower_bound: f64,

    /// Highest periodic rate scanned for sign changes
    pub upper_bound: f64,

    /// Number of sub-intervals in the bracketing scan
    pub scan_steps: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            initial_guess: DEFAULT_INITIAL_GUESS,
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            lower_bound: -0.99,
            upper_bound: 10.0,
            scan_steps: 400,
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl SolverConfig {
    /// Defaults with any `IRR_*` environment overrides applied
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            initial_guess: env_or("IRR_INITIAL_GUESS", defaults.initial_guess),
            tolerance: env_or("IRR_TOLERANCE", defaults.tolerance),
            max_iterations: env_or("IRR_MAX_ITERATIONS", defaults.max_iterations),
            lower_bound: env_or("IRR_LOWER_BOUND", defaults.lower_bound),
            upper_bound: env_or("IRR_UPPER_BOUND", defaults.upper_bound),
            scan_steps: env_or("IRR_SCAN_STEPS", defaults.scan_steps),
        }
    }

    pub fn with_initial_guess(mut self, guess: f64) -> Self {
        self.initial_guess = guess;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}
