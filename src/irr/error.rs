//! Failure reasons for IRR calculations

use thiserror::Error;

/// Why an IRR could not be produced
///
/// Every engine operation either returns one rate or exactly one of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IrrError {
    /// Missing or zero divisor, empty/trivial schedule, or non-finite input
    #[error("degenerate input: {0}")]
    DegenerateInput(String),

    /// Growth rate >= 1 makes the Gordon growth closed form divergent
    #[error("invalid growth rate {0}: must be < 1")]
    InvalidGrowthRate(f64),

    /// No admissible real root > -1, or the solver hit its iteration bound
    #[error("no convergent root: {0}")]
    NoConvergentRoot(String),
}

impl IrrError {
    pub(crate) fn degenerate(msg: impl Into<String>) -> Self {
        IrrError::DegenerateInput(msg.into())
    }

    pub(crate) fn no_root(msg: impl Into<String>) -> Self {
        IrrError::NoConvergentRoot(msg.into())
    }
}

/// Result of an IRR calculation: a periodic rate or a typed failure
pub type IrrResult = Result<f64, IrrError>;
