//! IRR engine: closed forms for perpetuities, root-finding for finite schedules
//!
//! Every operation is a pure function returning [`IrrResult`]. Nothing here logs.

mod closed_form;
mod config;
mod error;
mod solver;

pub use closed_form::{perpetuity_irr, growing_perpetuity_irr};
pub use config::SolverConfig;
pub use error::{IrrError, IrrResult};
pub use solver::{schedule_irr, schedule_irr_with, npv, annualize};
