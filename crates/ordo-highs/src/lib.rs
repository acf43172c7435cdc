//! HiGHS backend for ordo.
//!
//! [`HighsSolver`] implements [`ordo_core::Solver`]: every call translates the
//! working model into a fresh HiGHS row problem, optimizes the requested
//! objective and reads the column values back.

pub mod problem;
pub mod solver;
mod status;

pub use problem::{HighsOutcome, HighsProblem, HighsProblemError, ObjectiveSense, OptionValue};
pub use solver::HighsSolver;
