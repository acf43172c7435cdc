//! Solver backend contract.
//!
//! The orchestrator never talks to a solving engine directly. It hands a
//! [`Model`] plus the objective of the current pass to a [`Solver`] and reads
//! back a [`Solution`].

use crate::model::Model;
use crate::types::Objective;
use ordo_expr::VariableId;
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome reported by a backend for a single solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverStatus {
    /// Optimal solution found.
    Optimal,
    Infeasible,
    Unbounded,
    /// Stopped on the time limit (may carry a feasible point).
    TimeLimit,
    /// Stopped on the iteration limit (may carry a feasible point).
    IterationLimit,
    /// Backend finished without a usable verdict.
    Unknown,
}

impl SolverStatus {
    pub fn is_optimal(self) -> bool {
        matches!(self, SolverStatus::Optimal)
    }

    /// Optimal, or stopped on a limit with a point in hand.
    pub fn is_feasible(self) -> bool {
        matches!(
            self,
            SolverStatus::Optimal | SolverStatus::TimeLimit | SolverStatus::IterationLimit
        )
    }

    pub fn is_infeasible(self) -> bool {
        matches!(self, SolverStatus::Infeasible)
    }

    pub fn is_unbounded(self) -> bool {
        matches!(self, SolverStatus::Unbounded)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SolverStatus::Optimal => "optimal",
            SolverStatus::Infeasible => "infeasible",
            SolverStatus::Unbounded => "unbounded",
            SolverStatus::TimeLimit => "time_limit",
            SolverStatus::IterationLimit => "iteration_limit",
            SolverStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one backend solve.
///
/// `primal_values` is indexed by [`VariableId`] and is empty when
/// the status carries no point. `objective_value` includes the objective's
/// constant offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    pub status: SolverStatus,
    pub primal_values: Vec<f64>,
    pub objective_value: f64,
    pub solve_time_seconds: f64,
    /// Backend-specific numeric facts (iterations, node counts, gaps).
    pub metadata: BTreeMap<String, f64>,
}

impl Solution {
    /// A solution with a point and its objective value.
    pub fn with_values(
        status: SolverStatus,
        primal_values: Vec<f64>,
        objective_value: f64,
    ) -> Self {
        Self {
            status,
            primal_values,
            objective_value,
            solve_time_seconds: 0.0,
            metadata: BTreeMap::new(),
        }
    }

    /// A solution that reports only a status.
    pub fn without_values(status: SolverStatus) -> Self {
        Self::with_values(status, Vec::new(), f64::NAN)
    }

    pub fn is_optimal(&self) -> bool {
        self.status.is_optimal()
    }

    pub fn primal(&self, index: usize) -> Option<f64> {
        self.primal_values.get(index).copied()
    }
}

/// Why a backend could not produce a [`Solution`] at all.
///
/// Infeasibility and unboundedness are statuses, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    EmptyModel,
    /// A row or objective names a column the backend never created.
    UnknownVariable(VariableId),
    /// The engine itself failed, with its own message.
    Backend(String),
}

impl SolverError {
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::EmptyModel => "MODEL_EMPTY",
            SolverError::UnknownVariable(_) => "SOLVER_UNKNOWN_VARIABLE",
            SolverError::Backend(_) => "SOLVER_BACKEND_FAILED",
        }
    }
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] ", self.code())?;
        match self {
            SolverError::EmptyModel => f.write_str("nothing to solve: the model has no variables"),
            SolverError::UnknownVariable(var) => write!(f, "no backend column for variable {var}"),
            SolverError::Backend(message) => write!(f, "backend failed: {message}"),
        }
    }
}

impl std::error::Error for SolverError {}

/// A solving engine.
///
/// Implementations must treat `model` as read-only, optimize `objective`
/// instead of anything found in `model.objectives()`, and return the same
/// status for the same inputs.
pub trait Solver {
    fn solve(&mut self, model: &Model, objective: &Objective) -> Result<Solution, SolverError>;
}

impl<S: Solver + ?Sized> Solver for &mut S {
    fn solve(&mut self, model: &Model, objective: &Objective) -> Result<Solution, SolverError> {
        (**self).solve(model, objective)
    }
}

impl<S: Solver + ?Sized> Solver for Box<S> {
    fn solve(&mut self, model: &Model, objective: &Objective) -> Result<Solution, SolverError> {
        (**self).solve(model, objective)
    }
}
