//! Lexicographic multi-objective orchestration.
//!
//! Objectives are solved one at a time in priority order. After pass `i`
//! reaches optimality, a *frozen* constraint pinning objective `i` to its
//! optimum is appended to a working copy of the model, so later passes can
//! only choose among points that keep every earlier objective optimal.
//!
//! The caller's model is never touched: the working copy is cloned once and
//! grows by one constraint per completed pass.

mod error;
mod result;

use crate::model::Model;
use crate::solver::{Solution, Solver, SolverStatus};
use crate::types::{Objective, Sense};
use ordo_expr::ComparisonSense;
use std::time::Instant;

pub use error::OrchestratorError;
pub use result::{OrchestrationState, PassFailure, PassRecord, SolveResult, SolveStatus};

/// How an optimum is pinned before the next pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FreezeMode {
    /// `objective = v`.
    Exact,
    /// `objective ≤ v + tol` (minimize) or `objective ≥ v - tol` (maximize),
    /// with `tol = max(absolute, relative·|v|)`.
    Tolerance { absolute: f64, relative: f64 },
}

impl FreezeMode {
    pub const DEFAULT_ABSOLUTE: f64 = 1e-6;
    pub const DEFAULT_RELATIVE: f64 = 1e-9;

    /// Sense and right-hand side of the frozen row for optimum `value`.
    pub fn frozen_bound(self, sense: Sense, value: f64) -> (ComparisonSense, f64) {
        match self {
            FreezeMode::Exact => (ComparisonSense::Equal, value),
            FreezeMode::Tolerance { absolute, relative } => {
                let slack = absolute.max(relative * value.abs());
                match sense {
                    Sense::Minimize => (ComparisonSense::LessEqual, value + slack),
                    Sense::Maximize => (ComparisonSense::GreaterEqual, value - slack),
                }
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FreezeMode::Exact => "exact",
            FreezeMode::Tolerance { .. } => "tolerance",
        }
    }
}

impl Default for FreezeMode {
    fn default() -> Self {
        FreezeMode::Tolerance {
            absolute: Self::DEFAULT_ABSOLUTE,
            relative: Self::DEFAULT_RELATIVE,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LexicographicConfig {
    pub freeze: FreezeMode,
}

impl LexicographicConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_freeze(mut self, freeze: FreezeMode) -> Self {
        self.freeze = freeze;
        self
    }
}

/// Drives a [`Solver`] through one pass per objective.
#[derive(Debug)]
pub struct Lexicographic<S> {
    solver: S,
    config: LexicographicConfig,
}

/// Orchestrate `model` with the default configuration.
pub fn orchestrate<S: Solver>(solver: S, model: &Model) -> Result<SolveResult, OrchestratorError> {
    Lexicographic::new(solver).orchestrate(model)
}

fn transition(state: &mut OrchestrationState, next: OrchestrationState) {
    tracing::debug!(
        component = "lexicographic",
        operation = "transition",
        status = "success",
        from = %state,
        to = %next,
        "Orchestration state changed"
    );
    *state = next;
}

fn frozen_name(objective: &Objective, pass: usize) -> String {
    match objective.name() {
        Some(name) => format!("frozen:{name}"),
        None => format!("frozen:objective_{pass}"),
    }
}

/// Reason a reported optimum cannot be trusted, if any.
fn contract_violation(model: &Model, solution: &Solution) -> Option<String> {
    if solution.primal_values.len() != model.num_variables() {
        return Some(format!(
            "backend returned {} values for {} variables",
            solution.primal_values.len(),
            model.num_variables()
        ));
    }
    if !solution.objective_value.is_finite() {
        return Some(format!(
            "backend returned non-finite objective value {}",
            solution.objective_value
        ));
    }
    if solution.primal_values.iter().any(|value| !value.is_finite()) {
        return Some("backend returned a non-finite variable value".to_string());
    }
    None
}

impl<S: Solver> Lexicographic<S> {
    pub fn new(solver: S) -> Self {
        Self::with_config(solver, LexicographicConfig::default())
    }

    pub fn with_config(solver: S, config: LexicographicConfig) -> Self {
        Self { solver, config }
    }

    pub fn config(&self) -> &LexicographicConfig {
        &self.config
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn solver_mut(&mut self) -> &mut S {
        &mut self.solver
    }

    pub fn into_solver(self) -> S {
        self.solver
    }

    /// Solve every objective of `model` in priority order.
    ///
    /// Returns `Err` only for precondition failures. Infeasibility,
    /// unboundedness and backend errors are reported through the result's
    /// status and diagnostic.
    pub fn orchestrate(&mut self, model: &Model) -> Result<SolveResult, OrchestratorError> {
        if model.num_objectives() == 0 {
            return Err(OrchestratorError::NoObjective);
        }
        if model.num_variables() == 0 {
            return Err(OrchestratorError::EmptyModel);
        }
        model.validate_references()?;

        let started = Instant::now();
        let objective_count = model.num_objectives();
        tracing::info!(
            component = "lexicographic",
            operation = "orchestrate",
            status = "started",
            objectives = objective_count,
            variables = model.num_variables(),
            constraints = model.num_constraints(),
            freeze = self.config.freeze.as_str(),
            "Starting lexicographic solve"
        );

        let mut state = OrchestrationState::Pending;
        let mut working = model.clone();
        let mut objective_values = Vec::with_capacity(objective_count);
        let mut passes = Vec::with_capacity(objective_count);
        let mut incumbent: Option<Vec<f64>> = None;

        for (pass, objective) in model.objectives().iter().enumerate() {
            transition(&mut state, OrchestrationState::Solving(pass));

            let solution = match self.solver.solve(&working, objective) {
                Ok(solution) => solution,
                Err(err) => {
                    tracing::warn!(
                        component = "lexicographic",
                        operation = "solve_pass",
                        status = "error",
                        pass,
                        error = %err,
                        "Backend failed"
                    );
                    transition(&mut state, OrchestrationState::Error);
                    return Ok(SolveResult::unsolved(
                        SolveStatus::Error,
                        state,
                        passes,
                        Some(err.to_string()),
                    ));
                }
            };

            let optimal = solution.status.is_optimal();
            passes.push(PassRecord {
                pass,
                status: solution.status,
                objective_value: optimal.then_some(solution.objective_value),
                solve_time_seconds: solution.solve_time_seconds,
            });

            if !optimal {
                tracing::warn!(
                    component = "lexicographic",
                    operation = "solve_pass",
                    status = solution.status.as_str(),
                    pass,
                    "Pass did not reach optimality"
                );
                return Ok(stop_early(
                    model,
                    pass,
                    solution.status,
                    state,
                    objective_values,
                    incumbent,
                    passes,
                ));
            }

            if let Some(reason) = contract_violation(model, &solution) {
                tracing::warn!(
                    component = "lexicographic",
                    operation = "solve_pass",
                    status = "error",
                    pass,
                    reason = %reason,
                    "Rejected backend solution"
                );
                transition(&mut state, OrchestrationState::Error);
                return Ok(SolveResult::unsolved(
                    SolveStatus::Error,
                    state,
                    passes,
                    Some(reason),
                ));
            }

            let value = solution.objective_value;
            tracing::debug!(
                component = "lexicographic",
                operation = "solve_pass",
                status = "success",
                pass,
                sense = objective.sense().as_str(),
                objective_value = value,
                solve_time_seconds = solution.solve_time_seconds,
                "Pass optimal"
            );
            objective_values.push(value);

            if pass + 1 < objective_count && !objective.terms().is_empty() {
                let (sense, rhs) = self.config.freeze.frozen_bound(objective.sense(), value);
                let name = frozen_name(objective, pass);
                working.add_constraint(objective.expr(), sense, rhs, Some(&name))?;
                tracing::debug!(
                    component = "lexicographic",
                    operation = "freeze",
                    status = "success",
                    pass,
                    name = %name,
                    sense = sense.as_str(),
                    rhs,
                    "Froze objective"
                );
            }
            incumbent = Some(solution.primal_values);
        }

        transition(&mut state, OrchestrationState::Done);
        let primal = incumbent.unwrap_or_default();
        tracing::info!(
            component = "lexicographic",
            operation = "orchestrate",
            status = "success",
            objectives = objective_count,
            duration_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Lexicographic solve complete"
        );
        Ok(SolveResult::solved(
            objective_values,
            named_values(model, &primal),
            primal,
            passes,
            None,
        ))
    }
}

fn stop_early(
    model: &Model,
    pass: usize,
    status: SolverStatus,
    mut state: OrchestrationState,
    objective_values: Vec<f64>,
    incumbent: Option<Vec<f64>>,
    passes: Vec<PassRecord>,
) -> SolveResult {
    match incumbent {
        Some(primal) if pass > 0 => {
            transition(&mut state, OrchestrationState::Done);
            SolveResult::solved(
                objective_values,
                named_values(model, &primal),
                primal,
                passes,
                Some(PassFailure { pass, status }),
            )
        }
        _ => {
            let (solve_status, next, diagnostic) = match status {
                SolverStatus::Infeasible => {
                    (SolveStatus::Infeasible, OrchestrationState::Infeasible, None)
                }
                SolverStatus::Unbounded => {
                    (SolveStatus::Unbounded, OrchestrationState::Unbounded, None)
                }
                other => (
                    SolveStatus::Error,
                    OrchestrationState::Error,
                    Some(format!("first objective ended with status {other}")),
                ),
            };
            transition(&mut state, next);
            SolveResult::unsolved(solve_status, state, passes, diagnostic)
        }
    }
}

fn named_values(model: &Model, primal: &[f64]) -> Vec<(String, f64)> {
    model
        .variables()
        .iter()
        .zip(primal)
        .map(|(var, value)| (var.name.clone(), *value))
        .collect()
}
