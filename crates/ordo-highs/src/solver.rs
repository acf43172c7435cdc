//! [`ordo_core::Solver`] implementation over HiGHS.

use crate::problem::{HighsProblem, HighsProblemError, ObjectiveSense};
use crate::status::map_model_status;
use ordo_core::{
    ComparisonSense, Model, Objective, Sense, Solution, Solver, SolverConfig, SolverError,
};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, trace, warn};

fn problem_error(err: HighsProblemError) -> SolverError {
    SolverError::Backend(err.to_string())
}

/// HiGHS-backed solver.
///
/// Holds only configuration; each solve builds and drops its own HiGHS
/// instance, so one solver can serve any number of passes and models.
#[derive(Debug, Clone, Default)]
pub struct HighsSolver {
    config: SolverConfig,
}

impl HighsSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SolverConfig) {
        self.config = config;
    }
}

impl Solver for HighsSolver {
    fn solve(&mut self, model: &Model, objective: &Objective) -> Result<Solution, SolverError> {
        solve_model(model, objective, &self.config)
    }
}

/// Smallest feasibility tolerance HiGHS accepts.
const MIN_TOLERANCE: f64 = 1e-10;

fn checked(name: &str, value: f64, min: f64) -> Result<f64, SolverError> {
    if value >= min {
        Ok(value)
    } else {
        warn!(
            component = "solver",
            operation = "configure",
            status = "error",
            option = name,
            value,
            min,
            "Rejected solver option"
        );
        Err(SolverError::Backend(format!(
            "option {name} must be at least {min} (got {value})"
        )))
    }
}

fn apply_solver_config(
    problem: &mut HighsProblem,
    config: &SolverConfig,
) -> Result<(), SolverError> {
    problem.set_verbose(config.log_to_console == Some(true));

    let clamp = |value: u32| i32::try_from(value).unwrap_or(i32::MAX);
    if let Some(limit) = config.time_limit {
        problem.set_option("time_limit", checked("time_limit", limit, 0.0)?);
    }
    if let Some(gap) = config.mip_gap {
        problem.set_option("mip_rel_gap", checked("mip_gap", gap, 0.0)?);
    }
    if let Some(level) = config.verbosity {
        problem.set_option("output_flag", level > 0);
    }
    if let Some(presolve) = config.presolve {
        problem.set_option("presolve", if presolve { "on" } else { "off" });
    }
    if let Some(threads) = config.threads {
        problem.set_option("threads", clamp(threads));
    }
    if let Some(tolerance) = config.tolerance {
        let tolerance = checked("tolerance", tolerance, MIN_TOLERANCE)?;
        problem.set_option("primal_feasibility_tolerance", tolerance);
        problem.set_option("dual_feasibility_tolerance", tolerance);
    }
    if let Some(seed) = config.random_seed {
        problem.set_option("random_seed", clamp(seed));
    }
    Ok(())
}

fn objective_costs(model: &Model, objective: &Objective) -> Result<Vec<f64>, SolverError> {
    let mut costs = vec![0.0; model.num_variables()];
    for (var_id, coeff) in objective.terms() {
        let slot = costs
            .get_mut(var_id.index())
            .ok_or(SolverError::UnknownVariable(var_id))?;
        *slot += coeff;
    }
    Ok(costs)
}

fn row_bounds(sense: ComparisonSense, rhs: f64) -> (f64, f64) {
    match sense {
        ComparisonSense::LessEqual => (f64::NEG_INFINITY, rhs),
        ComparisonSense::GreaterEqual => (rhs, f64::INFINITY),
        ComparisonSense::Equal => (rhs, rhs),
    }
}

fn build_problem(
    model: &Model,
    objective: &Objective,
    config: &SolverConfig,
) -> Result<HighsProblem, SolverError> {
    let sense = match objective.sense() {
        Sense::Minimize => ObjectiveSense::Minimize,
        Sense::Maximize => ObjectiveSense::Maximize,
    };
    let mut problem = HighsProblem::new(sense);
    apply_solver_config(&mut problem, config)?;

    let costs = objective_costs(model, objective)?;
    for (variable, cost) in model.variables().iter().zip(&costs) {
        problem.add_column(
            variable.bounds.lower,
            variable.bounds.upper,
            *cost,
            variable.kind.is_integral(),
        );
    }

    for (index, constraint) in model.constraints().iter().enumerate() {
        let (lower, upper) = row_bounds(constraint.sense(), constraint.rhs());
        let factors: Vec<(usize, f64)> = constraint
            .terms()
            .iter()
            .map(|(var_id, coeff)| (var_id.index(), *coeff))
            .collect();
        problem
            .add_row(lower, upper, &factors)
            .map_err(problem_error)?;
        trace!(
            component = "solver",
            operation = "add_constraint",
            status = "success",
            constraint_index = index,
            name = constraint.name().unwrap_or(""),
            lower,
            upper,
            "Added constraint to HiGHS"
        );
    }

    debug!(
        component = "solver",
        operation = "build_problem",
        status = "success",
        num_cols = problem.num_columns(),
        num_rows = problem.num_rows(),
        "Built HiGHS problem"
    );
    Ok(problem)
}

fn solve_model(
    model: &Model,
    objective: &Objective,
    config: &SolverConfig,
) -> Result<Solution, SolverError> {
    if model.num_variables() == 0 {
        return Err(SolverError::EmptyModel);
    }
    let solve_started = Instant::now();

    let problem = build_problem(model, objective, config)?;
    let num_rows = problem.num_rows();
    let outcome = problem.solve().map_err(problem_error)?;
    let status = map_model_status(outcome.status);
    let solve_time_seconds = solve_started.elapsed().as_secs_f64();

    let mut metadata = BTreeMap::new();
    metadata.insert("num_rows".to_string(), num_rows as f64);
    metadata.insert("num_cols".to_string(), model.num_variables() as f64);
    if outcome.mip_gap.is_finite() {
        metadata.insert("mip_gap".to_string(), outcome.mip_gap);
    }

    let has_point =
        status.is_feasible() && outcome.col_values.len() == model.num_variables();
    if !has_point {
        warn!(
            component = "solver",
            operation = "solve",
            status = "warn",
            solver = "highs",
            solver_status = status.as_str(),
            duration_ms = solve_time_seconds * 1000.0,
            "HiGHS did not return a solution"
        );
        return Ok(Solution {
            solve_time_seconds,
            metadata,
            ..Solution::without_values(status)
        });
    }

    // HiGHS never sees the objective constant; evaluate in full here.
    let objective_value = objective.evaluate(&outcome.col_values);
    debug!(
        component = "solver",
        operation = "solve",
        status = "success",
        solver = "highs",
        solver_status = status.as_str(),
        objective_value,
        mip_gap = outcome.mip_gap,
        duration_ms = solve_time_seconds * 1000.0,
        "HiGHS solve completed"
    );

    Ok(Solution {
        status,
        primal_values: outcome.col_values,
        objective_value,
        solve_time_seconds,
        metadata,
    })
}
