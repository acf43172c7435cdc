use crate::model::Model;
use crate::solver::{Solution, Solver, SolverError, SolverStatus};
use crate::types::{Bounds, Objective, Variable};
use ordo_expr::{ComparisonSense, LinearExpr, VariableId};
use std::collections::VecDeque;

/// Exhaustive search over small bounded integer models.
///
/// Ties keep the first point in lexicographic grid order, so results are
/// deterministic.
#[derive(Debug, Default)]
pub(super) struct EnumerationSolver {
    pub(super) seen: Vec<Model>,
}

impl Solver for EnumerationSolver {
    fn solve(&mut self, model: &Model, objective: &Objective) -> Result<Solution, SolverError> {
        self.seen.push(model.clone());

        let mut ranges = Vec::with_capacity(model.num_variables());
        for var in model.variables() {
            let Bounds { lower, upper } = var.bounds;
            if !var.kind.is_integral() || !lower.is_finite() || !upper.is_finite() {
                return Err(SolverError::Backend(format!(
                    "cannot enumerate variable '{}'",
                    var.name
                )));
            }
            ranges.push((lower.ceil() as i64, upper.floor() as i64));
        }
        if ranges.iter().any(|(lo, hi)| lo > hi) {
            return Ok(Solution::without_values(SolverStatus::Infeasible));
        }

        let mut point: Vec<i64> = ranges.iter().map(|(lo, _)| *lo).collect();
        let mut best: Option<(Vec<f64>, f64)> = None;
        loop {
            let values: Vec<f64> = point.iter().map(|v| *v as f64).collect();
            let feasible = model
                .constraints()
                .iter()
                .all(|row| row.is_satisfied_by(&values, 1e-9));
            if feasible {
                let value = objective.evaluate(&values);
                let better = best
                    .as_ref()
                    .is_none_or(|(_, incumbent)| objective.improves(value, *incumbent));
                if better {
                    best = Some((values, value));
                }
            }

            // Odometer step; the last variable moves fastest.
            let mut index = point.len();
            loop {
                if index == 0 {
                    return Ok(match best {
                        Some((values, value)) => {
                            Solution::with_values(SolverStatus::Optimal, values, value)
                        }
                        None => Solution::without_values(SolverStatus::Infeasible),
                    });
                }
                index -= 1;
                if point[index] < ranges[index].1 {
                    point[index] += 1;
                    break;
                }
                point[index] = ranges[index].0;
            }
        }
    }
}

/// Replays canned backend responses and records every model it receives.
#[derive(Debug, Default)]
pub(super) struct ScriptedSolver {
    responses: VecDeque<Result<Solution, SolverError>>,
    pub(super) seen: Vec<Model>,
}

impl ScriptedSolver {
    pub(super) fn new(responses: Vec<Result<Solution, SolverError>>) -> Self {
        Self {
            responses: responses.into(),
            seen: Vec::new(),
        }
    }
}

impl Solver for ScriptedSolver {
    fn solve(&mut self, model: &Model, _objective: &Objective) -> Result<Solution, SolverError> {
        self.seen.push(model.clone());
        self.responses
            .pop_front()
            .unwrap_or_else(|| Err(SolverError::Backend("script exhausted".to_string())))
    }
}

pub(super) fn optimal(values: &[f64], objective_value: f64) -> Result<Solution, SolverError> {
    Ok(Solution::with_values(
        SolverStatus::Optimal,
        values.to_vec(),
        objective_value,
    ))
}

/// `x, y ∈ [0, 10]` integer with `x + y = 10`, objectives `[min x, max y]`.
pub(super) fn priority_model() -> (Model, VariableId, VariableId) {
    let mut model = Model::new();
    let x = model
        .add_variable(Variable::integer("x", Bounds::new(0.0, 10.0)))
        .expect("add x");
    let y = model
        .add_variable(Variable::integer("y", Bounds::new(0.0, 10.0)))
        .expect("add y");
    model
        .add_constraint(
            LinearExpr::var(x) + LinearExpr::var(y),
            ComparisonSense::Equal,
            10.0,
            Some("split"),
        )
        .expect("add split");
    model.minimize(LinearExpr::var(x)).expect("min x");
    model.maximize(LinearExpr::var(y)).expect("max y");
    (model, x, y)
}
