use super::{Model, ModelError};
use crate::types::{Bounds, Constraint, Objective, Sense, Variable, VariableKind};
use ordo_expr::{ComparisonSense, ConstraintExpr, ConstraintId, LinearExpr, VariableId};

fn validate_bounds(name: &str, bounds: Bounds, kind: VariableKind) -> Result<(), ModelError> {
    let Bounds { lower, upper } = bounds;
    let empty = lower == f64::INFINITY || upper == f64::NEG_INFINITY;
    if lower.is_nan() || upper.is_nan() || lower > upper || empty {
        return Err(ModelError::InvalidVariableBounds {
            name: name.to_string(),
            lower,
            upper,
        });
    }
    if kind == VariableKind::Binary {
        let integral = lower.fract() == 0.0 && upper.fract() == 0.0;
        if !(integral && lower >= 0.0 && upper <= 1.0) {
            return Err(ModelError::InvalidBinaryBounds {
                name: name.to_string(),
                lower,
                upper,
            });
        }
    }
    Ok(())
}

/// A right-hand side no point can reach: NaN, or infinite on the bounded side.
fn unreachable_rhs(sense: ComparisonSense, rhs: f64) -> bool {
    match sense {
        ComparisonSense::LessEqual => rhs.is_nan() || rhs == f64::NEG_INFINITY,
        ComparisonSense::GreaterEqual => rhs.is_nan() || rhs == f64::INFINITY,
        ComparisonSense::Equal => !rhs.is_finite(),
    }
}

impl Model {
    /// Add a variable to the model.
    ///
    /// Names are unique within a model. The returned id is the variable's
    /// position in insertion order.
    pub fn add_variable(&mut self, variable: Variable) -> Result<VariableId, ModelError> {
        if self.variable_index.contains_key(&variable.name) {
            tracing::debug!(
                component = "model",
                operation = "add_variable",
                status = "error",
                name = %variable.name,
                "Duplicate variable name"
            );
            return Err(ModelError::DuplicateName {
                name: variable.name,
            });
        }
        validate_bounds(&variable.name, variable.bounds, variable.kind)?;

        let var_id = VariableId::new(self.variables.len() as u32);
        tracing::debug!(
            component = "model",
            operation = "add_variable",
            status = "success",
            var_id = var_id.inner(),
            name = %variable.name,
            kind = variable.kind.as_str(),
            lower = variable.bounds.lower,
            upper = variable.bounds.upper,
            "Added variable"
        );
        self.variable_index.insert(variable.name.clone(), var_id);
        self.variables.push(variable);
        Ok(var_id)
    }

    /// Append a constraint `expr (sense) rhs`.
    ///
    /// A constant carried by `expr` is moved to the right-hand side.
    pub fn add_constraint(
        &mut self,
        expr: LinearExpr,
        sense: ComparisonSense,
        rhs: f64,
        name: Option<&str>,
    ) -> Result<ConstraintId, ModelError> {
        if unreachable_rhs(sense, rhs) {
            return Err(ModelError::InvalidRhs { rhs });
        }
        let (terms, constant) = expr.into_parts();
        if !constant.is_finite() {
            return Err(ModelError::InvalidCoefficient {
                coefficient: constant,
            });
        }
        let terms = self.normalize_terms(terms)?;

        let constraint_id = ConstraintId::new(self.constraints.len() as u32);
        tracing::debug!(
            component = "model",
            operation = "add_constraint",
            status = "success",
            constraint_id = constraint_id.inner(),
            name = name.unwrap_or(""),
            sense = sense.as_str(),
            terms = terms.len(),
            rhs = rhs - constant,
            "Added constraint"
        );
        self.constraints.push(Constraint {
            name: name.map(str::to_string),
            terms,
            sense,
            rhs: rhs - constant,
        });
        Ok(constraint_id)
    }

    /// Append a constraint produced by the expression comparison helpers.
    pub fn add_constraint_expr(
        &mut self,
        constraint: ConstraintExpr,
        name: Option<&str>,
    ) -> Result<ConstraintId, ModelError> {
        let (expr, sense, rhs) = constraint.into_parts();
        self.add_constraint(expr, sense, rhs, name)
    }

    /// Append an objective to the priority list and return its index.
    ///
    /// Earlier objectives take precedence over later ones.
    pub fn add_objective(
        &mut self,
        expr: LinearExpr,
        sense: Sense,
        name: Option<&str>,
    ) -> Result<usize, ModelError> {
        let (terms, constant) = expr.into_parts();
        if !constant.is_finite() {
            return Err(ModelError::InvalidCoefficient {
                coefficient: constant,
            });
        }
        let terms = self.normalize_terms(terms)?;

        let index = self.objectives.len();
        tracing::debug!(
            component = "model",
            operation = "add_objective",
            status = "success",
            priority = index,
            sense = sense.as_str(),
            terms = terms.len(),
            name = name.unwrap_or(""),
            "Added objective"
        );
        self.objectives.push(Objective {
            name: name.map(str::to_string),
            sense,
            terms,
            constant,
        });
        Ok(index)
    }

    /// Append a minimization objective.
    pub fn minimize(&mut self, expr: LinearExpr) -> Result<usize, ModelError> {
        self.add_objective(expr, Sense::Minimize, None)
    }

    /// Append a maximization objective.
    pub fn maximize(&mut self, expr: LinearExpr) -> Result<usize, ModelError> {
        self.add_objective(expr, Sense::Maximize, None)
    }
}
