//! Value-returning model builder.
//!
//! Every step consumes the builder and hands it back on success, so a
//! half-built model is never shared between two call chains:
//!
//! ```
//! use ordo_core::{Bounds, Sense, new_builder};
//!
//! let bounds = [Bounds::new(0.0, 10.0), Bounds::new(0.0, 20.0)];
//! let model = new_builder()
//!     .add_variables(2, |i| format!("x{i}"), Some(&bounds[..]), None)?
//!     .add_constraints_from_matrix(&[[1.0, 1.0]], &[25.0])?
//!     .add_objective(&[1.0, 1.0], Sense::Maximize)?
//!     .build();
//! assert_eq!(model.num_constraints(), 1);
//! # Ok::<(), ordo_core::ModelError>(())
//! ```
//!
//! A failed step drops the builder. Callers that want to recover from an
//! error and keep going should work on [`Model`] directly.

use crate::model::{Model, ModelError};
use crate::synthesis::{ConflictMap, UnresolvedReference, synthesize_conflicts_mapped};
use crate::types::{Bounds, Sense, Variable, VariableKind};
use ordo_expr::{ComparisonSense, ConstraintExpr, LinearExpr, VariableId, dense};

/// Incremental façade over [`Model`].
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct ModelBuilder {
    model: Model,
    unresolved: Vec<UnresolvedReference>,
}

/// Start a new builder over an empty model.
pub fn new_builder() -> ModelBuilder {
    ModelBuilder::new()
}

fn check_len(context: &'static str, expected: usize, got: usize) -> Result<(), ModelError> {
    if expected == got {
        Ok(())
    } else {
        Err(ModelError::DimensionMismatch {
            context,
            expected,
            got,
        })
    }
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_variable(mut self, variable: Variable) -> Result<Self, ModelError> {
        self.model.add_variable(variable)?;
        Ok(self)
    }

    /// Add `count` variables named by `namer(i)`.
    ///
    /// `bounds` and `kinds`, when given, must hold one entry per new variable.
    /// Missing bounds default to `[0, 1]` for binaries and `[0, +inf)`
    /// otherwise; missing kinds default to continuous.
    pub fn add_variables<F>(
        mut self,
        count: usize,
        mut namer: F,
        bounds: Option<&[Bounds]>,
        kinds: Option<&[VariableKind]>,
    ) -> Result<Self, ModelError>
    where
        F: FnMut(usize) -> String,
    {
        if let Some(bounds) = bounds {
            check_len("variable bounds", count, bounds.len())?;
        }
        if let Some(kinds) = kinds {
            check_len("variable kinds", count, kinds.len())?;
        }

        for index in 0..count {
            let kind = kinds.map_or(VariableKind::Continuous, |kinds| kinds[index]);
            let bounds = match bounds {
                Some(bounds) => bounds[index],
                None if kind == VariableKind::Binary => Bounds::unit(),
                None => Bounds::non_negative(),
            };
            self.model
                .add_variable(Variable::new(namer(index), bounds, kind))?;
        }
        Ok(self)
    }

    pub fn add_constraint(
        mut self,
        constraint: ConstraintExpr,
        name: Option<&str>,
    ) -> Result<Self, ModelError> {
        self.model.add_constraint_expr(constraint, name)?;
        Ok(self)
    }

    /// Add one `Σ_j lhs[row][j]·var_j ≤ rhs[row]` constraint per row.
    ///
    /// Columns follow variable insertion order, so every row must be as wide
    /// as the current variable count. Shapes are checked before any row is
    /// added.
    pub fn add_constraints_from_matrix<R>(
        mut self,
        lhs: &[R],
        rhs: &[f64],
    ) -> Result<Self, ModelError>
    where
        R: AsRef<[f64]>,
    {
        check_len("right-hand side values", lhs.len(), rhs.len())?;
        let width = self.model.num_variables();
        for row in lhs {
            check_len("constraint row", width, row.as_ref().len())?;
        }

        for (row, bound) in lhs.iter().zip(rhs) {
            self.model.add_constraint(
                dense(row.as_ref()),
                ComparisonSense::LessEqual,
                *bound,
                None,
            )?;
        }
        tracing::debug!(
            component = "builder",
            operation = "add_constraints_from_matrix",
            status = "success",
            rows = lhs.len(),
            columns = width,
            "Added matrix constraints"
        );
        Ok(self)
    }

    /// Append an objective given one coefficient per variable.
    pub fn add_objective(mut self, coefficients: &[f64], sense: Sense) -> Result<Self, ModelError> {
        check_len(
            "objective coefficients",
            self.model.num_variables(),
            coefficients.len(),
        )?;
        self.model
            .add_objective(dense(coefficients), sense, None)?;
        Ok(self)
    }

    /// Append an objective given as an expression.
    pub fn add_objective_expr(
        mut self,
        expr: LinearExpr,
        sense: Sense,
        name: Option<&str>,
    ) -> Result<Self, ModelError> {
        self.model.add_objective(expr, sense, name)?;
        Ok(self)
    }

    /// Add conflict constraints, matching entity identifiers to variable names.
    pub fn add_relational_constraints(self, facts: &ConflictMap) -> Result<Self, ModelError> {
        self.add_relational_constraints_with(facts, |entity| entity.to_string())
    }

    /// Add conflict constraints, mapping identifiers to variable names first.
    pub fn add_relational_constraints_with<F>(
        mut self,
        facts: &ConflictMap,
        variable_name: F,
    ) -> Result<Self, ModelError>
    where
        F: Fn(&str) -> String,
    {
        let report = synthesize_conflicts_mapped(&mut self.model, facts, variable_name)?;
        self.unresolved.extend(report.unresolved);
        Ok(self)
    }

    /// Look up a variable added earlier.
    pub fn variable(&self, name: &str) -> Result<VariableId, ModelError> {
        self.model
            .variable_by_name(name)
            .ok_or_else(|| ModelError::UnknownVariableName {
                name: name.to_string(),
            })
    }

    /// Build an expression from `(variable name, coefficient)` pairs.
    pub fn expr(&self, terms: &[(&str, f64)]) -> Result<LinearExpr, ModelError> {
        let linear = terms
            .iter()
            .map(|(name, coeff)| Ok((self.variable(name)?, *coeff)))
            .collect::<Result<Vec<_>, ModelError>>()?;
        Ok(LinearExpr::from_linear(linear))
    }

    /// The model assembled so far.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Conflict references skipped by relational steps so far.
    pub fn unresolved_references(&self) -> &[UnresolvedReference] {
        &self.unresolved
    }

    pub fn build(self) -> Model {
        tracing::debug!(
            component = "builder",
            operation = "build",
            status = "success",
            variables = self.model.num_variables(),
            constraints = self.model.num_constraints(),
            objectives = self.model.num_objectives(),
            "Built model"
        );
        self.model
    }
}
