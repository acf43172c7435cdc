//! The optimization model: variables, constraint rows and a priority list of
//! objectives. Insertion lives in `insert`, read access in `storage`.

mod error;
mod insert;
mod storage;

use crate::types::{Constraint, Objective, Variable};
use ordo_expr::{LinearExpr, VariableId};
use std::collections::BTreeMap;

pub use error::ModelError;

/// An incrementally built linear or mixed-integer program.
///
/// Variables keep insertion order (their [`VariableId`] is their position),
/// constraints are append-only, and objectives form a priority list where
/// index 0 is the most important. Every term of every constraint and objective
/// refers to a variable of this model; the insertion methods reject anything
/// else.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub(crate) variables: Vec<Variable>,
    pub(crate) variable_index: BTreeMap<String, VariableId>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) objectives: Vec<Objective>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a value-returning builder over a fresh model.
    pub fn builder() -> crate::builder::ModelBuilder {
        crate::builder::ModelBuilder::new()
    }

    pub(crate) fn ensure_variable_exists(&self, id: VariableId) -> Result<(), ModelError> {
        if id.index() < self.variables.len() {
            Ok(())
        } else {
            Err(ModelError::UnknownVariable(id))
        }
    }

    /// Validated terms in stored form: one entry per variable, ordered by id,
    /// zeros dropped.
    pub(crate) fn normalize_terms(
        &self,
        terms: Vec<(VariableId, f64)>,
    ) -> Result<Vec<(VariableId, f64)>, ModelError> {
        for &(var_id, coefficient) in &terms {
            self.ensure_variable_exists(var_id)?;
            if !coefficient.is_finite() {
                return Err(ModelError::InvalidCoefficient { coefficient });
            }
        }
        let raw = terms.len();
        let merged = LinearExpr::from_linear(terms).normalized_terms();
        tracing::trace!(
            component = "model",
            operation = "normalize_terms",
            status = "success",
            terms_in = raw,
            terms_out = merged.len(),
            "Merged expression terms"
        );
        Ok(merged)
    }

    /// Re-check that every constraint and objective term refers to a variable
    /// of this model.
    pub fn validate_references(&self) -> Result<(), ModelError> {
        let constraint_terms = self.constraints.iter().flat_map(|c| c.terms.iter());
        let objective_terms = self.objectives.iter().flat_map(|o| o.terms.iter());
        for (var_id, _) in constraint_terms.chain(objective_terms) {
            self.ensure_variable_exists(*var_id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::types::{Bounds, Sense, VariableKind};
    use ordo_expr::{ComparisonSense, LinearExpr};

    mod invariants;
    mod support;

    #[test]
    fn test_new_model_is_empty() {
        let model = Model::new();
        assert_eq!(model.num_variables(), 0);
        assert_eq!(model.num_constraints(), 0);
        assert_eq!(model.num_objectives(), 0);
    }

    #[test]
    fn test_add_variable_assigns_positional_ids() {
        let mut model = Model::new();
        let x = model
            .add_variable(Variable::continuous("x", Bounds::new(0.0, 10.0)))
            .unwrap();
        let y = model.add_variable(Variable::binary("y")).unwrap();

        assert_eq!(x.index(), 0);
        assert_eq!(y.index(), 1);
        assert_eq!(model.variable(y).unwrap().kind, VariableKind::Binary);
        assert_eq!(model.variable_by_name("x"), Some(x));
        assert_eq!(model.variable_name(x), Some("x"));
    }

    #[test]
    fn test_add_constraint_normalizes_terms() {
        let mut model = Model::new();
        let x = model
            .add_variable(Variable::continuous("x", Bounds::non_negative()))
            .unwrap();
        let y = model
            .add_variable(Variable::continuous("y", Bounds::non_negative()))
            .unwrap();

        let expr = LinearExpr::term(y, 2.0)
            + LinearExpr::term(x, 1.0)
            + LinearExpr::term(y, -2.0)
            + LinearExpr::term(x, 0.5);
        let id = model
            .add_constraint(expr, ComparisonSense::LessEqual, 4.0, Some("cap"))
            .unwrap();

        let stored = model.constraint(id).unwrap();
        assert_eq!(stored.terms(), &[(x, 1.5)]);
        assert_eq!(stored.rhs(), 4.0);
        assert_eq!(stored.name(), Some("cap"));
        assert_eq!(model.constraint_by_name("cap"), Some(id));
    }

    #[test]
    fn test_add_constraint_folds_expression_constant() {
        let mut model = Model::new();
        let x = model
            .add_variable(Variable::continuous("x", Bounds::non_negative()))
            .unwrap();
        let id = model
            .add_constraint_expr(
                LinearExpr::new(vec![(x, 1.0)], 3.0).ge_scalar(5.0),
                None,
            )
            .unwrap();
        let stored = model.constraint(id).unwrap();
        assert_eq!(stored.sense(), ComparisonSense::GreaterEqual);
        assert_eq!(stored.rhs(), 2.0);
    }

    #[test]
    fn test_objectives_are_appended_in_priority_order() {
        let mut model = Model::new();
        let x = model
            .add_variable(Variable::integer("x", Bounds::new(0.0, 10.0)))
            .unwrap();
        let y = model
            .add_variable(Variable::integer("y", Bounds::new(0.0, 10.0)))
            .unwrap();

        let first = model.minimize(LinearExpr::var(x)).unwrap();
        let second = model.maximize(LinearExpr::var(y)).unwrap();

        assert_eq!((first, second), (0, 1));
        assert_eq!(model.num_objectives(), 2);
        assert_eq!(model.objective(0).unwrap().sense(), Sense::Minimize);
        assert_eq!(model.objective(1).unwrap().sense(), Sense::Maximize);
        assert_eq!(model.objective(1).unwrap().terms(), &[(y, 1.0)]);
    }

    #[test]
    fn test_objective_keeps_constant_offset() {
        let mut model = Model::new();
        let x = model
            .add_variable(Variable::continuous("x", Bounds::new(0.0, 1.0)))
            .unwrap();
        model
            .add_objective(LinearExpr::new(vec![(x, 2.0)], 7.0), Sense::Maximize, Some("score"))
            .unwrap();
        let objective = model.objective(0).unwrap();
        assert_eq!(objective.constant(), 7.0);
        assert_eq!(objective.name(), Some("score"));
        assert_eq!(objective.evaluate(&[1.0]), 9.0);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut model = Model::new();
        let x = model
            .add_variable(Variable::continuous("x", Bounds::non_negative()))
            .unwrap();
        let mut working = model.clone();
        working
            .add_constraint(LinearExpr::var(x), ComparisonSense::LessEqual, 1.0, None)
            .unwrap();
        assert_eq!(model.num_constraints(), 0);
        assert_eq!(working.num_constraints(), 1);
    }
}
