use super::Model;
use crate::types::{Constraint, Objective, Variable};
use ordo_expr::{ConstraintId, VariableId};

impl Model {
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn num_objectives(&self) -> usize {
        self.objectives.len()
    }

    /// All variables in insertion order.
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, id: VariableId) -> Option<&Variable> {
        self.variables.get(id.index())
    }

    pub fn variable_by_name(&self, name: &str) -> Option<VariableId> {
        self.variable_index.get(name).copied()
    }

    pub fn variable_name(&self, id: VariableId) -> Option<&str> {
        self.variable(id).map(|var| var.name.as_str())
    }

    /// Iterate `(id, variable)` pairs in insertion order.
    pub fn iter_variables(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        self.variables
            .iter()
            .enumerate()
            .map(|(index, var)| (VariableId::new(index as u32), var))
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn constraint(&self, id: ConstraintId) -> Option<&Constraint> {
        self.constraints.get(id.index())
    }

    /// First constraint carrying `name`, if any.
    pub fn constraint_by_name(&self, name: &str) -> Option<ConstraintId> {
        self.constraints
            .iter()
            .position(|constraint| constraint.name() == Some(name))
            .map(|index| ConstraintId::new(index as u32))
    }

    /// Objectives in priority order, index 0 first.
    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    pub fn objective(&self, priority: usize) -> Option<&Objective> {
        self.objectives.get(priority)
    }
}
