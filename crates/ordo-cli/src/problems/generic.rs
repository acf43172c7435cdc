use super::{ProblemError, require_finite, warn_unresolved};
use ordo_core::{
    Bounds, ComparisonSense, ConflictMap, Model, ModelBuilder, ModelError, Sense, Variable,
    VariableKind, new_builder,
};
use serde::Deserialize;
use std::collections::BTreeMap;

/// A model spelled out variable by variable.
///
/// Omitted bounds default to `[0, 1]` for binaries and `[0, +inf)`
/// otherwise.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenericModel {
    pub variables: Vec<VariableSpec>,
    #[serde(default)]
    pub constraints: Vec<ConstraintSpec>,
    pub objectives: Vec<ObjectiveSpec>,
    /// Directional conflict declarations over binary variables.
    #[serde(default)]
    pub conflicts: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariableSpec {
    pub name: String,
    #[serde(default)]
    pub kind: VariableKind,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RowSense {
    #[serde(rename = "<=", alias = "le")]
    LessEqual,
    #[serde(rename = ">=", alias = "ge")]
    GreaterEqual,
    #[serde(rename = "=", alias = "eq")]
    Equal,
}

impl From<RowSense> for ComparisonSense {
    fn from(sense: RowSense) -> Self {
        match sense {
            RowSense::LessEqual => ComparisonSense::LessEqual,
            RowSense::GreaterEqual => ComparisonSense::GreaterEqual,
            RowSense::Equal => ComparisonSense::Equal,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConstraintSpec {
    pub name: Option<String>,
    pub terms: BTreeMap<String, f64>,
    pub sense: RowSense,
    pub rhs: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectiveSpec {
    pub name: Option<String>,
    pub sense: Sense,
    pub terms: BTreeMap<String, f64>,
    #[serde(default)]
    pub constant: f64,
}

impl VariableSpec {
    fn bounds(&self) -> Bounds {
        let (lower, upper) = match self.kind {
            VariableKind::Binary => (0.0, 1.0),
            _ => (0.0, f64::INFINITY),
        };
        Bounds::new(self.lower.unwrap_or(lower), self.upper.unwrap_or(upper))
    }
}

fn named_terms(terms: &BTreeMap<String, f64>) -> Vec<(&str, f64)> {
    terms
        .iter()
        .map(|(name, coeff)| (name.as_str(), *coeff))
        .collect()
}

impl GenericModel {
    pub fn build(&self) -> Result<Model, ProblemError> {
        if self.objectives.is_empty() {
            return Err(ProblemError::invalid(
                "objectives",
                "at least one objective is required",
            ));
        }

        let mut builder = new_builder();
        for (index, spec) in self.variables.iter().enumerate() {
            builder = builder
                .add_variable(Variable::new(spec.name.clone(), spec.bounds(), spec.kind))
                .map_err(|err| ProblemError::model(format!("variables[{index}]"), err))?;
        }

        for (index, spec) in self.constraints.iter().enumerate() {
            require_finite(&format!("constraints[{index}].rhs"), spec.rhs)?;
            builder = add_row(builder, spec)
                .map_err(|err| ProblemError::model(format!("constraints[{index}]"), err))?;
        }

        if !self.conflicts.is_empty() {
            let facts: ConflictMap = self.conflicts.iter().collect();
            builder = builder
                .add_relational_constraints(&facts)
                .map_err(|err| ProblemError::model("conflicts", err))?;
            warn_unresolved(builder.unresolved_references());
        }

        for (index, spec) in self.objectives.iter().enumerate() {
            let expr = builder
                .expr(&named_terms(&spec.terms))
                .map_err(|err| ProblemError::model(format!("objectives[{index}].terms"), err))?
                .add_constant(spec.constant);
            builder = builder
                .add_objective_expr(expr, spec.sense, spec.name.as_deref())
                .map_err(|err| ProblemError::model(format!("objectives[{index}]"), err))?;
        }

        Ok(builder.build())
    }
}

fn add_row(builder: ModelBuilder, spec: &ConstraintSpec) -> Result<ModelBuilder, ModelError> {
    let row = builder
        .expr(&named_terms(&spec.terms))?
        .compare_scalar(spec.rhs, spec.sense.into());
    builder.add_constraint(row, spec.name.as_deref())
}
