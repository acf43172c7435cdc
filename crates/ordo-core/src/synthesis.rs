//! Conflict synthesis.
//!
//! Turns "entity A conflicts with {B, C}" declarations into one linear row per
//! entity over the entities' 0/1 selection variables:
//!
//! ```text
//! |R|·x_A + Σ_{p ∈ R} x_p ≤ |R|
//! ```
//!
//! where `R` is the set of A's conflicts that resolve to a model variable.
//! Picking A forces every member of `R` to zero; leaving A out leaves the row
//! slack. Declarations are directional: only the entity's own list is read.

use crate::model::{Model, ModelError};
use ordo_expr::{ComparisonSense, ConstraintId, LinearExpr, VariableId};
use std::collections::{BTreeMap, BTreeSet};

/// Conflict declarations keyed by entity identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictMap {
    entries: BTreeMap<String, BTreeSet<String>>,
}

impl ConflictMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that `entity` conflicts with each of `others`.
    ///
    /// Repeated declarations for the same entity accumulate.
    pub fn declare<I, S>(&mut self, entity: impl Into<String>, others: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .entry(entity.into())
            .or_default()
            .extend(others.into_iter().map(Into::into));
    }

    /// Value-returning form of [`ConflictMap::declare`].
    pub fn with<I, S>(mut self, entity: impl Into<String>, others: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declare(entity, others);
        self
    }

    /// Copy of this map where every `A → B` also appears as `B → A`.
    pub fn symmetric(&self) -> Self {
        let mut closed = self.clone();
        for (entity, others) in &self.entries {
            for other in others {
                closed.declare(other.clone(), [entity.clone()]);
            }
        }
        closed
    }

    pub fn conflicts_of(&self, entity: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.entries
            .iter()
            .map(|(entity, others)| (entity.as_str(), others))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, I, S> FromIterator<(K, I)> for ConflictMap
where
    K: Into<String>,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, I)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (entity, others) in iter {
            map.declare(entity, others);
        }
        map
    }
}

/// A declaration that could not be matched to a model variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    pub entity: String,
    /// `None` when the entity itself has no variable.
    pub reference: Option<String>,
}

/// What a synthesis run added to the model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SynthesisReport {
    pub emitted: Vec<ConstraintId>,
    pub unresolved: Vec<UnresolvedReference>,
}

struct PlannedRow<'a> {
    entity: &'a str,
    selector: VariableId,
    related: BTreeSet<VariableId>,
}

/// Emit conflict rows, matching entity identifiers to variable names as-is.
pub fn synthesize_conflicts(
    model: &mut Model,
    facts: &ConflictMap,
) -> Result<SynthesisReport, ModelError> {
    synthesize_conflicts_mapped(model, facts, |entity| entity.to_string())
}

/// Emit conflict rows, mapping each entity identifier to a variable name with
/// `variable_name` first.
///
/// Nothing is added to the model if any resolved variable is not a 0/1
/// selection variable.
pub fn synthesize_conflicts_mapped<F>(
    model: &mut Model,
    facts: &ConflictMap,
    variable_name: F,
) -> Result<SynthesisReport, ModelError>
where
    F: Fn(&str) -> String,
{
    let mut report = SynthesisReport::default();
    let lookup = |model: &Model, entity: &str| model.variable_by_name(&variable_name(entity));

    let mut planned = Vec::new();
    for (entity, others) in facts.iter() {
        if others.is_empty() {
            continue;
        }
        let Some(selector) = lookup(model, entity) else {
            report.unresolved.push(UnresolvedReference {
                entity: entity.to_string(),
                reference: None,
            });
            continue;
        };

        let mut related = BTreeSet::new();
        for other in others {
            if other == entity {
                continue;
            }
            match lookup(model, other) {
                Some(var) if var == selector => {}
                Some(var) => {
                    related.insert(var);
                }
                None => report.unresolved.push(UnresolvedReference {
                    entity: entity.to_string(),
                    reference: Some(other.clone()),
                }),
            }
        }

        if !related.is_empty() {
            planned.push(PlannedRow {
                entity,
                selector,
                related,
            });
        }
    }

    for row in &planned {
        for var in std::iter::once(&row.selector).chain(row.related.iter()) {
            let variable = model
                .variable(*var)
                .ok_or(ModelError::UnknownVariable(*var))?;
            if !variable.is_selection() {
                return Err(ModelError::NonBinarySelection {
                    name: variable.name.clone(),
                });
            }
        }
    }

    for row in planned {
        let size = row.related.len() as f64;
        let expr = LinearExpr::term(row.selector, size) + LinearExpr::sum_of(row.related);
        let name = format!("conflict:{}", row.entity);
        let id = model.add_constraint(expr, ComparisonSense::LessEqual, size, Some(&name))?;
        tracing::debug!(
            component = "synthesis",
            operation = "emit_conflict",
            status = "success",
            entity = row.entity,
            related = size,
            constraint_id = id.inner(),
            "Emitted conflict constraint"
        );
        report.emitted.push(id);
    }

    if !report.unresolved.is_empty() {
        tracing::debug!(
            component = "synthesis",
            operation = "resolve",
            status = "partial",
            unresolved = report.unresolved.len(),
            "Skipped unresolved conflict references"
        );
    }

    Ok(report)
}
