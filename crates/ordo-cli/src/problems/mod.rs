//! Problem files understood by `ordo`.
//!
//! A file is one JSON object tagged by `kind`. Each kind knows how to turn
//! itself into a [`Model`] and, where it makes sense, how to summarize a
//! solve in its own terms.

mod generic;
mod guest_list;
mod production;

use ordo_core::{Model, ModelError, SolveResult, UnresolvedReference};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use generic::GenericModel;
pub use guest_list::{GuestList, GuestSummary};
pub use production::{ProductionPlan, ProductionSummary};

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProblemFile {
    Model(GenericModel),
    Production(ProductionPlan),
    GuestList(GuestList),
}

impl ProblemFile {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ProblemFile::Model(_) => "model",
            ProblemFile::Production(_) => "production",
            ProblemFile::GuestList(_) => "guest_list",
        }
    }

    pub fn build(&self) -> Result<Model, ProblemError> {
        let model = match self {
            ProblemFile::Model(problem) => problem.build(),
            ProblemFile::Production(problem) => problem.build(),
            ProblemFile::GuestList(problem) => problem.build(),
        }?;
        tracing::debug!(
            component = "cli",
            operation = "build_problem",
            status = "success",
            kind = self.kind(),
            variables = model.num_variables(),
            constraints = model.num_constraints(),
            objectives = model.num_objectives(),
            "Built problem model"
        );
        Ok(model)
    }

    /// Domain summary of a successful solve.
    pub fn summarize(&self, result: &SolveResult) -> Option<Summary> {
        if !result.is_optimal() {
            return None;
        }
        match self {
            ProblemFile::Model(_) => None,
            ProblemFile::Production(problem) => {
                Some(Summary::Production(problem.summarize(result)))
            }
            ProblemFile::GuestList(problem) => Some(Summary::GuestList(problem.summarize(result))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Summary {
    Production(ProductionSummary),
    GuestList(GuestSummary),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProblemError {
    /// A field failed validation before any model was built.
    InvalidField { field: String, reason: String },
    /// The model rejected the value found at `field`.
    Model { field: String, source: ModelError },
}

impl ProblemError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ProblemError::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn model(field: impl Into<String>, source: ModelError) -> Self {
        ProblemError::Model {
            field: field.into(),
            source,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ProblemError::InvalidField { .. } => "INPUT_INVALID_FIELD",
            ProblemError::Model { source, .. } => source.code(),
        }
    }

    pub fn field(&self) -> &str {
        match self {
            ProblemError::InvalidField { field, .. } | ProblemError::Model { field, .. } => field,
        }
    }
}

impl fmt::Display for ProblemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemError::InvalidField { field, reason } => {
                write!(f, "[{}] {field}: {reason}", self.code())
            }
            ProblemError::Model { field, source } => write!(f, "{field}: {source}"),
        }
    }
}

impl std::error::Error for ProblemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProblemError::Model { source, .. } => Some(source),
            ProblemError::InvalidField { .. } => None,
        }
    }
}

fn warn_unresolved(references: &[UnresolvedReference]) {
    for skipped in references {
        tracing::warn!(
            component = "cli",
            operation = "build_problem",
            status = "partial",
            entity = %skipped.entity,
            reference = skipped.reference.as_deref().unwrap_or("<self>"),
            "Conflict reference has no variable"
        );
    }
}

fn require_finite(field: &str, value: f64) -> Result<(), ProblemError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ProblemError::invalid(field, "must be a finite number"))
    }
}

fn require_positive(field: &str, value: f64) -> Result<(), ProblemError> {
    require_finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ProblemError::invalid(
            field,
            format!("must be positive (got {value})"),
        ))
    }
}

fn require_non_negative(field: &str, value: f64) -> Result<(), ProblemError> {
    require_finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ProblemError::invalid(
            field,
            format!("must not be negative (got {value})"),
        ))
    }
}
