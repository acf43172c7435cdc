use crate::model::ModelError;

/// Preconditions that stop an orchestration before the first solve.
///
/// Solve-time outcomes (infeasible, unbounded, backend failures) are reported
/// through [`super::SolveResult`] instead.
#[derive(Debug, Clone, PartialEq)]
pub enum OrchestratorError {
    /// The model has no objective to optimize.
    NoObjective,
    /// The model has no variables.
    EmptyModel,
    /// The model failed its reference check, or a frozen constraint could not
    /// be added to the working copy.
    InvalidModel(ModelError),
}

impl OrchestratorError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            OrchestratorError::NoObjective => "OBJECTIVE_MISSING",
            OrchestratorError::EmptyModel => "MODEL_EMPTY",
            OrchestratorError::InvalidModel(err) => err.code(),
        }
    }
}

impl std::fmt::Display for OrchestratorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrchestratorError::NoObjective => {
                write!(f, "[{}] Model has no objective", self.code())
            }
            OrchestratorError::EmptyModel => {
                write!(f, "[{}] Model has no variables", self.code())
            }
            OrchestratorError::InvalidModel(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for OrchestratorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OrchestratorError::InvalidModel(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelError> for OrchestratorError {
    fn from(err: ModelError) -> Self {
        OrchestratorError::InvalidModel(err)
    }
}
