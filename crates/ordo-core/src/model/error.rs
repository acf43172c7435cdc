//! Model error types.

use ordo_expr::VariableId;

/// Structural errors raised while a model is being assembled.
///
/// All of them are reported before any solve is attempted.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// A variable with this name already exists
    DuplicateName { name: String },
    /// Expression references a variable id the model does not own
    UnknownVariable(VariableId),
    /// Expression references a variable name the model does not own
    UnknownVariableName { name: String },
    /// lower > upper, or a NaN bound
    InvalidVariableBounds { name: String, lower: f64, upper: f64 },
    /// Binary variable with bounds outside {0, 1}
    InvalidBinaryBounds { name: String, lower: f64, upper: f64 },
    /// Non-finite coefficient or objective constant
    InvalidCoefficient { coefficient: f64 },
    /// NaN right-hand side
    InvalidRhs { rhs: f64 },
    /// Row/column counts of bulk input do not line up
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        got: usize,
    },
    /// Conflict synthesis applied to a variable that is not 0/1
    NonBinarySelection { name: String },
}

impl ModelError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            ModelError::DuplicateName { .. } => "VARIABLE_DUPLICATE_NAME",
            ModelError::UnknownVariable(_) => "VARIABLE_UNKNOWN_ID",
            ModelError::UnknownVariableName { .. } => "VARIABLE_UNKNOWN_NAME",
            ModelError::InvalidVariableBounds { .. } => "VARIABLE_INVALID_BOUNDS",
            ModelError::InvalidBinaryBounds { .. } => "VARIABLE_INVALID_BINARY_BOUNDS",
            ModelError::InvalidCoefficient { .. } => "COEFFICIENT_INVALID",
            ModelError::InvalidRhs { .. } => "CONSTRAINT_INVALID_RHS",
            ModelError::DimensionMismatch { .. } => "INPUT_DIMENSION_MISMATCH",
            ModelError::NonBinarySelection { .. } => "SELECTION_NOT_BINARY",
        }
    }

    /// True for the "expression references a missing variable" family.
    pub fn is_unknown_variable(&self) -> bool {
        matches!(
            self,
            ModelError::UnknownVariable(_) | ModelError::UnknownVariableName { .. }
        )
    }

    /// True for the bound validation family.
    pub fn is_invalid_bounds(&self) -> bool {
        matches!(
            self,
            ModelError::InvalidVariableBounds { .. } | ModelError::InvalidBinaryBounds { .. }
        )
    }
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelError::DuplicateName { name } => {
                write!(f, "[{}] Variable '{}' already exists", self.code(), name)
            }
            ModelError::UnknownVariable(id) => write!(
                f,
                "[{}] Variable ID {} does not exist",
                self.code(),
                id.inner()
            ),
            ModelError::UnknownVariableName { name } => {
                write!(f, "[{}] Variable '{}' does not exist", self.code(), name)
            }
            ModelError::InvalidVariableBounds { name, lower, upper } => write!(
                f,
                "[{}] Variable '{}' bounds invalid: lower ({}) > upper ({})",
                self.code(),
                name,
                lower,
                upper
            ),
            ModelError::InvalidBinaryBounds { name, lower, upper } => write!(
                f,
                "[{}] Binary variable '{}' must have bounds within {{0, 1}} (got [{}, {}])",
                self.code(),
                name,
                lower,
                upper
            ),
            ModelError::InvalidCoefficient { coefficient } => write!(
                f,
                "[{}] Coefficient must be finite (got {})",
                self.code(),
                coefficient
            ),
            ModelError::InvalidRhs { rhs } => {
                write!(f, "[{}] Right-hand side is unreachable (got {})", self.code(), rhs)
            }
            ModelError::DimensionMismatch {
                context,
                expected,
                got,
            } => write!(
                f,
                "[{}] {}: expected {} entries, got {}",
                self.code(),
                context,
                expected,
                got
            ),
            ModelError::NonBinarySelection { name } => write!(
                f,
                "[{}] Variable '{}' is not a 0/1 selection variable",
                self.code(),
                name
            ),
        }
    }
}

impl std::error::Error for ModelError {}
