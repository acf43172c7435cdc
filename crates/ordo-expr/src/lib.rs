pub mod expr;
pub mod ids;

pub use expr::{ComparisonSense, ConstraintExpr, LinearExpr, dense};
pub use ids::{ConstraintId, VariableId};
