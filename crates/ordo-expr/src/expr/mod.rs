//! Linear expressions and the comparisons that turn them into rows.

pub mod builders;
pub mod constraint;
pub mod linear;

pub use builders::dense;
pub use constraint::{ComparisonSense, ConstraintExpr};
pub use linear::LinearExpr;
