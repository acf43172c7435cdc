//! Constraint expressions: linear expression with comparison sense and RHS.

use crate::expr::linear::LinearExpr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonSense {
    LessEqual,
    GreaterEqual,
    Equal,
}

impl ComparisonSense {
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonSense::LessEqual => "le",
            ComparisonSense::GreaterEqual => "ge",
            ComparisonSense::Equal => "eq",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonSense::LessEqual => "<=",
            ComparisonSense::GreaterEqual => ">=",
            ComparisonSense::Equal => "=",
        }
    }

    /// Check `lhs (sense) rhs` with an absolute tolerance.
    pub fn is_satisfied(self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            ComparisonSense::LessEqual => lhs <= rhs + tolerance,
            ComparisonSense::GreaterEqual => lhs >= rhs - tolerance,
            ComparisonSense::Equal => (lhs - rhs).abs() <= tolerance,
        }
    }
}

impl std::fmt::Display for ComparisonSense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone)]
pub struct ConstraintExpr {
    expr: LinearExpr,
    sense: ComparisonSense,
    rhs: f64,
}

impl ConstraintExpr {
    pub fn new(expr: LinearExpr, sense: ComparisonSense, rhs: f64) -> Self {
        Self { expr, sense, rhs }
    }

    pub fn expr(&self) -> &LinearExpr {
        &self.expr
    }

    pub fn sense(&self) -> ComparisonSense {
        self.sense
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    pub fn into_parts(self) -> (LinearExpr, ComparisonSense, f64) {
        (self.expr, self.sense, self.rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::ComparisonSense;

    #[test]
    fn sense_satisfaction_respects_tolerance() {
        assert!(ComparisonSense::LessEqual.is_satisfied(10.0 + 1e-9, 10.0, 1e-6));
        assert!(!ComparisonSense::LessEqual.is_satisfied(10.1, 10.0, 1e-6));
        assert!(ComparisonSense::GreaterEqual.is_satisfied(5.0, 5.0, 0.0));
        assert!(!ComparisonSense::GreaterEqual.is_satisfied(4.0, 5.0, 1e-6));
        assert!(ComparisonSense::Equal.is_satisfied(3.0, 3.0 - 1e-8, 1e-6));
        assert!(!ComparisonSense::Equal.is_satisfied(3.0, 2.0, 1e-6));
    }

    #[test]
    fn sense_symbols() {
        assert_eq!(ComparisonSense::LessEqual.to_string(), "<=");
        assert_eq!(ComparisonSense::GreaterEqual.symbol(), ">=");
        assert_eq!(ComparisonSense::Equal.as_str(), "eq");
    }
}
