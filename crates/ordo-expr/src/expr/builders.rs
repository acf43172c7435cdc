//! Helpers assembling expressions from column-ordered data.

use crate::expr::linear::LinearExpr;
use crate::ids::VariableId;

/// `Σ coefficients[j]·var_j` over variables `0..coefficients.len()`.
///
/// Zero coefficients produce no term.
pub fn dense(coefficients: &[f64]) -> LinearExpr {
    LinearExpr::from_linear(
        coefficients
            .iter()
            .enumerate()
            .filter(|(_, coeff)| **coeff != 0.0)
            .map(|(index, coeff)| (VariableId::new(index as u32), *coeff))
            .collect(),
    )
}

/// Concatenates terms and adds constants. Repeated variables are kept
/// apart until the expression is normalized.
impl std::iter::Sum for LinearExpr {
    fn sum<I: Iterator<Item = LinearExpr>>(iter: I) -> Self {
        let mut terms = Vec::new();
        let mut constant = 0.0;
        for expr in iter {
            let (linear, offset) = expr.into_parts();
            terms.extend(linear);
            constant += offset;
        }
        LinearExpr::new(terms, constant)
    }
}
