//! `Σ coeff_i * var_i + constant`.
//!
//! Terms keep insertion order and may name a variable more than once until
//! [`LinearExpr::normalized_terms`] merges them. Models only store merged terms.

use crate::expr::constraint::{ComparisonSense, ConstraintExpr};
use crate::ids::VariableId;
use std::collections::BTreeMap;
use std::ops;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    terms: Vec<(VariableId, f64)>,
    constant: f64,
}

impl LinearExpr {
    pub fn new(terms: Vec<(VariableId, f64)>, constant: f64) -> Self {
        Self { terms, constant }
    }

    pub fn from_linear(terms: Vec<(VariableId, f64)>) -> Self {
        Self::new(terms, 0.0)
    }

    pub fn from_constant(constant: f64) -> Self {
        Self::new(Vec::new(), constant)
    }

    /// `coeff * var`; a zero coefficient yields the empty expression.
    pub fn term(var: VariableId, coeff: f64) -> Self {
        let terms = if coeff == 0.0 { Vec::new() } else { vec![(var, coeff)] };
        Self::from_linear(terms)
    }

    pub fn var(var: VariableId) -> Self {
        Self::term(var, 1.0)
    }

    /// Unit-coefficient sum over `vars`.
    pub fn sum_of(vars: impl IntoIterator<Item = VariableId>) -> Self {
        vars.into_iter().map(Self::var).sum()
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn linear_terms(&self) -> &[(VariableId, f64)] {
        &self.terms
    }

    /// True when no variable term is present. The constant is ignored.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn into_parts(self) -> (Vec<(VariableId, f64)>, f64) {
        (self.terms, self.constant)
    }

    /// Variables in term order, repeats included.
    pub fn variables(&self) -> impl Iterator<Item = VariableId> + '_ {
        self.terms.iter().map(|&(var, _)| var)
    }

    /// Multiplies every coefficient and the constant by `factor`.
    pub fn scale(&self, factor: f64) -> Self {
        let terms = self
            .terms
            .iter()
            .filter_map(|&(var, coeff)| {
                let scaled = coeff * factor;
                (scaled != 0.0).then_some((var, scaled))
            })
            .collect();
        Self::new(terms, self.constant * factor)
    }

    pub fn add(&self, other: &LinearExpr) -> Self {
        let terms = self.terms.iter().chain(&other.terms).copied().collect();
        Self::new(terms, self.constant + other.constant)
    }

    pub fn add_constant(&self, offset: f64) -> Self {
        Self::new(self.terms.clone(), self.constant + offset)
    }

    pub fn without_constant(&self) -> Self {
        Self::from_linear(self.terms.clone())
    }

    /// One entry per variable, ordered by id, with cancelled terms dropped.
    pub fn normalized_terms(&self) -> Vec<(VariableId, f64)> {
        let mut merged = BTreeMap::<VariableId, f64>::new();
        for &(var, coeff) in self.terms.iter().filter(|(_, coeff)| *coeff != 0.0) {
            *merged.entry(var).or_default() += coeff;
        }
        merged.retain(|_, coeff| *coeff != 0.0);
        merged.into_iter().collect()
    }

    /// Value at `values[var.index()]`; missing entries count as zero.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(var, coeff)| coeff * values.get(var.index()).copied().unwrap_or_default())
            .sum::<f64>()
            + self.constant
    }

    /// `self sense rhs`, with the constant moved to the right-hand side.
    pub fn compare_scalar(&self, rhs: f64, sense: ComparisonSense) -> ConstraintExpr {
        ConstraintExpr::new(self.without_constant(), sense, rhs - self.constant)
    }

    /// `self sense other`, rewritten as `(self - other) sense 0` before folding constants.
    pub fn compare_expr(&self, other: &LinearExpr, sense: ComparisonSense) -> ConstraintExpr {
        self.add(&other.scale(-1.0)).compare_scalar(0.0, sense)
    }

    pub fn le_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::LessEqual)
    }

    pub fn ge_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::GreaterEqual)
    }

    pub fn eq_scalar(&self, rhs: f64) -> ConstraintExpr {
        self.compare_scalar(rhs, ComparisonSense::Equal)
    }

    pub fn le_expr(&self, rhs: &LinearExpr) -> ConstraintExpr {
        self.compare_expr(rhs, ComparisonSense::LessEqual)
    }

    pub fn ge_expr(&self, rhs: &LinearExpr) -> ConstraintExpr {
        self.compare_expr(rhs, ComparisonSense::GreaterEqual)
    }

    pub fn eq_expr(&self, rhs: &LinearExpr) -> ConstraintExpr {
        self.compare_expr(rhs, ComparisonSense::Equal)
    }
}

impl ops::Add for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: LinearExpr) -> LinearExpr {
        self.terms.extend(rhs.terms);
        self.constant += rhs.constant;
        self
    }
}

impl ops::Sub for LinearExpr {
    type Output = LinearExpr;

    fn sub(self, rhs: LinearExpr) -> LinearExpr {
        self + -rhs
    }
}

impl ops::Mul<f64> for LinearExpr {
    type Output = LinearExpr;

    fn mul(self, factor: f64) -> LinearExpr {
        self.scale(factor)
    }
}

impl ops::Neg for LinearExpr {
    type Output = LinearExpr;

    fn neg(self) -> LinearExpr {
        self.scale(-1.0)
    }
}
