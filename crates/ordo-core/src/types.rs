use ordo_expr::{ComparisonSense, LinearExpr, VariableId};
use serde::{Deserialize, Serialize};

/// Optimization sense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sense {
    Minimize,
    Maximize,
}

impl Sense {
    pub fn as_str(self) -> &'static str {
        match self {
            Sense::Minimize => "minimize",
            Sense::Maximize => "maximize",
        }
    }
}

impl std::fmt::Display for Sense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableKind {
    #[default]
    Continuous,
    Integer,
    Binary,
}

impl VariableKind {
    /// Whether the solver must enforce integrality.
    pub fn is_integral(self) -> bool {
        matches!(self, VariableKind::Integer | VariableKind::Binary)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VariableKind::Continuous => "continuous",
            VariableKind::Integer => "integer",
            VariableKind::Binary => "binary",
        }
    }
}

/// Bounds for a variable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub lower: f64,
    pub upper: f64,
}

impl Bounds {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    /// `[0, +inf)`
    pub fn non_negative() -> Self {
        Self::new(0.0, f64::INFINITY)
    }

    /// `[0, 1]`
    pub fn unit() -> Self {
        Self::new(0.0, 1.0)
    }

    pub fn contains(&self, value: f64, tolerance: f64) -> bool {
        value >= self.lower - tolerance && value <= self.upper + tolerance
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::non_negative()
    }
}

/// A named decision variable.
///
/// Variables are owned values: a [`crate::Model`] keeps its own copy and only
/// hands out shared references, so two models never alias a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub bounds: Bounds,
    pub kind: VariableKind,
}

impl Variable {
    pub fn new(name: impl Into<String>, bounds: Bounds, kind: VariableKind) -> Self {
        Self {
            name: name.into(),
            bounds,
            kind,
        }
    }

    /// Create a continuous variable with specified bounds.
    pub fn continuous(name: impl Into<String>, bounds: Bounds) -> Self {
        Self::new(name, bounds, VariableKind::Continuous)
    }

    /// Create an integer variable with specified bounds.
    pub fn integer(name: impl Into<String>, bounds: Bounds) -> Self {
        Self::new(name, bounds, VariableKind::Integer)
    }

    /// Create a binary variable with bounds [0, 1].
    pub fn binary(name: impl Into<String>) -> Self {
        Self::new(name, Bounds::unit(), VariableKind::Binary)
    }

    /// True when the variable can only take the values 0 and 1.
    pub fn is_selection(&self) -> bool {
        self.kind.is_integral() && self.bounds.lower >= 0.0 && self.bounds.upper <= 1.0
    }
}

/// A stored linear constraint `Σ coeff·var (sense) rhs`.
///
/// Terms are normalized when the constraint enters a model: one entry per
/// variable, no zero coefficients, ordered by variable id.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub(crate) name: Option<String>,
    pub(crate) terms: Vec<(VariableId, f64)>,
    pub(crate) sense: ComparisonSense,
    pub(crate) rhs: f64,
}

impl Constraint {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn terms(&self) -> &[(VariableId, f64)] {
        &self.terms
    }

    pub fn sense(&self) -> ComparisonSense {
        self.sense
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    pub fn expr(&self) -> LinearExpr {
        LinearExpr::from_linear(self.terms.clone())
    }

    /// Left-hand side evaluated at positional variable values.
    pub fn activity(&self, values: &[f64]) -> f64 {
        self.terms.iter().fold(0.0, |acc, (var, coeff)| {
            acc + coeff * values.get(var.index()).copied().unwrap_or(0.0)
        })
    }

    pub fn is_satisfied_by(&self, values: &[f64], tolerance: f64) -> bool {
        self.sense
            .is_satisfied(self.activity(values), self.rhs, tolerance)
    }
}

/// One entry of a model's prioritized objective list.
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub(crate) name: Option<String>,
    pub(crate) sense: Sense,
    pub(crate) terms: Vec<(VariableId, f64)>,
    pub(crate) constant: f64,
}

impl Objective {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn sense(&self) -> Sense {
        self.sense
    }

    pub fn terms(&self) -> &[(VariableId, f64)] {
        &self.terms
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn expr(&self) -> LinearExpr {
        LinearExpr::new(self.terms.clone(), self.constant)
    }

    /// Objective value at positional variable values, constant included.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms.iter().fold(self.constant, |acc, (var, coeff)| {
            acc + coeff * values.get(var.index()).copied().unwrap_or(0.0)
        })
    }

    /// Whether `candidate` is strictly better than `incumbent` under this sense.
    pub fn improves(&self, candidate: f64, incumbent: f64) -> bool {
        match self.sense {
            Sense::Minimize => candidate < incumbent,
            Sense::Maximize => candidate > incumbent,
        }
    }
}
