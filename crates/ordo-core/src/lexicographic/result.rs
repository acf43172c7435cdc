use crate::solver::SolverStatus;
use serde::{Serialize, Serializer};

/// Overall outcome of an orchestrated solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    Error,
}

impl SolveStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an orchestration is, or where it ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrchestrationState {
    Pending,
    /// Solving the objective at this priority index.
    Solving(usize),
    Done,
    Infeasible,
    Unbounded,
    Error,
}

impl OrchestrationState {
    pub fn is_terminal(self) -> bool {
        !matches!(
            self,
            OrchestrationState::Pending | OrchestrationState::Solving(_)
        )
    }
}

impl std::fmt::Display for OrchestrationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrchestrationState::Pending => f.write_str("pending"),
            OrchestrationState::Solving(pass) => write!(f, "solving({pass})"),
            OrchestrationState::Done => f.write_str("done"),
            OrchestrationState::Infeasible => f.write_str("infeasible"),
            OrchestrationState::Unbounded => f.write_str("unbounded"),
            OrchestrationState::Error => f.write_str("error"),
        }
    }
}

/// What one pass reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassRecord {
    pub pass: usize,
    pub status: SolverStatus,
    /// Present only for optimal passes.
    pub objective_value: Option<f64>,
    pub solve_time_seconds: f64,
}

/// The pass that could not be honored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PassFailure {
    pub pass: usize,
    pub status: SolverStatus,
}

/// Final answer of an orchestration.
///
/// `objective_values[i]` is the optimum of objective `i` under the frozen
/// values of objectives `0..i`. Variable values come from the last pass that
/// reached optimality.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveResult {
    status: SolveStatus,
    objective_values: Vec<f64>,
    #[serde(serialize_with = "serialize_pairs")]
    variable_values: Vec<(String, f64)>,
    #[serde(skip)]
    primal_values: Vec<f64>,
    passes: Vec<PassRecord>,
    stopped_at: Option<PassFailure>,
    diagnostic: Option<String>,
    final_state: OrchestrationState,
}

fn serialize_pairs<S: Serializer>(
    pairs: &[(String, f64)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(pairs.iter().map(|(name, value)| (name, value)))
}

impl SolveResult {
    pub(super) fn solved(
        objective_values: Vec<f64>,
        variable_values: Vec<(String, f64)>,
        primal_values: Vec<f64>,
        passes: Vec<PassRecord>,
        stopped_at: Option<PassFailure>,
    ) -> Self {
        let diagnostic = stopped_at.map(|failure| {
            format!(
                "objective {} could not be honored (status: {}); keeping the first {} optimum(s)",
                failure.pass, failure.status, failure.pass
            )
        });
        Self {
            status: SolveStatus::Optimal,
            objective_values,
            variable_values,
            primal_values,
            passes,
            stopped_at,
            diagnostic,
            final_state: OrchestrationState::Done,
        }
    }

    pub(super) fn unsolved(
        status: SolveStatus,
        final_state: OrchestrationState,
        passes: Vec<PassRecord>,
        diagnostic: Option<String>,
    ) -> Self {
        Self {
            status,
            objective_values: Vec::new(),
            variable_values: Vec::new(),
            primal_values: Vec::new(),
            passes,
            stopped_at: None,
            diagnostic,
            final_state,
        }
    }

    pub fn status(&self) -> SolveStatus {
        self.status
    }

    pub fn is_optimal(&self) -> bool {
        self.status == SolveStatus::Optimal
    }

    /// True when every objective was honored.
    pub fn is_complete(&self) -> bool {
        self.is_optimal() && self.stopped_at.is_none()
    }

    /// Optimal values in priority order.
    pub fn objective_values(&self) -> &[f64] {
        &self.objective_values
    }

    pub fn objective_value(&self, priority: usize) -> Option<f64> {
        self.objective_values.get(priority).copied()
    }

    /// `(variable name, value)` in model order.
    pub fn variable_values(&self) -> &[(String, f64)] {
        &self.variable_values
    }

    pub fn value(&self, name: &str) -> Option<f64> {
        self.variable_values
            .iter()
            .find(|(var_name, _)| var_name == name)
            .map(|(_, value)| *value)
    }

    /// Values indexed by variable id.
    pub fn primal_values(&self) -> &[f64] {
        &self.primal_values
    }

    pub fn passes(&self) -> &[PassRecord] {
        &self.passes
    }

    pub fn stopped_at(&self) -> Option<PassFailure> {
        self.stopped_at
    }

    /// Backend or orchestrator message attached to a non-complete result.
    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    pub fn final_state(&self) -> OrchestrationState {
        self.final_state
    }

    /// Total backend time across all passes.
    pub fn solve_time_seconds(&self) -> f64 {
        self.passes.iter().map(|pass| pass.solve_time_seconds).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_variable_values_as_object() {
        let result = SolveResult::solved(
            vec![25.0],
            vec![("x".to_string(), 5.0), ("y".to_string(), 20.0)],
            vec![5.0, 20.0],
            vec![PassRecord {
                pass: 0,
                status: SolverStatus::Optimal,
                objective_value: Some(25.0),
                solve_time_seconds: 0.0,
            }],
            None,
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "optimal");
        assert_eq!(json["variable_values"]["y"], 20.0);
        assert_eq!(json["final_state"], "done");
        assert!(json.get("primal_values").is_none());
    }

    #[test]
    fn test_partial_result_carries_diagnostic() {
        let result = SolveResult::solved(
            vec![0.0],
            vec![("x".to_string(), 0.0)],
            vec![0.0],
            Vec::new(),
            Some(PassFailure {
                pass: 1,
                status: SolverStatus::TimeLimit,
            }),
        );
        assert!(result.is_optimal());
        assert!(!result.is_complete());
        assert!(result.diagnostic().unwrap().contains("objective 1"));
    }

    #[test]
    fn test_terminal_states() {
        assert!(!OrchestrationState::Pending.is_terminal());
        assert!(!OrchestrationState::Solving(2).is_terminal());
        assert!(OrchestrationState::Infeasible.is_terminal());
        assert_eq!(OrchestrationState::Solving(2).to_string(), "solving(2)");
    }
}
