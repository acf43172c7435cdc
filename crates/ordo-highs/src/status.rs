//! HiGHS model status conversions.

use highs::HighsModelStatus;
use ordo_core::SolverStatus;

/// Collapse a HiGHS model status into the backend-neutral status.
///
/// `UnboundedOrInfeasible` is reported as infeasible.
pub(crate) fn map_model_status(status: HighsModelStatus) -> SolverStatus {
    match status {
        HighsModelStatus::Optimal => SolverStatus::Optimal,
        HighsModelStatus::Infeasible | HighsModelStatus::UnboundedOrInfeasible => {
            SolverStatus::Infeasible
        }
        HighsModelStatus::Unbounded => SolverStatus::Unbounded,
        HighsModelStatus::ReachedTimeLimit => SolverStatus::TimeLimit,
        HighsModelStatus::ReachedIterationLimit => SolverStatus::IterationLimit,
        _ => SolverStatus::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            map_model_status(HighsModelStatus::Optimal),
            SolverStatus::Optimal
        );
        assert_eq!(
            map_model_status(HighsModelStatus::UnboundedOrInfeasible),
            SolverStatus::Infeasible
        );
        assert_eq!(
            map_model_status(HighsModelStatus::Unbounded),
            SolverStatus::Unbounded
        );
        assert_eq!(
            map_model_status(HighsModelStatus::ReachedTimeLimit),
            SolverStatus::TimeLimit
        );
        assert_eq!(
            map_model_status(HighsModelStatus::ReachedIterationLimit),
            SolverStatus::IterationLimit
        );
        assert_eq!(
            map_model_status(HighsModelStatus::Unknown),
            SolverStatus::Unknown
        );
    }
}
