//! Ordo core: incremental model building and lexicographic solving.
//!
//! - [`Model`] stores variables, append-only constraints and a prioritized
//!   objective list.
//! - [`ModelBuilder`] is the value-returning façade used to assemble a model.
//! - [`synthesis`] turns conflict declarations into linear constraints.
//! - [`solver::Solver`] is the contract a solving engine implements.
//! - [`Lexicographic`] drives one solve per objective, freezing each optimum
//!   before moving to the next priority.

pub mod builder;
pub mod config;
pub mod lexicographic;
pub mod model;
pub mod solver;
pub mod synthesis;
pub mod types;

pub use builder::{ModelBuilder, new_builder};
pub use config::SolverConfig;
pub use lexicographic::{
    FreezeMode, Lexicographic, LexicographicConfig, OrchestrationState, OrchestratorError,
    PassFailure, PassRecord, SolveResult, SolveStatus, orchestrate,
};
pub use model::{Model, ModelError};
pub use solver::{Solution, Solver, SolverError, SolverStatus};
pub use synthesis::{
    ConflictMap, SynthesisReport, UnresolvedReference, synthesize_conflicts,
    synthesize_conflicts_mapped,
};
pub use types::{Bounds, Constraint, Objective, Sense, Variable, VariableKind};

pub use ordo_expr::{ComparisonSense, ConstraintExpr, ConstraintId, LinearExpr, VariableId, dense};
