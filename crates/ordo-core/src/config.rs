//! Options shared by every pass of a solve.

/// Options forwarded to a solver backend for every pass.
///
/// Every field is optional; `None` leaves the backend default in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolverConfig {
    /// Wall-clock limit per solve, in seconds.
    pub time_limit: Option<f64>,
    /// Relative MIP gap tolerance.
    pub mip_gap: Option<f64>,
    pub verbosity: Option<u32>,
    pub presolve: Option<bool>,
    pub threads: Option<u32>,
    /// Primal feasibility tolerance.
    pub tolerance: Option<f64>,
    pub log_to_console: Option<bool>,
    /// Seed for the backend's randomized heuristics, pinned for repeatable runs.
    pub random_seed: Option<u32>,
}

impl SolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit = Some(seconds);
        self
    }

    pub fn with_mip_gap(mut self, gap: f64) -> Self {
        self.mip_gap = Some(gap);
        self
    }

    pub fn with_verbosity(mut self, level: u32) -> Self {
        self.verbosity = Some(level);
        self
    }

    pub fn with_presolve(mut self, enabled: bool) -> Self {
        self.presolve = Some(enabled);
        self
    }

    pub fn with_threads(mut self, count: u32) -> Self {
        self.threads = Some(count);
        self
    }

    pub fn with_tolerance(mut self, tol: f64) -> Self {
        self.tolerance = Some(tol);
        self
    }

    pub fn with_log_to_console(mut self, enabled: bool) -> Self {
        self.log_to_console = Some(enabled);
        self
    }

    pub fn with_random_seed(mut self, seed: u32) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// True when nothing overrides the backend defaults.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
