//! One HiGHS run, assembled column by column.

use highs::{Col, HighsModelStatus, HighsStatus, RowProblem, Sense as HighsSense};
use std::fmt;
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveSense {
    Minimize,
    Maximize,
}

impl From<ObjectiveSense> for HighsSense {
    fn from(sense: ObjectiveSense) -> Self {
        match sense {
            ObjectiveSense::Minimize => HighsSense::Minimise,
            ObjectiveSense::Maximize => HighsSense::Maximise,
        }
    }
}

/// A value for a named HiGHS option.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(i32),
    Float(f64),
    Text(String),
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        OptionValue::Int(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Float(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HighsProblemError {
    /// A row refers to a column position that was never added.
    UnknownColumn { column: usize, columns: usize },
    /// HiGHS rejected the model when it was passed in or solved.
    Refused { status: String },
}

impl fmt::Display for HighsProblemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighsProblemError::UnknownColumn { column, columns } => {
                write!(f, "row uses column {column} but only {columns} exist")
            }
            HighsProblemError::Refused { status } => {
                write!(f, "HiGHS refused to solve ({status})")
            }
        }
    }
}

impl std::error::Error for HighsProblemError {}

/// Status and column values of a finished run.
#[derive(Debug, Clone)]
pub struct HighsOutcome {
    pub status: HighsModelStatus,
    pub col_values: Vec<f64>,
    pub mip_gap: f64,
}

/// A row problem with a fixed optimization direction.
///
/// Columns are addressed by the position [`HighsProblem::add_column`] returns.
pub struct HighsProblem {
    sense: ObjectiveSense,
    problem: RowProblem,
    columns: Vec<Col>,
    options: Vec<(String, OptionValue)>,
    verbose: bool,
}

impl HighsProblem {
    pub fn new(sense: ObjectiveSense) -> Self {
        HighsProblem {
            sense,
            problem: RowProblem::default(),
            columns: Vec::new(),
            options: Vec::new(),
            verbose: false,
        }
    }

    pub fn add_column(&mut self, lower: f64, upper: f64, cost: f64, integer: bool) -> usize {
        let col = if integer {
            self.problem.add_integer_column(cost, lower..=upper)
        } else {
            self.problem.add_column(cost, lower..=upper)
        };
        self.columns.push(col);
        self.columns.len() - 1
    }

    /// `lower <= Σ coeff·column <= upper`. Returns the row position.
    pub fn add_row(
        &mut self,
        lower: f64,
        upper: f64,
        factors: &[(usize, f64)],
    ) -> Result<usize, HighsProblemError> {
        let row = factors
            .iter()
            .map(|&(column, coeff)| {
                self.columns
                    .get(column)
                    .map(|col| (*col, coeff))
                    .ok_or(HighsProblemError::UnknownColumn {
                        column,
                        columns: self.columns.len(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.problem.add_row(lower..=upper, row);
        Ok(self.problem.num_rows() - 1)
    }

    /// Applied after the quiet/verbose switch, so later options win.
    ///
    /// HiGHS aborts on an option it cannot apply; callers check names and ranges.
    pub fn set_option(&mut self, name: &str, value: impl Into<OptionValue>) {
        self.options.push((name.to_string(), value.into()));
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn num_rows(&self) -> usize {
        self.problem.num_rows()
    }

    pub fn solve(self) -> Result<HighsOutcome, HighsProblemError> {
        debug!(
            component = "solver",
            operation = "solve",
            status = "started",
            num_cols = self.columns.len(),
            num_rows = self.problem.num_rows(),
            sense = ?self.sense,
            "Handing problem to HiGHS"
        );

        let refused = |stage: &'static str, status: HighsStatus| {
            warn!(
                component = "solver",
                operation = "solve",
                status = "error",
                stage,
                highs_status = ?status,
                "HiGHS refused the problem"
            );
            HighsProblemError::Refused {
                status: format!("{status:?} while {stage}"),
            }
        };

        let mut model = self
            .problem
            .try_optimise(self.sense.into())
            .map_err(|status| refused("passing the model", status))?;
        if self.verbose {
            model.set_option("output_flag", true);
            model.set_option("log_to_console", true);
        } else {
            model.make_quiet();
        }
        for (name, value) in &self.options {
            let name = name.as_str();
            match value {
                OptionValue::Bool(value) => model.set_option(name, *value),
                OptionValue::Int(value) => model.set_option(name, *value),
                OptionValue::Float(value) => model.set_option(name, *value),
                OptionValue::Text(value) => model.set_option(name, value.as_str()),
            }
        }

        let solved = model
            .try_solve()
            .map_err(|status| refused("solving", status))?;

        let outcome = HighsOutcome {
            status: solved.status(),
            col_values: solved.get_solution().columns().to_vec(),
            mip_gap: solved.mip_gap(),
        };
        trace!(
            component = "solver",
            operation = "solve",
            status = "success",
            highs_status = ?outcome.status,
            "HiGHS returned"
        );
        Ok(outcome)
    }
}

impl fmt::Debug for HighsProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighsProblem")
            .field("sense", &self.sense)
            .field("columns", &self.columns.len())
            .field("rows", &self.problem.num_rows())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
