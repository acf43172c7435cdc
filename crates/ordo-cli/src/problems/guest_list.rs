//! Guest selection under ship capacity and budget.
//!
//! One binary per guest. Priorities, highest first: total popularity, then
//! the cheapest such list, then the largest headcount.

use super::{ProblemError, require_non_negative, require_positive, warn_unresolved};
use ordo_core::{
    ConflictMap, LinearExpr, Model, Sense, SolveResult, VariableKind, dense, new_builder,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

const MAX_POPULARITY: f64 = 100.0;
const SELECTED: f64 = 0.5;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuestList {
    /// Ship capacity in kilograms.
    pub capacity: f64,
    pub budget: f64,
    pub guests: Vec<Guest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Guest {
    pub name: String,
    pub salary: f64,
    pub mass: f64,
    /// 0 to 100.
    pub popularity: f64,
    #[serde(default)]
    pub vip: bool,
    /// Guests this one refuses to travel with.
    #[serde(default)]
    pub conflicts_with: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuestSummary {
    pub headcount: usize,
    pub average_popularity: f64,
    pub total_mass: f64,
    pub total_salary: f64,
    pub vips: Vec<String>,
    pub non_vips: Vec<String>,
}

fn variable_name(guest: &str) -> String {
    format!("guest:{guest}")
}

fn names(guests: &[&Guest]) -> Vec<String> {
    guests.iter().map(|guest| guest.name.clone()).collect()
}

/// One coefficient per guest, in variable order.
fn weighted(guests: &[Guest], weight: impl Fn(&Guest) -> f64) -> LinearExpr {
    dense(&guests.iter().map(weight).collect::<Vec<_>>())
}

impl GuestList {
    fn validate(&self) -> Result<(), ProblemError> {
        if self.guests.is_empty() {
            return Err(ProblemError::invalid("guests", "add at least one guest"));
        }
        require_positive("capacity", self.capacity)?;
        require_positive("budget", self.budget)?;

        let mut names = BTreeSet::new();
        for (index, guest) in self.guests.iter().enumerate() {
            if guest.name.trim().is_empty() {
                return Err(ProblemError::invalid(
                    format!("guests[{index}].name"),
                    "must not be empty",
                ));
            }
            if !names.insert(guest.name.as_str()) {
                return Err(ProblemError::invalid(
                    format!("guests[{index}].name"),
                    format!("duplicate guest '{}'", guest.name),
                ));
            }
            require_non_negative(&format!("guests[{index}].salary"), guest.salary)?;
            require_non_negative(&format!("guests[{index}].mass"), guest.mass)?;

            let field = format!("guests[{index}].popularity");
            require_non_negative(&field, guest.popularity)?;
            if guest.popularity > MAX_POPULARITY {
                return Err(ProblemError::invalid(
                    field,
                    format!("must be at most {MAX_POPULARITY} (got {})", guest.popularity),
                ));
            }
        }
        Ok(())
    }

    fn conflicts(&self) -> ConflictMap {
        self.guests
            .iter()
            .filter(|guest| !guest.conflicts_with.is_empty())
            .map(|guest| (guest.name.as_str(), guest.conflicts_with.iter().map(String::as_str)))
            .collect()
    }

    pub fn build(&self) -> Result<Model, ProblemError> {
        self.validate()?;

        let kinds = vec![VariableKind::Binary; self.guests.len()];
        let mut builder = new_builder()
            .add_variables(
                self.guests.len(),
                |index| variable_name(&self.guests[index].name),
                None,
                Some(kinds.as_slice()),
            )
            .map_err(|err| ProblemError::model("guests", err))?
            .add_constraint(
                weighted(&self.guests, |guest| guest.mass).le_scalar(self.capacity),
                Some("capacity"),
            )
            .map_err(|err| ProblemError::model("capacity", err))?
            .add_constraint(
                weighted(&self.guests, |guest| guest.salary).le_scalar(self.budget),
                Some("budget"),
            )
            .map_err(|err| ProblemError::model("budget", err))?;

        if self.guests.iter().any(|guest| guest.vip) {
            builder = builder
                .add_constraint(
                    weighted(&self.guests, |guest| if guest.vip { 1.0 } else { 0.0 })
                        .ge_scalar(1.0),
                    Some("vip"),
                )
                .map_err(|err| ProblemError::model("guests", err))?;
        }

        builder = builder
            .add_relational_constraints_with(&self.conflicts(), variable_name)
            .map_err(|err| ProblemError::model("guests", err))?;
        warn_unresolved(builder.unresolved_references());

        let model = builder
            .add_objective_expr(
                weighted(&self.guests, |guest| guest.popularity),
                Sense::Maximize,
                Some("popularity"),
            )
            .and_then(|builder| {
                builder.add_objective_expr(
                    weighted(&self.guests, |guest| guest.salary),
                    Sense::Minimize,
                    Some("salary"),
                )
            })
            .and_then(|builder| {
                builder.add_objective_expr(
                    weighted(&self.guests, |_| 1.0),
                    Sense::Maximize,
                    Some("headcount"),
                )
            })
            .map_err(|err| ProblemError::model("objectives", err))?
            .build();
        Ok(model)
    }

    /// Guests whose selection variable is set in `result`, in list order.
    pub fn selected<'a>(&'a self, result: &SolveResult) -> Vec<&'a Guest> {
        self.guests
            .iter()
            .filter(|guest| {
                result
                    .value(&variable_name(&guest.name))
                    .is_some_and(|value| value > SELECTED)
            })
            .collect()
    }

    pub fn summarize(&self, result: &SolveResult) -> GuestSummary {
        let selected = self.selected(result);
        let headcount = selected.len();
        let total_popularity: f64 = selected.iter().map(|guest| guest.popularity).sum();
        let (vips, non_vips): (Vec<&Guest>, Vec<&Guest>) =
            selected.iter().copied().partition(|guest| guest.vip);

        GuestSummary {
            headcount,
            average_popularity: if headcount > 0 {
                total_popularity / headcount as f64
            } else {
                0.0
            },
            total_mass: selected.iter().map(|guest| guest.mass).sum(),
            total_salary: selected.iter().map(|guest| guest.salary).sum(),
            vips: names(&vips),
            non_vips: names(&non_vips),
        }
    }
}
