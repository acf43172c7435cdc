//! Table and JSON rendering for `ordo` commands.

use crate::problems::Summary;
use clap::ValueEnum;
use ordo_core::{Model, SolveResult};
use serde::Serialize;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Shape of a built model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelShape {
    pub kind: &'static str,
    pub variables: usize,
    pub integer_variables: usize,
    pub constraints: usize,
    pub objectives: Vec<ObjectiveRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectiveRow {
    pub priority: usize,
    pub name: String,
    pub sense: &'static str,
}

impl ModelShape {
    pub fn of(kind: &'static str, model: &Model) -> Self {
        Self {
            kind,
            variables: model.num_variables(),
            integer_variables: model
                .variables()
                .iter()
                .filter(|var| var.kind.is_integral())
                .count(),
            constraints: model.num_constraints(),
            objectives: model
                .objectives()
                .iter()
                .enumerate()
                .map(|(priority, objective)| ObjectiveRow {
                    priority,
                    name: objective
                        .name()
                        .map_or_else(|| format!("objective_{priority}"), str::to_string),
                    sense: objective.sense().as_str(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SolveReport<'a> {
    pub model: ModelShape,
    pub result: &'a SolveResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
}

pub fn render_shape(
    out: &mut impl Write,
    format: OutputFormat,
    shape: &ModelShape,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(out, shape),
        OutputFormat::Table => {
            writeln!(out, "kind:        {}", shape.kind)?;
            writeln!(
                out,
                "variables:   {} ({} integer)",
                shape.variables, shape.integer_variables
            )?;
            writeln!(out, "constraints: {}", shape.constraints)?;
            writeln!(out, "{:>8} {:<20} {:<8}", "priority", "objective", "sense")?;
            for row in &shape.objectives {
                writeln!(out, "{:>8} {:<20} {:<8}", row.priority, row.name, row.sense)?;
            }
            Ok(())
        }
    }
}

pub fn render_solve(
    out: &mut impl Write,
    format: OutputFormat,
    report: &SolveReport<'_>,
) -> io::Result<()> {
    match format {
        OutputFormat::Json => write_json(out, report),
        OutputFormat::Table => {
            let result = report.result;
            writeln!(out, "status: {}", result.status())?;
            if let Some(diagnostic) = result.diagnostic() {
                writeln!(out, "note:   {diagnostic}")?;
            }
            writeln!(out)?;
            print_pass_table(out, &report.model, result)?;

            if !result.variable_values().is_empty() {
                writeln!(out)?;
                writeln!(out, "{:<24} {:>14}", "variable", "value")?;
                for (name, value) in result.variable_values() {
                    writeln!(out, "{name:<24} {value:>14.6}")?;
                }
            }

            if let Some(summary) = &report.summary {
                writeln!(out)?;
                print_summary(out, summary)?;
            }
            Ok(())
        }
    }
}

fn write_json(out: &mut impl Write, value: &impl Serialize) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

fn print_pass_table(
    out: &mut impl Write,
    shape: &ModelShape,
    result: &SolveResult,
) -> io::Result<()> {
    writeln!(
        out,
        "{:>4} {:<20} {:<8} {:<16} {:>14} {:>10}",
        "pass", "objective", "sense", "status", "value", "time_s"
    )?;
    for pass in result.passes() {
        let (name, sense) = shape
            .objectives
            .get(pass.pass)
            .map_or(("?", "?"), |row| (row.name.as_str(), row.sense));
        writeln!(
            out,
            "{:>4} {:<20} {:<8} {:<16} {:>14} {:>10.3}",
            pass.pass,
            name,
            sense,
            pass.status.as_str(),
            format_option(pass.objective_value),
            pass.solve_time_seconds,
        )?;
    }
    Ok(())
}

fn print_summary(out: &mut impl Write, summary: &Summary) -> io::Result<()> {
    match summary {
        Summary::Production(summary) => {
            writeln!(out, "profit: {:.2}", summary.profit)?;
            writeln!(out, "{:<20} {:>12} {:>12}", "product", "quantity", "unit_profit")?;
            for product in &summary.products {
                writeln!(
                    out,
                    "{:<20} {:>12.3} {:>12.2}",
                    product.name, product.quantity, product.unit_profit
                )?;
            }
            writeln!(out, "{:<20} {:>12} {:>12}", "resource", "used", "available")?;
            for resource in &summary.resources {
                writeln!(
                    out,
                    "{:<20} {:>12.3} {:>12.3}",
                    resource.name, resource.used, resource.available
                )?;
            }
        }
        Summary::GuestList(summary) => {
            writeln!(out, "guests:             {}", summary.headcount)?;
            writeln!(out, "average popularity: {:.1}%", summary.average_popularity)?;
            writeln!(out, "total mass:         {} kg", summary.total_mass)?;
            writeln!(out, "total salary:       ${}", summary.total_salary)?;
            writeln!(out, "vip:                {}", list_or_dash(&summary.vips))?;
            writeln!(out, "non-vip:            {}", list_or_dash(&summary.non_vips))?;
        }
    }
    Ok(())
}

fn format_option(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |value| format!("{value:.6}"))
}

fn list_or_dash(names: &[String]) -> String {
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}
