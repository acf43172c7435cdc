mod logging;
mod output;
mod problems;

use clap::{Parser, Subcommand, ValueEnum};
use ordo_core::{FreezeMode, Lexicographic, LexicographicConfig, Model, SolverConfig};
use ordo_highs::HighsSolver;
use output::{ModelShape, OutputFormat, SolveReport, render_shape, render_solve};
use problems::ProblemFile;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Lexicographic multi-objective solving from JSON problem files"
)]
struct Cli {
    /// Tracing filter (for example `debug` or `ordo_core=trace`); overrides ORDO_TRACE
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the model and solve its objectives in priority order
    Solve(SolveArgs),
    /// Build the model and report its dimensions without solving
    Check(CheckArgs),
}

#[derive(Parser, Debug)]
struct SolveArgs {
    /// JSON problem file
    #[arg(long)]
    input: PathBuf,

    /// Output format for stdout
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Per-pass time limit in seconds
    #[arg(long)]
    time_limit: Option<f64>,

    /// Relative MIP gap
    #[arg(long)]
    mip_gap: Option<f64>,

    /// Solver threads
    #[arg(long)]
    threads: Option<u32>,

    /// How each optimum is pinned before the next objective
    #[arg(long, value_enum, default_value = "tolerance")]
    freeze: FreezeArg,

    /// Let HiGHS write its own log to the console
    #[arg(long)]
    solver_output: bool,
}

#[derive(Parser, Debug)]
struct CheckArgs {
    /// JSON problem file
    #[arg(long)]
    input: PathBuf,

    /// Output format for stdout
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
enum FreezeArg {
    Exact,
    Tolerance,
}

impl From<FreezeArg> for FreezeMode {
    fn from(arg: FreezeArg) -> Self {
        match arg {
            FreezeArg::Exact => FreezeMode::Exact,
            FreezeArg::Tolerance => FreezeMode::default(),
        }
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init(cli.log_level.as_deref())?;
    match cli.command {
        Command::Solve(args) => solve_command(args),
        Command::Check(args) => check_command(args),
    }
}

fn load_problem(path: &Path) -> Result<ProblemFile, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|err| boxed_input_error(&format!("{}: {err}", path.display())))?;
    let problem = ProblemFile::from_json(&text)
        .map_err(|err| boxed_input_error(&format!("{}: {err}", path.display())))?;
    tracing::info!(
        component = "cli",
        operation = "load_problem",
        status = "success",
        path = %path.display(),
        kind = problem.kind(),
        "Loaded problem file"
    );
    Ok(problem)
}

fn build_model(problem: &ProblemFile) -> Result<Model, Box<dyn std::error::Error>> {
    problem.build().map_err(|err| {
        tracing::warn!(
            component = "cli",
            operation = "build_problem",
            status = "error",
            code = err.code(),
            field = err.field(),
            "Problem file rejected"
        );
        err.into()
    })
}

fn solver_config(args: &SolveArgs) -> Result<SolverConfig, Box<dyn std::error::Error>> {
    let mut config = SolverConfig::new();
    if args.solver_output {
        config = config.with_log_to_console(true);
    }
    if let Some(seconds) = args.time_limit {
        if !(seconds.is_finite() && seconds > 0.0) {
            return Err(boxed_input_error("time-limit must be a positive number"));
        }
        config = config.with_time_limit(seconds);
    }
    if let Some(gap) = args.mip_gap {
        if !(gap.is_finite() && gap >= 0.0) {
            return Err(boxed_input_error("mip-gap must not be negative"));
        }
        config = config.with_mip_gap(gap);
    }
    if let Some(threads) = args.threads {
        config = config.with_threads(threads);
    }
    Ok(config)
}

fn solve_command(args: SolveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let problem = load_problem(&args.input)?;
    let model = build_model(&problem)?;
    let config = solver_config(&args)?;

    let mut orchestrator = Lexicographic::with_config(
        HighsSolver::with_config(config),
        LexicographicConfig::new().with_freeze(args.freeze.into()),
    );
    let result = orchestrator.orchestrate(&model)?;

    let report = SolveReport {
        model: ModelShape::of(problem.kind(), &model),
        summary: problem.summarize(&result),
        result: &result,
    };
    render_solve(&mut io::stdout().lock(), args.format, &report)?;
    Ok(())
}

fn check_command(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let problem = load_problem(&args.input)?;
    let model = build_model(&problem)?;
    render_shape(
        &mut io::stdout().lock(),
        args.format,
        &ModelShape::of(problem.kind(), &model),
    )?;
    Ok(())
}

fn boxed_input_error(message: &str) -> Box<dyn std::error::Error> {
    Box::new(io::Error::new(io::ErrorKind::InvalidInput, message.to_string()))
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_solve_arguments() {
        let cli = Cli::parse_from([
            "ordo",
            "solve",
            "--input",
            "plan.json",
            "--freeze",
            "exact",
            "--time-limit",
            "5",
            "--format",
            "json",
        ]);
        let Command::Solve(args) = cli.command else {
            panic!("expected solve");
        };
        assert_eq!(args.freeze, FreezeArg::Exact);
        assert_eq!(args.format, OutputFormat::Json);

        let config = solver_config(&args).unwrap();
        assert_eq!(config.time_limit, Some(5.0));
        assert_eq!(FreezeMode::from(args.freeze), FreezeMode::Exact);
    }

    #[test]
    fn test_default_freeze_is_tolerance() {
        let cli = Cli::parse_from(["ordo", "check", "--input", "model.json"]);
        assert!(matches!(cli.command, Command::Check(_)));

        let cli = Cli::parse_from(["ordo", "solve", "--input", "model.json"]);
        let Command::Solve(args) = cli.command else {
            panic!("expected solve");
        };
        assert_eq!(FreezeMode::from(args.freeze), FreezeMode::default());
        assert!(solver_config(&args).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_bad_limits() {
        let cli = Cli::parse_from([
            "ordo",
            "solve",
            "--input",
            "model.json",
            "--mip-gap=-0.1",
        ]);
        let Command::Solve(args) = cli.command else {
            panic!("expected solve");
        };
        assert!(solver_config(&args).is_err());
    }
}
