use ordo_core::{
    Bounds, ComparisonSense, ConflictMap, FreezeMode, Lexicographic, LexicographicConfig,
    LinearExpr, Model, Sense, SolveStatus, SolverConfig, Variable, VariableKind, new_builder,
    orchestrate,
};
use ordo_highs::HighsSolver;

const TOL: f64 = 1e-6;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOL,
        "expected {expected}, got {actual}"
    );
}

fn assert_values(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "got {actual:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert_close(*a, *e);
    }
}

/// `x, y ∈ [0, 10]` integer, `x + y = 10`, objectives `[min x, max y]`.
fn priority_model() -> Model {
    let builder = new_builder()
        .add_variables(
            2,
            |i| ["x", "y"][i].to_string(),
            Some([Bounds::new(0.0, 10.0); 2].as_slice()),
            Some([VariableKind::Integer; 2].as_slice()),
        )
        .unwrap();
    let split = builder.expr(&[("x", 1.0), ("y", 1.0)]).unwrap();
    builder
        .add_constraint(split.eq_scalar(10.0), Some("split"))
        .unwrap()
        .add_objective(&[1.0, 0.0], Sense::Minimize)
        .unwrap()
        .add_objective(&[0.0, 1.0], Sense::Maximize)
        .unwrap()
        .build()
}

#[test]
fn test_round_trip_single_objective() {
    init_tracing();
    let model = new_builder()
        .add_variables(
            2,
            |i| ["x", "y"][i].to_string(),
            Some([Bounds::new(0.0, 10.0), Bounds::new(0.0, 20.0)].as_slice()),
            None,
        )
        .unwrap()
        .add_constraints_from_matrix(&[[1.0, 1.0]], &[25.0])
        .unwrap()
        .add_objective(&[1.0, 1.0], Sense::Maximize)
        .unwrap()
        .build();

    let result = orchestrate(HighsSolver::new(), &model).unwrap();
    assert_eq!(result.status(), SolveStatus::Optimal);
    assert!(result.is_complete());
    assert_values(result.objective_values(), &[25.0]);

    let x = result.value("x").unwrap();
    let y = result.value("y").unwrap();
    assert_close(x + y, 25.0);
    assert!(x <= 10.0 + TOL && y <= 20.0 + TOL);
}

#[test]
fn test_two_objective_priority() {
    init_tracing();
    let result = orchestrate(HighsSolver::new(), &priority_model()).unwrap();

    assert_eq!(result.status(), SolveStatus::Optimal);
    assert_values(result.objective_values(), &[0.0, 10.0]);
    assert_close(result.value("x").unwrap(), 0.0);
    assert_close(result.value("y").unwrap(), 10.0);
}

#[test]
fn test_two_objective_priority_with_exact_freeze() {
    init_tracing();
    let config = LexicographicConfig::new().with_freeze(FreezeMode::Exact);
    let mut lex = Lexicographic::with_config(HighsSolver::new(), config);
    let result = lex.orchestrate(&priority_model()).unwrap();
    assert_values(result.objective_values(), &[0.0, 10.0]);
}

#[test]
fn test_infeasible_base_model() {
    init_tracing();
    let mut model = Model::new();
    let x = model
        .add_variable(Variable::continuous("x", Bounds::new(0.0, 10.0)))
        .unwrap();
    model
        .add_constraint(LinearExpr::var(x), ComparisonSense::GreaterEqual, 5.0, None)
        .unwrap();
    model
        .add_constraint(LinearExpr::var(x), ComparisonSense::LessEqual, 2.0, None)
        .unwrap();
    model.maximize(LinearExpr::var(x)).unwrap();

    let result = orchestrate(HighsSolver::new(), &model).unwrap();
    assert_eq!(result.status(), SolveStatus::Infeasible);
    assert!(result.objective_values().is_empty());
    assert!(result.variable_values().is_empty());
}

#[test]
fn test_lower_priority_never_degrades_higher() {
    init_tracing();
    let mut model = Model::new();
    let x = model
        .add_variable(Variable::continuous("x", Bounds::new(0.0, 5.0)))
        .unwrap();
    let y = model
        .add_variable(Variable::continuous("y", Bounds::new(0.0, 5.0)))
        .unwrap();
    model
        .add_constraint(
            LinearExpr::var(x) + LinearExpr::var(y),
            ComparisonSense::LessEqual,
            6.0,
            None,
        )
        .unwrap();
    model
        .maximize(LinearExpr::var(x) + LinearExpr::var(y))
        .unwrap();
    let alone = orchestrate(HighsSolver::new(), &model).unwrap();

    let mut both = model.clone();
    both.maximize(LinearExpr::var(y) - LinearExpr::var(x))
        .unwrap();
    let result = orchestrate(HighsSolver::new(), &both).unwrap();

    assert_close(
        result.objective_value(0).unwrap(),
        alone.objective_value(0).unwrap(),
    );
    assert!((result.objective_value(1).unwrap() - 4.0).abs() < 1e-4);
}

#[test]
fn test_orchestration_is_idempotent() {
    init_tracing();
    let model = priority_model();
    let mut lex = Lexicographic::new(HighsSolver::new());
    let first = lex.orchestrate(&model).unwrap();
    let second = lex.orchestrate(&model).unwrap();
    assert_values(first.objective_values(), second.objective_values());
}

#[test]
fn test_objective_constant_is_reported() {
    init_tracing();
    let mut model = Model::new();
    let x = model
        .add_variable(Variable::continuous("x", Bounds::new(0.0, 3.0)))
        .unwrap();
    model
        .add_objective(
            LinearExpr::new(vec![(x, 2.0)], 5.0),
            Sense::Maximize,
            Some("score"),
        )
        .unwrap();
    model.minimize(LinearExpr::var(x)).unwrap();

    let result = orchestrate(HighsSolver::new(), &model).unwrap();
    assert_values(result.objective_values(), &[11.0, 3.0]);
}

#[test]
fn test_conflicts_exclude_related_guests() {
    init_tracing();
    // popularity, salary, mass, vip
    let guests = [
        ("ada", 90.0, 50.0, 80.0, true),
        ("bob", 70.0, 20.0, 60.0, false),
        ("cyd", 60.0, 10.0, 70.0, true),
        ("dee", 40.0, 5.0, 50.0, false),
    ];
    let count = guests.len();
    let column = |pick: fn(&(&str, f64, f64, f64, bool)) -> f64| -> Vec<f64> {
        guests.iter().map(pick).collect()
    };
    let vip: Vec<f64> = guests
        .iter()
        .map(|g| if g.4 { -1.0 } else { 0.0 })
        .collect();

    let model = new_builder()
        .add_variables(
            count,
            |i| guests[i].0.to_string(),
            None,
            Some(vec![VariableKind::Binary; count].as_slice()),
        )
        .unwrap()
        .add_constraints_from_matrix(
            &[column(|g| g.3), column(|g| g.2), vip],
            &[200.0, 80.0, -1.0],
        )
        .unwrap()
        .add_relational_constraints(&ConflictMap::new().with("ada", ["bob"]))
        .unwrap()
        .add_objective(&column(|g| g.1), Sense::Maximize)
        .unwrap()
        .add_objective(&column(|g| g.2), Sense::Minimize)
        .unwrap()
        .add_objective(&vec![1.0; count], Sense::Maximize)
        .unwrap()
        .build();

    let result = orchestrate(HighsSolver::new(), &model).unwrap();
    assert!(result.is_complete());
    assert_values(result.objective_values(), &[190.0, 65.0, 3.0]);
    assert_close(result.value("ada").unwrap(), 1.0);
    assert_close(result.value("bob").unwrap(), 0.0);
}

#[test]
fn test_backend_refusal_ends_in_error_status() {
    init_tracing();
    let mut model = Model::new();
    let x = model
        .add_variable(Variable::continuous("x", Bounds::new(1e30, f64::INFINITY)))
        .unwrap();
    model.minimize(LinearExpr::var(x)).unwrap();

    let result = orchestrate(HighsSolver::new(), &model).unwrap();
    assert_eq!(result.status(), SolveStatus::Error);
    assert!(result.diagnostic().unwrap().contains("HiGHS refused"));
    assert!(result.objective_values().is_empty());
}

#[test]
fn test_out_of_range_config_ends_in_error_status() {
    let config = SolverConfig::new().with_mip_gap(-0.1);
    let result = orchestrate(HighsSolver::with_config(config), &priority_model()).unwrap();
    assert_eq!(result.status(), SolveStatus::Error);
    assert!(result.diagnostic().unwrap().contains("mip_gap"));
}
