use std::path::PathBuf;
use std::process::{Command, Output};

const TOL: f64 = 1e-6;

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../demos")
        .join(name)
}

fn ordo(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ordo"))
        .args(args)
        .env_remove("ORDO_TRACE")
        .output()
        .expect("failed to run ordo")
}

fn solve_json(file: &str, extra: &[&str]) -> serde_json::Value {
    let path = demo(file);
    let mut args = vec!["solve", "--input", path.to_str().unwrap(), "--format", "json"];
    args.extend_from_slice(extra);
    let output = ordo(&args);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

fn assert_close(actual: &serde_json::Value, expected: f64) {
    let actual = actual.as_f64().unwrap();
    assert!(
        (actual - expected).abs() <= TOL,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_guest_list_priorities() {
    let report = solve_json("guest_list.json", &[]);
    let result = &report["result"];
    assert_eq!(result["status"], "optimal");
    assert_close(&result["objective_values"][0], 190.0);
    assert_close(&result["objective_values"][1], 65.0);
    assert_close(&result["objective_values"][2], 3.0);
    assert_close(&result["variable_values"]["guest:bob"], 0.0);

    let summary = &report["summary"];
    assert_eq!(summary["kind"], "guest_list");
    assert_eq!(summary["headcount"], 3);
    assert_eq!(summary["vips"], serde_json::json!(["ada"]));
    assert_eq!(summary["non_vips"], serde_json::json!(["cyd", "dee"]));
}

#[test]
fn test_production_plan() {
    let report = solve_json("production.json", &[]);
    assert_close(&report["result"]["objective_values"][0], 520.0);
    assert_close(&report["result"]["variable_values"]["doll"], 20.0);
    assert_close(&report["summary"]["resources"][0]["used"], 40.0);
}

#[test]
fn test_generic_model_with_exact_freeze() {
    let report = solve_json("priorities.json", &["--freeze", "exact"]);
    let result = &report["result"];
    assert_close(&result["objective_values"][0], 0.0);
    assert_close(&result["objective_values"][1], 12.0);
    assert_eq!(report["model"]["objectives"][1]["name"], "y_high");
    assert!(report.get("summary").is_none());
}

#[test]
fn test_check_prints_dimensions() {
    let path = demo("guest_list.json");
    let output = ordo(&["check", "--input", path.to_str().unwrap()]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("variables:   4 (4 integer)"));
    assert!(stdout.contains("constraints: 4"));
}

#[test]
fn test_invalid_file_exits_with_field_message() {
    let path = std::env::temp_dir().join(format!("ordo-invalid-{}.json", std::process::id()));
    std::fs::write(
        &path,
        r#"{"kind": "guest_list", "capacity": 100, "budget": 50,
            "guests": [{"name": "ada", "salary": 1, "mass": 1, "popularity": 250}]}"#,
    )
    .unwrap();

    let output = ordo(&["check", "--input", path.to_str().unwrap()]);
    std::fs::remove_file(&path).ok();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("[INPUT_INVALID_FIELD] guests[0].popularity"));
}

#[test]
fn test_missing_file_exits_with_error() {
    let output = ordo(&["check", "--input", "/nonexistent/ordo.json"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!output.stderr.is_empty());
}
