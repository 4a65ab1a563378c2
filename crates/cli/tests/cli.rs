//! End-to-end tests of the tfdash binary.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn tfdash() -> Command {
    let mut cmd = Command::cargo_bin("tfdash").unwrap();
    cmd.env_remove("TFDASH_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn stdout_json(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

#[test]
fn test_widgets_lists_definitions() {
    tfdash()
        .arg("widgets")
        .assert()
        .success()
        .stdout(predicate::str::contains("note_definition"))
        .stdout(predicate::str::contains("group_definition"));
}

#[test]
fn test_build_fixture() {
    let body = stdout_json(
        tfdash()
            .arg("build")
            .arg(fixture("ordered_dashboard.json"))
            .args(["--id", "q5j-nti-fv6"]),
    );
    assert_eq!(body["id"], json!("q5j-nti-fv6"));
    assert_eq!(body["widgets"][1]["definition"]["time"]["live_span"], json!("4h"));
    let inner = &body["widgets"][2]["definition"]["widgets"][0]["definition"];
    assert_eq!(inner["type"], json!("query_value"));
    assert_eq!(inner["requests"][0]["response_format"], json!("scalar"));
    assert_eq!(inner["requests"][0]["queries"][0]["data_source"], json!("logs"));
}

#[test]
fn test_build_from_stdin() {
    let body = stdout_json(
        tfdash()
            .args(["build", "-"])
            .write_stdin(r#"{"title": "piped", "layout_type": "free"}"#),
    );
    assert_eq!(body["title"], json!("piped"));
    assert_eq!(body["widgets"], json!([]));
}

#[test]
fn test_validate_fixture_passes() {
    tfdash()
        .arg("validate")
        .arg(fixture("ordered_dashboard.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("configuration is valid"));
}

#[test]
fn test_validate_reports_every_problem() {
    tfdash()
        .arg("validate")
        .arg(fixture("invalid_dashboard.json"))
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("required value is missing"))
        .stderr(predicate::str::contains("widget[1]"))
        .stderr(predicate::str::contains("widget[2]"));
}

#[test]
fn test_build_refuses_invalid_configuration() {
    tfdash()
        .arg("build")
        .arg(fixture("invalid_dashboard.json"))
        .assert()
        .code(3);
}

#[test]
fn test_flatten_api_response() {
    let config = stdout_json(tfdash().arg("flatten").arg(fixture("api_response.json")));
    assert_eq!(config["url"], json!("/dashboard/q5j-nti-fv6/checkout-service"));
    assert_eq!(config["notify_list"], json!([]));
    assert!(config.get("description").is_none());
    assert!(config["template_variable"][0].get("default").is_none());

    let widgets = config["widget"].as_array().unwrap();
    assert_eq!(widgets.len(), 3);
    assert_eq!(widgets[0]["id"], json!(5_436_370_674_582_587_i64));
    let legend = &widgets[1]["sunburst_definition"][0]["legend"][0];
    assert_eq!(legend["legend_inline"][0]["type"], json!("automatic"));
    assert_eq!(widgets[2], json!({}));
}

#[test]
fn test_schema_for_unknown_widget_is_a_usage_error() {
    tfdash()
        .args(["schema", "--widget", "hologram_definition"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("tfdash widgets"));
}

#[test]
fn test_config_file_disables_custom_validators() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("tfdash.toml");
    std::fs::write(&config, "custom_validators = false\n").unwrap();

    let input = r#"{"title": "t", "layout_type": "ordered",
        "widget": [{"note_definition": [{"content": ""}]}]}"#;
    tfdash()
        .args(["validate", "-"])
        .write_stdin(input)
        .assert()
        .code(3);
    tfdash()
        .args(["validate", "-"])
        .env("TFDASH_CONFIG", &config)
        .write_stdin(input)
        .assert()
        .success();
}

#[test]
fn test_missing_config_file_is_a_usage_error() {
    tfdash()
        .args(["--config", "/nonexistent/tfdash.toml", "widgets"])
        .assert()
        .code(2);
}
