//! End-to-end tests for the `wavemap` binary.
//!
//! Each test writes an analysis file into a fresh temp directory, runs the
//! binary there, and checks stdout/stderr and the exit status.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ACCOUNT_APP: &str = r#"[
    {"id": "page:AccountView", "path": "pages/AccountView.page", "dependencies": [
        {"target": "AccountController", "kind": "controller-binding"},
        {"target": "c:accountCard", "kind": "component-reference"}
    ]},
    {"id": "c:accountCard", "dependencies": [
        {"target": "c:accountHeader", "kind": "component-reference"},
        {"target": "c:contactList", "kind": "component-reference"},
        {"target": "lightning:card", "kind": "component-reference"}
    ]},
    {"id": "c:contactList", "dependencies": [
        {"target": "c:contactRow", "kind": "component-reference"},
        {"target": "c:refreshEvent", "kind": "event"}
    ]},
    {"id": "c:contactRow", "dependencies": [
        {"target": "c:contactList", "kind": "event"}
    ]},
    {"id": "c:accountHeader"},
    {"id": "c:refreshEvent"},
    {"id": "c:legacyBanner"}
]"#;

fn wavemap_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("wavemap"));
    cmd.current_dir(dir);
    cmd.env("WAVEMAP_LOG", "error");
    cmd.env("FORMAT", "text");
    // Keep any real user config out of the run.
    cmd.env("HOME", dir);
    cmd.env("XDG_CONFIG_HOME", dir.join(".config"));
    cmd
}

fn setup(json: &str) -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("analysis.json"), json).expect("write input");
    dir
}

fn run_json(dir: &Path, args: &[&str]) -> Value {
    let output = wavemap_cmd(dir)
        .args(args)
        .args(["--input", "analysis.json", "--json"])
        .output()
        .expect("wavemap should not crash");
    assert!(
        output.status.success(),
        "wavemap {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid JSON")
}

// ---------------------------------------------------------------------------
// graph
// ---------------------------------------------------------------------------

#[test]
fn graph_json_has_nodes_edges_and_groups() {
    let dir = setup(ACCOUNT_APP);
    let json = run_json(dir.path(), &["graph"]);

    assert_eq!(json["nodes"].as_array().expect("nodes").len(), 8);
    assert_eq!(json["stats"]["node_count"], 8);
    assert_eq!(json["stats"]["cycle_count"], 1);
    assert_eq!(
        json["circular_groups"][0],
        serde_json::json!(["c:contactList", "c:contactRow"])
    );
    assert!(
        json["content_hash"]
            .as_str()
            .expect("hash")
            .starts_with("blake3:")
    );
}

#[test]
fn graph_output_is_stable_across_runs() {
    let dir = setup(ACCOUNT_APP);
    let first = run_json(dir.path(), &["graph"]);
    let second = run_json(dir.path(), &["graph"]);
    assert_eq!(first, second);
}

#[test]
fn graph_circular_only_keeps_group_members() {
    let dir = setup(ACCOUNT_APP);
    let json = run_json(dir.path(), &["graph", "--circular-only"]);

    let ids: Vec<&str> = json["nodes"]
        .as_array()
        .expect("nodes")
        .iter()
        .map(|n| n["id"].as_str().expect("id"))
        .collect();
    assert_eq!(ids, vec!["c:contactList", "c:contactRow"]);
}

#[test]
fn graph_no_orphans_drops_isolated_components() {
    let dir = setup(ACCOUNT_APP);
    let json = run_json(dir.path(), &["graph", "--no-orphans"]);
    assert_eq!(json["stats"]["orphan_count"], 0);
    assert!(
        !json["nodes"]
            .as_array()
            .expect("nodes")
            .iter()
            .any(|n| n["id"] == "c:legacyBanner")
    );
}

#[test]
fn include_base_flag_keeps_base_components() {
    let dir = setup(ACCOUNT_APP);
    let json = run_json(dir.path(), &["graph", "--include-base"]);
    assert!(
        json["nodes"]
            .as_array()
            .expect("nodes")
            .iter()
            .any(|n| n["id"] == "lightning:card" && n["kind"] == "base-component")
    );
}

#[test]
fn project_config_can_include_base_components() {
    let dir = setup(ACCOUNT_APP);
    fs::create_dir_all(dir.path().join(".wavemap")).expect("config dir");
    fs::write(
        dir.path().join(".wavemap/config.toml"),
        "[graph]\ninclude_base_components = true\n",
    )
    .expect("write config");

    let json = run_json(dir.path(), &["stats"]);
    assert_eq!(json["stats"]["node_count"], 9);
}

#[test]
fn graph_text_is_line_oriented() {
    let dir = setup(ACCOUNT_APP);
    wavemap_cmd(dir.path())
        .args(["graph", "--input", "analysis.json"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("nodes=8 edges=7 cycles=1"))
        .stdout(predicate::str::contains(
            "edge c:contactRow -> c:contactList event",
        ));
}

// ---------------------------------------------------------------------------
// focus
// ---------------------------------------------------------------------------

#[test]
fn focus_by_bare_name_returns_neighborhood() {
    let dir = setup(ACCOUNT_APP);
    let json = run_json(dir.path(), &["focus", "contactRow", "--depth", "1"]);

    let mut ids: Vec<&str> = json["nodes"]
        .as_array()
        .expect("nodes")
        .iter()
        .map(|n| n["id"].as_str().expect("id"))
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["c:contactList", "c:contactRow"]);
}

#[test]
fn focus_unknown_target_fails_with_code() {
    let dir = setup(ACCOUNT_APP);
    wavemap_cmd(dir.path())
        .args(["focus", "c:nowhere", "--input", "analysis.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E2001]"))
        .stderr(predicate::str::contains("c:nowhere"));
}

#[test]
fn focus_unknown_target_json_error() {
    let dir = setup(ACCOUNT_APP);
    let output = wavemap_cmd(dir.path())
        .args(["focus", "c:nowhere", "--input", "analysis.json", "--json"])
        .output()
        .expect("wavemap should not crash");
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    let start = stderr.find('{').expect("JSON error on stderr");
    let end = stderr.rfind('}').expect("JSON error on stderr");
    let json: Value = serde_json::from_str(&stderr[start..=end]).expect("valid JSON");
    assert_eq!(json["error"]["error_code"], "E2001");
}

// ---------------------------------------------------------------------------
// cycles / order / stats
// ---------------------------------------------------------------------------

#[test]
fn cycles_json_reports_group_and_break() {
    let dir = setup(ACCOUNT_APP);
    let json = run_json(dir.path(), &["cycles"]);

    let cycles = json["cycles"].as_array().expect("cycles");
    assert_eq!(cycles.len(), 1);
    assert_eq!(
        cycles[0]["members"],
        serde_json::json!(["c:contactList", "c:contactRow"])
    );
    assert_eq!(cycles[0]["suggested_breaks"].as_array().expect("breaks").len(), 1);
}

#[test]
fn cycles_pretty_without_cycles() {
    let dir = setup(r#"[{"id": "c:a", "dependencies": [{"target": "c:b", "kind": "event"}]}]"#);
    wavemap_cmd(dir.path())
        .env("FORMAT", "pretty")
        .args(["cycles", "--input", "analysis.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No circular dependencies found."));
}

#[test]
fn order_json_schedules_waves() {
    let dir = setup(ACCOUNT_APP);
    let json = run_json(dir.path(), &["order"]);

    assert_eq!(json["wave_count"], 3);
    assert_eq!(json["total_components"], 7);
    assert_eq!(
        json["waves"][1]["components"],
        serde_json::json!(["c:accountCard", "c:contactList"])
    );
    assert_eq!(json["waves"][1]["coordinated"], true);
    assert_eq!(
        json["waves"][2]["components"],
        serde_json::json!(["page:AccountView"])
    );
    assert!(!json["advisories"].as_array().expect("advisories").is_empty());
}

#[test]
fn order_pretty_shows_waves() {
    let dir = setup(ACCOUNT_APP);
    wavemap_cmd(dir.path())
        .args(["--format", "pretty", "order", "--input", "analysis.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Conversion plan"))
        .stdout(predicate::str::contains("Wave 2"))
        .stdout(predicate::str::contains("convert together"));
}

#[test]
fn order_uses_configured_hours() {
    let dir = setup(r#"[{"id": "c:a"}, {"id": "c:b"}]"#);
    fs::create_dir_all(dir.path().join(".wavemap")).expect("config dir");
    fs::write(
        dir.path().join(".wavemap/config.toml"),
        "[order]\nhours_per_component = 2.5\n",
    )
    .expect("write config");

    let json = run_json(dir.path(), &["order"]);
    assert_eq!(json["waves"][0]["estimated_hours"], 5.0);
}

#[test]
fn stats_text_includes_hash() {
    let dir = setup(ACCOUNT_APP);
    wavemap_cmd(dir.path())
        .args(["stats", "--input", "analysis.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nodes 8\n"))
        .stdout(predicate::str::contains("cycles 1\n"))
        .stdout(predicate::str::contains("hash blake3:"));
}

#[test]
fn empty_input_is_an_empty_graph() {
    let dir = setup("[]");
    let json = run_json(dir.path(), &["order"]);
    assert_eq!(json["wave_count"], 0);
    assert_eq!(json["total_components"], 0);
}

// ---------------------------------------------------------------------------
// failures
// ---------------------------------------------------------------------------

#[test]
fn missing_input_fails_with_code() {
    let dir = TempDir::new().expect("tempdir");
    wavemap_cmd(dir.path())
        .args(["graph", "--input", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E1001]"));
}

#[test]
fn malformed_input_fails_with_code() {
    let dir = setup("{\"components\": 12}");
    wavemap_cmd(dir.path())
        .args(["graph", "--input", "analysis.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E1003]"));
}

#[test]
fn broken_config_fails_with_code() {
    let dir = setup(ACCOUNT_APP);
    fs::create_dir_all(dir.path().join(".wavemap")).expect("config dir");
    fs::write(dir.path().join(".wavemap/config.toml"), "[graph\n").expect("write config");

    wavemap_cmd(dir.path())
        .args(["stats", "--input", "analysis.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error[E1002]"));
}

#[test]
fn help_lists_subcommands() {
    let dir = TempDir::new().expect("tempdir");
    wavemap_cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("graph"))
        .stdout(predicate::str::contains("focus"))
        .stdout(predicate::str::contains("order"));
}
