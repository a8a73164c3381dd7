//! End-to-end tests for the `assetgraph` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_assetgraph"))
        .env_remove("ASSETGRAPH_LOG")
        .env("ASSETGRAPH_LOG_OUTPUT", "stderr")
        .arg("--dir")
        .arg(dir)
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_graph_prints_tree() {
    let temp = TempDir::new().unwrap();
    let output = run(temp.path(), &["graph", "manifests"]);

    assert!(output.status.success(), "stderr={}", stderr(&output));
    let out = stdout(&output);
    assert!(out.starts_with("Common Manifests\n"));
    assert!(out.contains("└── Feature Gate Config"));
    assert!(out.contains("Install Config (*)"));
}

#[test]
fn test_create_writes_files_and_status_reports_them() {
    let temp = TempDir::new().unwrap();

    let output = run(temp.path(), &["create", "manifests"]);
    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert!(stdout(&output).contains("Common Manifests (generated)"));
    assert!(temp.path().join("manifests/cluster-config.yaml").is_file());
    assert!(temp.path().join(".assetgraph_state.json").is_file());

    let output = run(temp.path(), &["status", "--format", "json"]);
    assert!(output.status.success(), "stderr={}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["files"][0]["path"], "manifests/cluster-config.yaml");
    assert_eq!(value["files"][0]["state"], "unchanged");
}

#[test]
fn test_unknown_target_exits_nonzero() {
    let temp = TempDir::new().unwrap();
    let output = run(temp.path(), &["create", "bootstrap"]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unknown target: bootstrap"));
}

#[test]
fn test_config_file_redirects_output() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("assetgraph.toml"),
        "[output]\ndir = \"out\"\nrecord_state = false\n",
    )
    .unwrap();

    let output = run(temp.path(), &["create", "install-config"]);
    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert!(temp.path().join("out/install-config.yaml").is_file());
    assert!(!temp.path().join("out/.assetgraph_state.json").exists());
}

#[test]
fn test_broken_persisted_state_reports_chain() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("install-config.yaml"), "apiVersion: v1\n").unwrap();

    let output = run(temp.path(), &["create", "manifests"]);
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("install-config.yaml"), "{}", err);
    assert!(err.contains("via: Common Manifests -> Install Config"), "{}", err);
}
