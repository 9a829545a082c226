use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::tempdir;

fn write_export(dir: &Path, objects: Value) -> PathBuf {
    let path = dir.join("export.json");
    fs::write(&path, objects.to_string()).expect("write export");
    path
}

#[test]
fn check_reports_unknowns_misses_and_skips() {
    let dir = tempdir().expect("tempdir");
    let input = write_export(
        dir.path(),
        json!([
            {"uid": "u1", "type": "service-tcp", "name": "telemetry", "port": "2701"},
            {"uid": "u2", "type": "vpn-community-star", "name": "hq-mesh"},
            {"uid": "u3", "type": "application-site-category", "name": "Made Up Category"},
            {"uid": "r1", "type": "access-rule", "name": "broken",
             "action": "accept", "service": ["ghost-uid"]},
        ]),
    );

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cputm-convert"));
    cmd.arg("check")
        .arg(path_as_str(&input))
        .assert()
        .success()
        .stdout(predicate::str::contains("unknown_types"))
        .stdout(predicate::str::contains("- vpn-community-star"))
        .stdout(predicate::str::contains("- telemetry (service-tcp/2701)"))
        .stdout(predicate::str::contains("- Made Up Category"))
        .stdout(predicate::str::contains("skipped_rules"))
        .stdout(predicate::str::contains("cannot be relinked"));
}

#[test]
fn check_clean_export_recommends_conversion() {
    let dir = tempdir().expect("tempdir");
    let input = write_export(
        dir.path(),
        json!([
            {"uid": "u1", "type": "service-tcp", "name": "ssh", "port": "22"},
            {"uid": "u2", "type": "host", "name": "web-1", "ipv4-address": "10.0.0.1"},
        ]),
    );

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cputm-convert"));
    cmd.arg("check")
        .arg(path_as_str(&input))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "no blockers detected; run convert to produce the import tree",
        ));
}

#[test]
fn check_json_reports_counts_and_entities() {
    let dir = tempdir().expect("tempdir");
    let input = write_export(
        dir.path(),
        json!([
            {"uid": "u1", "type": "service-tcp", "name": "ssh", "port": "22"},
            {"uid": "u2", "type": "host", "name": "web-1", "ipv4-address": "10.0.0.1"},
            {"uid": "r1", "type": "access-rule", "name": "allow ssh",
             "action": "accept", "source": ["u2"], "service": ["u1"]},
        ]),
    );

    let output = Command::new(assert_cmd::cargo::cargo_bin!("cputm-convert"))
        .arg("check")
        .arg(path_as_str(&input))
        .arg("--format")
        .arg("json")
        .output()
        .expect("check output");
    assert!(output.status.success(), "check should succeed");

    let report: Value = serde_json::from_slice(&output.stdout).expect("json parse");
    assert_eq!(report["objects"].as_u64(), Some(2));
    assert_eq!(report["rules"].as_u64(), Some(1));
    assert_eq!(report["kind_counts"]["service-tcp"].as_u64(), Some(1));
    assert_eq!(report["entity_counts"]["services"].as_u64(), Some(1));
    assert_eq!(report["entity_counts"]["firewall_rules"].as_u64(), Some(1));
    assert!(report["skipped_rules"].as_array().expect("array").is_empty());
}

#[test]
fn check_accepts_a_tables_override() {
    let dir = tempdir().expect("tempdir");
    let tables = dir.path().join("tables.toml");
    fs::write(
        &tables,
        r#"
[[service]]
protocol = "tcp"
port = "2701"
name = "Telemetry"
"#,
    )
    .expect("write tables");
    let input = write_export(
        dir.path(),
        json!([
            {"uid": "u1", "type": "service-tcp", "name": "telemetry", "port": "2701"},
        ]),
    );

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cputm-convert"));
    cmd.arg("check")
        .arg(path_as_str(&input))
        .arg("--tables-file")
        .arg(path_as_str(&tables))
        .arg("--verbose")
        .assert()
        .success()
        .stdout(predicate::str::contains("Using tables: file:"))
        .stdout(predicate::str::contains("catalog_misses\n- none"));
}

#[test]
fn check_falls_back_to_embedded_tables_on_a_bad_file() {
    let dir = tempdir().expect("tempdir");
    let tables = dir.path().join("tables.toml");
    fs::write(&tables, "[[service]\nbroken").expect("write tables");
    let input = write_export(
        dir.path(),
        json!([
            {"uid": "u1", "type": "service-tcp", "name": "ssh", "port": "22"},
        ]),
    );

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cputm-convert"));
    cmd.arg("check")
        .arg(path_as_str(&input))
        .arg("--tables-file")
        .arg(path_as_str(&tables))
        .assert()
        .success()
        .stderr(predicate::str::contains("using embedded defaults"))
        .stdout(predicate::str::contains("catalog_misses\n- none"));
}

fn path_as_str(path: &Path) -> &str {
    path.to_str().expect("path should be utf8")
}
