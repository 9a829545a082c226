use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::tempdir;

fn write_tree_file(root: &Path, section: &str, file: &str, entities: Value) {
    let dir = root.join(section);
    fs::create_dir_all(&dir).expect("create section dir");
    fs::write(dir.join(file), entities.to_string()).expect("write tree file");
}

fn read_entities(path: &Path) -> Vec<Value> {
    let raw = fs::read_to_string(path).expect("read entities");
    serde_json::from_str(&raw).expect("entities json")
}

fn import_cmd(source: &Path, target: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cputm-convert"));
    cmd.arg("import")
        .arg("--source")
        .arg(path_as_str(source))
        .arg("--target")
        .arg(path_as_str(target));
    cmd
}

#[test]
fn import_creates_then_settles_to_noops() {
    let dir = tempdir().expect("tempdir");
    let source = dir.path().join("tree");
    let target = dir.path().join("store");
    write_tree_file(
        &source,
        "library",
        "services.json",
        json!([
            {"name": "SSH", "protocols": [{"protocol": "tcp", "port": "22"}]},
            {"name": "DNS", "protocols": [{"protocol": "udp", "port": "53"}]},
        ]),
    );

    import_cmd(&source, &target)
        .assert()
        .success()
        .stdout(predicate::str::contains("+ services SSH id=services:1"))
        .stdout(predicate::str::contains("+ services DNS id=services:2"))
        .stdout(predicate::str::contains(
            "import_summary created=2 updated=0 unchanged=0 failed=0",
        ));

    import_cmd(&source, &target)
        .assert()
        .success()
        .stdout(predicate::str::contains("= services SSH id=services:1"))
        .stdout(predicate::str::contains(
            "import_summary created=0 updated=0 unchanged=2 failed=0",
        ));

    let stored = read_entities(&target.join("library").join("services.json"));
    assert_eq!(stored.len(), 2);
}

#[test]
fn import_updates_changed_bodies_in_place() {
    let dir = tempdir().expect("tempdir");
    let source = dir.path().join("tree");
    let target = dir.path().join("store");
    write_tree_file(
        &source,
        "library",
        "services.json",
        json!([{"name": "SSH", "protocols": [{"protocol": "tcp", "port": "22"}]}]),
    );
    import_cmd(&source, &target).assert().success();

    write_tree_file(
        &source,
        "library",
        "services.json",
        json!([{"name": "ssh", "protocols": [{"protocol": "tcp", "port": "2222"}]}]),
    );
    import_cmd(&source, &target)
        .assert()
        .success()
        .stdout(predicate::str::contains("~ services ssh id=services:1"))
        .stdout(predicate::str::contains(
            "import_summary created=0 updated=1 unchanged=0 failed=0",
        ));

    let stored = read_entities(&target.join("library").join("services.json"));
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["protocols"][0]["port"], "2222");
}

#[test]
fn one_bad_entity_does_not_stop_the_batch() {
    let dir = tempdir().expect("tempdir");
    let source = dir.path().join("tree");
    let target = dir.path().join("store");
    write_tree_file(
        &source,
        "library",
        "services.json",
        json!([
            {"name": "SSH", "protocols": [{"protocol": "tcp", "port": "22"}]},
            {"protocols": []},
            {"name": "DNS", "protocols": [{"protocol": "udp", "port": "53"}]},
        ]),
    );

    import_cmd(&source, &target)
        .assert()
        .success()
        .stdout(predicate::str::contains("entity body has no name field"))
        .stdout(predicate::str::contains(
            "import_summary created=2 updated=0 unchanged=0 failed=1",
        ));

    let stored = read_entities(&target.join("library").join("services.json"));
    assert_eq!(stored.len(), 2);
}

#[test]
fn strict_mode_turns_failures_into_a_nonzero_exit() {
    let dir = tempdir().expect("tempdir");
    let source = dir.path().join("tree");
    let target = dir.path().join("store");
    write_tree_file(
        &source,
        "library",
        "services.json",
        json!([{"protocols": []}]),
    );

    import_cmd(&source, &target)
        .arg("--strict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("import failed in strict mode"));
}

#[test]
fn an_empty_source_tree_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let source = dir.path().join("tree");
    fs::create_dir_all(&source).expect("create source");
    let target = dir.path().join("store");

    import_cmd(&source, &target)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no import files found"));
}

#[test]
fn an_unreadable_kind_file_skips_only_that_kind() {
    let dir = tempdir().expect("tempdir");
    let source = dir.path().join("tree");
    let target = dir.path().join("store");
    let library = source.join("library");
    fs::create_dir_all(&library).expect("create library");
    fs::write(library.join("services.json"), "{ broken").expect("write broken file");
    write_tree_file(
        &source,
        "library",
        "ip_lists.json",
        json!([{"name": "lan", "list_type": "ip", "items": ["192.168.1.0/24"]}]),
    );

    import_cmd(&source, &target)
        .assert()
        .success()
        .stderr(predicate::str::contains("warning: skipping services"))
        .stdout(predicate::str::contains("+ ip_lists lan id=ip_lists:1"));
}

#[test]
fn import_json_reports_every_outcome() {
    let dir = tempdir().expect("tempdir");
    let source = dir.path().join("tree");
    let target = dir.path().join("store");
    write_tree_file(
        &source,
        "library",
        "services.json",
        json!([{"name": "SSH", "protocols": [{"protocol": "tcp", "port": "22"}]}]),
    );

    let output = import_cmd(&source, &target)
        .arg("--format")
        .arg("json")
        .output()
        .expect("import output");
    assert!(output.status.success(), "import should succeed");

    let report: Value = serde_json::from_slice(&output.stdout).expect("json parse");
    let outcomes = report["outcomes"].as_array().expect("outcomes array");
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0]["kind"].as_str(), Some("services"));
    assert_eq!(outcomes[0]["name"].as_str(), Some("SSH"));
    assert_eq!(outcomes[0]["status"].as_str(), Some("created"));
    assert_eq!(outcomes[0]["id"].as_str(), Some("services:1"));
}

#[test]
fn convert_then_import_twice_reaches_a_fixpoint() {
    let dir = tempdir().expect("tempdir");
    let export = dir.path().join("export.json");
    let tree = dir.path().join("tree");
    let target = dir.path().join("store");
    fs::write(
        &export,
        json!([
            {"uid": "uid-ssh", "type": "service-tcp", "name": "ssh", "port": "22"},
            {"uid": "uid-lan", "type": "network", "name": "lan net",
             "subnet4": "192.168.1.0", "mask-length4": 24},
            {"uid": "uid-r1", "type": "access-rule", "name": "allow ssh",
             "action": "accept", "source": ["uid-lan"], "service": ["uid-ssh"],
             "track": {"type": "Log"}},
        ])
        .to_string(),
    )
    .expect("write export");

    Command::new(assert_cmd::cargo::cargo_bin!("cputm-convert"))
        .arg("convert")
        .arg(path_as_str(&export))
        .arg("--output")
        .arg(path_as_str(&tree))
        .assert()
        .success();

    import_cmd(&tree, &target)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "import_summary created=3 updated=0 unchanged=0 failed=0",
        ));

    import_cmd(&tree, &target)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "import_summary created=0 updated=0 unchanged=3 failed=0",
        ));

    let rules = read_entities(&target.join("security").join("firewall_rules.json"));
    assert_eq!(rules[0]["services"], json!([{"type": "service", "name": "SSH"}]));
}

fn path_as_str(path: &Path) -> &str {
    path.to_str().expect("path should be utf8")
}
