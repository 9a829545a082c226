use std::fs;

use pretty_assertions::assert_eq;
use serde_json::json;
use utm_store_core::{DirStore, EntityKind, ObjectStore, SnapshotError};

#[test]
fn save_then_open_preserves_collections() {
    let dir = tempfile::tempdir().unwrap();

    let mut store = DirStore::open(dir.path()).unwrap();
    store
        .create(
            EntityKind::Services,
            &json!({"name": "SSH", "protocols": [{"protocol": "tcp", "port": "22"}]}),
        )
        .unwrap();
    store
        .create(
            EntityKind::IpLists,
            &json!({"name": "Branch offices", "list_type": "ip", "items": ["192.168.10.0/24"]}),
        )
        .unwrap();
    store
        .create(
            EntityKind::FirewallRules,
            &json!({"name": "Admin access", "enabled": true, "action": "allow", "log": true}),
        )
        .unwrap();
    store.save().unwrap();

    assert!(dir.path().join("library").join("services.json").exists());
    assert!(dir.path().join("library").join("ip_lists.json").exists());
    assert!(dir.path().join("security").join("firewall_rules.json").exists());
    assert!(!dir.path().join("network").join("zones.json").exists());

    let reopened = DirStore::open(dir.path()).unwrap();
    assert_eq!(store.list(EntityKind::Services), reopened.list(EntityKind::Services));
    assert_eq!(store.list(EntityKind::IpLists), reopened.list(EntityKind::IpLists));
    assert_eq!(
        store.list(EntityKind::FirewallRules),
        reopened.list(EntityKind::FirewallRules)
    );
}

#[test]
fn missing_root_opens_as_an_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirStore::open(&dir.path().join("does-not-exist-yet")).unwrap();
    assert!(store.list(EntityKind::Services).is_empty());
}

#[test]
fn unknown_files_in_the_tree_are_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), "operator notes").unwrap();

    let store = DirStore::open(dir.path()).unwrap();
    store.save().unwrap();
    assert_eq!(
        fs::read_to_string(dir.path().join("notes.txt")).unwrap(),
        "operator notes"
    );
}

#[test]
fn duplicate_names_in_a_snapshot_file_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let library = dir.path().join("library");
    fs::create_dir_all(&library).unwrap();
    fs::write(
        library.join("services.json"),
        r#"[{"name": "Web"}, {"name": "web"}]"#,
    )
    .unwrap();

    let err = DirStore::open(dir.path()).unwrap_err();
    match err {
        SnapshotError::Load { path, fault } => {
            assert!(path.contains("services.json"));
            assert!(fault.is_already_exists());
        }
        other => panic!("expected a load rejection, got {other}"),
    }
}
