mod common;

use std::fs;

use common::init_logging;
use pretty_assertions::assert_eq;
use sweep_engine::{AtomicFileWriter, DestinationRegistry, RegistryError, TargetId};
use tempfile::tempdir;

#[test]
fn atomic_writer_replaces_existing_file() {
    init_logging();
    let dir = tempdir().unwrap();
    let writer = AtomicFileWriter::new(dir.path().join("out"));

    let first = writer.write("successful_abc123.txt", b"1.1.1.1").unwrap();
    let second = writer.write("successful_abc123.txt", b"8.8.8.8").unwrap();

    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "8.8.8.8");
    assert_eq!(fs::read_dir(dir.path().join("out")).unwrap().count(), 1);
}

#[test]
fn registry_round_trips_through_disk() {
    init_logging();
    let dir = tempdir().unwrap();
    let path = dir.path().join("destinations.json");

    let mut registry = DestinationRegistry::load(&path).unwrap();
    assert!(registry.get("alice").is_empty());
    assert!(registry.add("alice", TargetId::from("@channel"), "Channel"));
    assert!(registry.add("alice", TargetId::from("-100200"), "Group"));
    assert!(!registry.add("alice", TargetId::from("@channel"), "Channel"));
    assert!(registry.add("alice", TargetId::from("@channel"), "Main channel"));
    registry.save().unwrap();

    let reloaded = DestinationRegistry::load(&path).unwrap();
    let labels: Vec<(&str, &str)> = reloaded
        .get("alice")
        .iter()
        .map(|d| (d.target_id.0.as_str(), d.label.as_str()))
        .collect();
    assert_eq!(labels, vec![("@channel", "Main channel"), ("-100200", "Group")]);
    assert!(reloaded.get("bob").is_empty());

    let mut reloaded = reloaded;
    assert!(reloaded.remove("alice", &TargetId::from("-100200")));
    assert!(!reloaded.remove("alice", &TargetId::from("-100200")));
    assert!(!reloaded.remove("bob", &TargetId::from("@channel")));
}

#[test]
fn corrupt_registry_is_reported() {
    init_logging();
    let dir = tempdir().unwrap();
    let path = dir.path().join("destinations.json");
    fs::write(&path, "{ not json").unwrap();

    assert!(matches!(
        DestinationRegistry::load(&path),
        Err(RegistryError::Parse { .. })
    ));
}
