use std::fs;

use forecast_engine::{ensure_parent_dir, replace_atomically};
use tempfile::TempDir;

#[test]
fn creates_missing_parent_dir() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("state").join("states.json");
    let dir = ensure_parent_dir(&file).unwrap();
    assert_eq!(dir, temp.path().join("state"));
    assert!(dir.is_dir());
}

#[test]
fn replace_overwrites_existing_file() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("states.json");

    replace_atomically(&file, b"first").unwrap();
    assert_eq!(fs::read_to_string(&file).unwrap(), "first");

    replace_atomically(&file, b"second").unwrap();
    assert_eq!(fs::read_to_string(&file).unwrap(), "second");
}

#[test]
fn parent_that_is_a_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("not_a_dir");
    fs::write(&blocker, "x").unwrap();

    let result = replace_atomically(&blocker.join("states.json"), b"data");
    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "x");
}
