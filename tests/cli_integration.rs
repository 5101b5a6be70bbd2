/*!
 * Integration tests for the projsnap binary
 */

use std::fs::{self, File};
use std::io::Write;
use std::process::Command;

use tempfile::tempdir;

fn projsnap() -> Command {
    Command::new(env!("CARGO_BIN_EXE_projsnap"))
}

#[test]
fn test_default_run_writes_snapshot_into_root() {
    let temp_dir = tempdir().unwrap();
    fs::create_dir_all(temp_dir.path().join("lib")).unwrap();
    fs::create_dir_all(temp_dir.path().join(".dart_tool/cache")).unwrap();

    let mut main = File::create(temp_dir.path().join("lib/main.dart")).unwrap();
    writeln!(main, "void main() {{}}").unwrap();
    fs::write(temp_dir.path().join(".dart_tool/cache/blob"), "cached").unwrap();
    fs::write(temp_dir.path().join("lib/firebase_options.dart"), "API_KEY").unwrap();
    fs::write(temp_dir.path().join("pubspec.lock"), "lock").unwrap();

    for _ in 0..2 {
        let status = projsnap()
            .arg("-q")
            .arg(temp_dir.path())
            .status()
            .unwrap();
        assert!(status.success());
    }

    let snapshot = fs::read_to_string(temp_dir.path().join("project_snapshot.txt")).unwrap();

    assert!(snapshot.contains("=== FILE: lib/main.dart ==="));
    assert!(snapshot.contains("void main() {}"));
    assert!(snapshot.contains("=== FILE: lib/firebase_options.dart ==="));
    assert!(snapshot.contains("[Content Omitted - Generated/Tooling File]"));
    assert!(!snapshot.contains("API_KEY"));
    assert!(!snapshot.contains(".dart_tool"));
    assert!(!snapshot.contains("pubspec.lock"));
    assert!(!snapshot.contains("=== FILE: project_snapshot.txt ==="));
    assert!(snapshot.ends_with("Snapshot Complete.\n"));
}

#[test]
fn test_custom_output_name() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("a.txt"), "alpha").unwrap();

    let status = projsnap()
        .args(["-q"])
        .arg(temp_dir.path())
        .arg("snap.txt")
        .status()
        .unwrap();
    assert!(status.success());

    let snapshot = fs::read_to_string(temp_dir.path().join("snap.txt")).unwrap();
    assert!(snapshot.contains("=== FILE: a.txt ==="));
    assert!(!snapshot.contains("=== FILE: snap.txt ==="));
}

#[test]
fn test_unwritable_output_fails() {
    let temp_dir = tempdir().unwrap();

    let status = projsnap()
        .arg("-q")
        .arg(temp_dir.path())
        .arg("no/such/dir/out.txt")
        .status()
        .unwrap();
    assert!(!status.success());
}
