use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[allow(deprecated)]
fn vendo_cmd() -> Command {
    Command::cargo_bin("vendo").unwrap()
}

const MANIFEST: &str = r#"pkg = "github.com/me/app"

[[deps]]
pkg = "github.com/a/a"
ref = "v1.0.3"

[[deps.deps]]
pkg = "github.com/c/c"
"#;

#[test]
fn tree_prints_recorded_dependencies() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("vendo.toml"), MANIFEST).unwrap();

    vendo_cmd()
        .current_dir(tmp.path())
        .arg("tree")
        .assert()
        .success()
        .stdout(predicate::str::contains("github.com/me/app"))
        .stdout(predicate::str::contains("└── github.com/a/a @v1.0.3"))
        .stdout(predicate::str::contains("    └── github.com/c/c"));
}

#[test]
fn tree_finds_manifest_in_parent_directory() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("vendo.toml"), MANIFEST).unwrap();
    let nested = tmp.path().join("cmd/server");
    fs::create_dir_all(&nested).unwrap();

    vendo_cmd()
        .current_dir(&nested)
        .args(["tree", "--depth", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("github.com/a/a"))
        .stdout(predicate::str::contains("github.com/c/c").not());
}

#[test]
fn tree_without_manifest_fails() {
    let tmp = TempDir::new().unwrap();

    vendo_cmd()
        .current_dir(tmp.path())
        .arg("tree")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no vendo.toml found"));
}
