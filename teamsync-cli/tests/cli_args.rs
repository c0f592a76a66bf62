//! Argument and configuration validation for the `teamsync` binary.
//!
//! Nothing here reaches the network: every case fails (or finishes) before
//! the first remote call.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A command with a scrubbed environment and an empty home, so host
/// configuration can never leak into assertions.
fn teamsync(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("teamsync").expect("binary");
    cmd.env_clear()
        .env("HOME", home.path())
        .env("USERPROFILE", home.path());
    cmd
}

#[test]
fn help_lists_both_subcommands() {
    let home = TempDir::new().expect("home");
    teamsync(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("watch"));
}

#[test]
fn sync_without_configuration_names_the_missing_field() {
    let home = TempDir::new().expect("home");
    teamsync(&home)
        .arg("sync")
        .arg("--dry-run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing config value 'directory.url'"));
}

#[test]
fn sync_reports_each_missing_field_layer_by_layer() {
    let home = TempDir::new().expect("home");
    teamsync(&home)
        .arg("sync")
        .arg("--directory-url")
        .arg("https://scanner.example.com")
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing config value 'directory.username'"));
}

#[test]
fn watch_list_prints_builtin_targets() {
    let home = TempDir::new().expect("home");
    teamsync(&home)
        .arg("watch")
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("elasticsearch"))
        .stdout(predicate::str::contains("nginx"))
        .stdout(predicate::str::contains("sonatype-iq"));
}

#[test]
fn watch_without_targets_is_an_error() {
    let home = TempDir::new().expect("home");
    teamsync(&home)
        .arg("watch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("provide a target name"));
}

#[test]
fn watch_rejects_unknown_target() {
    let home = TempDir::new().expect("home");
    teamsync(&home)
        .arg("watch")
        .arg("imaginary-product")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown target 'imaginary-product'"));
}

#[test]
fn watch_url_requires_pattern() {
    let home = TempDir::new().expect("home");
    teamsync(&home)
        .arg("watch")
        .arg("--url")
        .arg("https://example.com/downloads")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--pattern"));
}

#[test]
fn watch_version_file_rejected_for_multiple_targets() {
    let home = TempDir::new().expect("home");
    teamsync(&home)
        .arg("watch")
        .arg("nginx")
        .arg("elasticsearch")
        .arg("--version-file")
        .arg("/tmp/one.txt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("single target"));
}

#[test]
fn sync_rejects_unreadable_role_template() {
    let home = TempDir::new().expect("home");
    teamsync(&home)
        .arg("sync")
        .arg("--directory-url")
        .arg("https://scanner.example.com")
        .arg("--directory-user")
        .arg("admin")
        .arg("--directory-password")
        .arg("secret")
        .arg("--rolestore-url")
        .arg("https://search.example.com:9200")
        .arg("--rolestore-user")
        .arg("elastic")
        .arg("--rolestore-password")
        .arg("secret")
        .arg("--role-template")
        .arg(home.path().join("missing.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read role template"));
}
