//! Integration tests for confprov-cli
//!
//! These tests drive parsed command lines against on-disk experiment
//! directories and check the output, files and errors they produce.

use clap::Parser;
use confprov_cli::{render, Cli, CliError, Config};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn experiment() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("a_base.yml"),
        "DEFAULT:\n  EXPID: a000\n  HPCARCH: LOCAL\nJOBS:\n  SIM:\n    WALLCLOCK: '02:00'\n",
    )
    .unwrap();
    fs::write(dir.path().join("b_platform.yml"), "DEFAULT:\n  HPCARCH: MN5\n").unwrap();
    dir
}

fn run(args: &[&str]) -> confprov_cli::Result<String> {
    let mut argv = vec!["confprov", "--no-color", "--format", "quiet"];
    argv.extend_from_slice(args);
    render(Cli::parse_from(argv), &Config::default())
}

fn dir_arg(dir: &Path) -> &str {
    dir.to_str().unwrap()
}

fn canonical(dir: &Path, name: &str) -> String {
    fs::canonicalize(dir.join(name))
        .unwrap()
        .to_str()
        .unwrap()
        .to_string()
}

#[test]
fn test_show_and_source() {
    let dir = experiment();

    let all = run(&["show", dir_arg(dir.path())]).unwrap();
    assert!(all.starts_with("DEFAULT:"));
    assert!(all.contains("EXPID: a000"));
    assert!(all.contains("HPCARCH: MN5"));
    assert!(!all.contains("LOCAL"));

    assert_eq!(run(&["show", dir_arg(dir.path()), "DEFAULT.HPCARCH"]).unwrap(), "MN5");
    assert_eq!(
        run(&["source", dir_arg(dir.path()), "JOBS.SIM.WALLCLOCK"]).unwrap(),
        format!("{}:6:5", canonical(dir.path(), "a_base.yml"))
    );
    assert_eq!(
        run(&["source", dir_arg(dir.path()), "DEFAULT.HPCARCH"]).unwrap(),
        format!("{}:2:3", canonical(dir.path(), "b_platform.yml"))
    );
}

#[test]
fn test_unknown_parameter() {
    let dir = experiment();
    let err = run(&["source", dir_arg(dir.path()), "DEFAULT.MISSING"]).unwrap_err();
    assert!(matches!(err, CliError::NotFound(path) if path == "DEFAULT.MISSING"));

    let err = run(&["show", dir_arg(dir.path()), "NOPE"]).unwrap_err();
    assert!(matches!(err, CliError::NotFound(_)));
}

#[test]
fn test_list_with_prefix() {
    let dir = experiment();
    assert_eq!(
        run(&["list", dir_arg(dir.path())]).unwrap(),
        "DEFAULT.EXPID\nDEFAULT.HPCARCH\nJOBS.SIM.WALLCLOCK"
    );
    assert_eq!(
        run(&["list", dir_arg(dir.path()), "--prefix", "DEFAULT"]).unwrap(),
        "DEFAULT.EXPID\nDEFAULT.HPCARCH"
    );
    assert_eq!(run(&["list", dir_arg(dir.path()), "--prefix", "PLATFORMS"]).unwrap(), "");
}

#[test]
fn test_export_writes_json() {
    let dir = experiment();
    let out = dir.path().join("prov.json");
    let message = run(&["export", dir_arg(dir.path()), "-o", out.to_str().unwrap()]).unwrap();
    assert!(message.starts_with("✓ Exported 3 parameter(s)"));

    let exported: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let platform = fs::canonicalize(dir.path().join("b_platform.yml")).unwrap();
    assert_eq!(exported["DEFAULT"]["HPCARCH"]["file"], platform.to_str().unwrap());
    assert_eq!(exported["JOBS"]["SIM"]["WALLCLOCK"]["line"], 6);
}

#[test]
fn test_save_then_inspect() {
    let dir = experiment();
    let message = run(&["save", dir_arg(dir.path())]).unwrap();

    let snapshot = dir.path().join("metadata").join("experiment_data.yml");
    assert!(message.starts_with("✓ Snapshot saved to"));
    assert!(!message.contains("Previous snapshot"));
    assert!(snapshot.exists());
    assert!(fs::read_to_string(&snapshot).unwrap().contains("PROVENANCE"));

    assert_eq!(
        run(&["inspect", snapshot.to_str().unwrap()]).unwrap(),
        "DEFAULT.EXPID\nDEFAULT.HPCARCH\nJOBS.SIM.WALLCLOCK"
    );
    assert_eq!(
        run(&["inspect", snapshot.to_str().unwrap(), "DEFAULT.EXPID"]).unwrap(),
        format!("{}:2:3", canonical(dir.path(), "a_base.yml"))
    );
    assert!(matches!(
        run(&["inspect", snapshot.to_str().unwrap(), "DEFAULT.MISSING"]),
        Err(CliError::NotFound(_))
    ));
}

#[test]
fn test_missing_directory() {
    let err = run(&["list", "/nonexistent/confprov/conf"]).unwrap_err();
    assert!(matches!(err, CliError::Loader(_)));
}

#[test]
fn test_second_save_reports_backup() {
    let dir = experiment();
    run(&["save", dir_arg(dir.path())]).unwrap();

    let message = run(&["save", dir_arg(dir.path())]).unwrap();
    assert!(message.contains("ℹ Previous snapshot kept at"));
    assert!(message.ends_with("experiment_data.yml.bak"));
    assert!(dir.path().join("metadata").join("experiment_data.yml.bak").exists());
}

#[test]
fn test_inspect_snapshot_without_provenance() {
    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("experiment_data.yml");
    fs::write(&snapshot, "DEFAULT:\n  EXPID: a000\n").unwrap();

    assert_eq!(
        run(&["inspect", snapshot.to_str().unwrap()]).unwrap(),
        "⚠ Snapshot has no archived provenance"
    );
}
