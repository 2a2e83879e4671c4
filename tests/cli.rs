use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A project with a `dist/` output directory holding `files`.
fn project(files: &[&str]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for file in files {
        let path = dir.path().join("dist").join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, file).unwrap();
    }
    dir
}

fn outctl(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("outctl").unwrap();
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join(".xdg"))
        .env("HOME", dir)
        .env_remove("OUTCTL_LOG");
    cmd
}

#[test]
fn test_run_prunes_files_dropped_since_last_build() {
    let dir = project(&["a.js", "b.js"]);

    outctl(dir.path()).args(["run", "--output", "dist"]).write_stdin("a.js\nb.js\n").assert().success();
    assert_eq!(fs::read_to_string(dir.path().join(".outctl-ledger")).unwrap(), "a.js\nb.js");

    fs::write(dir.path().join("dist/c.js"), "c").unwrap();
    outctl(dir.path())
        .args(["run", "--output", "dist"])
        .write_stdin("a.js\nc.js\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("remove dist/b.js"));

    assert!(!dir.path().join("dist/b.js").exists());
    assert!(dir.path().join("dist/a.js").exists());
    assert!(dir.path().join("dist/c.js").exists());
}

#[test]
fn test_run_applies_configured_rules() {
    let dir = project(&["app.js", "app.js.map", "legacy/deep/x.js"]);
    fs::write(
        dir.path().join("outctl.toml"),
        r#"
        output = "dist"

        [[control]]
        test = { pattern = '\.map$' }

        [[control]]
        test = "legacy/"
        replace = "old/[basename]"
        "#,
    )
    .unwrap();
    fs::write(dir.path().join("manifest.txt"), "app.js\napp.js.map\nlegacy/deep/x.js\n").unwrap();

    outctl(dir.path())
        .args(["run", "--manifest", "manifest.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("drop app.js.map"))
        .stdout(predicate::str::contains("rename legacy/deep/x.js -> old/x.js"));

    assert!(!dir.path().join("dist/app.js.map").exists());
    assert!(dir.path().join("dist/old/x.js").exists());
    assert_eq!(fs::read_to_string(dir.path().join(".outctl-ledger")).unwrap(), "app.js\nold/x.js");
}

#[test]
fn test_repeated_build_keeps_renamed_output() {
    let dir = project(&[]);
    fs::write(dir.path().join("outctl.toml"), "output = \"dist\"\n\n[[control]]\ntest = \"legacy/\"\nreplace = \"old/[basename]\"\n").unwrap();

    for round in ["first", "second"] {
        fs::create_dir_all(dir.path().join("dist/legacy")).unwrap();
        fs::write(dir.path().join("dist/legacy/a.js"), round).unwrap();

        outctl(dir.path())
            .arg("run")
            .write_stdin("legacy/a.js\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("rename legacy/a.js -> old/a.js"))
            .stdout(predicate::str::contains("remove").not());

        assert_eq!(fs::read_to_string(dir.path().join("dist/old/a.js")).unwrap(), round);
        assert!(!dir.path().join("dist/legacy/a.js").exists());
        assert_eq!(fs::read_to_string(dir.path().join(".outctl-ledger")).unwrap(), "old/a.js");
    }
}

#[test]
fn test_failed_build_keeps_everything() {
    let dir = project(&["a.js", "b.js"]);
    fs::write(dir.path().join(".outctl-ledger"), "a.js\nb.js").unwrap();

    outctl(dir.path())
        .args(["run", "--output", "dist", "--failed"])
        .write_stdin("a.js\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("pausing output cleanup"));

    assert!(dir.path().join("dist/b.js").exists());
    assert_eq!(fs::read_to_string(dir.path().join(".outctl-ledger")).unwrap(), "a.js\nb.js");
}

#[test]
fn test_dry_run_changes_nothing() {
    let dir = project(&["a.js", "b.js"]);
    fs::write(dir.path().join(".outctl-ledger"), "a.js\nb.js").unwrap();

    outctl(dir.path())
        .args(["run", "--output", "dist", "--dry-run"])
        .write_stdin("a.js\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("would remove dist/b.js"));

    assert!(dir.path().join("dist/b.js").exists());
    assert_eq!(fs::read_to_string(dir.path().join(".outctl-ledger")).unwrap(), "a.js\nb.js");
}

#[test]
fn test_missing_output_warns_and_does_nothing() {
    let dir = project(&["a.js"]);
    fs::write(dir.path().join(".outctl-ledger"), "a.js\nb.js").unwrap();

    outctl(dir.path())
        .arg("run")
        .write_stdin("a.js\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("No output directory configured"));

    assert_eq!(fs::read_to_string(dir.path().join(".outctl-ledger")).unwrap(), "a.js\nb.js");
}

#[test]
fn test_preview() {
    let dir = project(&[]);
    fs::write(dir.path().join("outctl.yaml"), "control:\n  - test: { pattern: '\\.map$' }\n  - test: js/\n    replace: '[resolvePath].bak'\n").unwrap();

    outctl(dir.path())
        .args(["preview", "js/app.js", "js/app.js.map", "index.html"])
        .assert()
        .success()
        .stdout(predicate::str::contains("js/app.js -> js/app.js.bak"))
        .stdout(predicate::str::contains("js/app.js.map -> (dropped)"))
        .stdout(predicate::str::contains("index.html (unchanged)"));
}

#[test]
fn test_invalid_rule_fails() {
    let dir = project(&[]);
    fs::write(dir.path().join("outctl.toml"), "[[control]]\ntest = { pattern = '(' }\n").unwrap();

    outctl(dir.path())
        .args(["preview", "a.js"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid options"));
}

#[test]
fn test_ledger_show_and_reset() {
    let dir = project(&[]);
    fs::write(dir.path().join(".outctl-ledger"), "a.js\r\n\nb.js\n").unwrap();

    outctl(dir.path())
        .args(["ledger", "show"])
        .assert()
        .success()
        .stdout(predicate::eq("a.js\nb.js\n"));

    outctl(dir.path()).args(["ledger", "reset"]).assert().success();
    assert!(!dir.path().join(".outctl-ledger").exists());

    outctl(dir.path()).args(["ledger", "show"]).assert().success().stdout(predicate::str::is_empty());
}

#[test]
fn test_ledger_path_from_environment() {
    let dir = project(&[]);
    fs::create_dir_all(dir.path().join("state")).unwrap();
    fs::write(dir.path().join("state/ledger"), "x.js").unwrap();

    outctl(dir.path())
        .args(["ledger", "show"])
        .env("OUTCTL_LEDGER", "state/ledger")
        .assert()
        .success()
        .stdout(predicate::eq("x.js\n"));
}
