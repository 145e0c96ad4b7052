//! Integration tests for ragsim-cli.
//!
//! Tests run the built `ragsim` binary against temporary scripts and snapshot
//! files and check its output and exit status.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use tempfile::TempDir;

/// Helper to get the path to the `ragsim` binary built by cargo.
fn ragsim_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ragsim"))
}

fn write_file(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("failed to write test file");
    path
}

const CLASSIC: &str = "\
# classic two-process deadlock
process P1
process P2
resource R1 1
resource R2 1
request P1 R1 1
request P2 R2 1
request P1 R2 1
request P2 R1 1
detect
";

// ---------------------------------------------------------------------------
// `ragsim run`
// ---------------------------------------------------------------------------

#[test]
fn cli_run_reports_deadlock() {
    let dir = TempDir::new().unwrap();
    let script = write_file(dir.path(), "classic.rag", CLASSIC);

    let output = ragsim_bin()
        .arg("run")
        .arg(&script)
        .output()
        .expect("failed to run ragsim run");

    assert!(output.status.success(), "ragsim run failed: {output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Verdict: DEADLOCK"), "got: {stdout}");
    assert!(stdout.contains("processes: P1, P2"), "got: {stdout}");
    assert!(stdout.contains("resources: R1, R2"), "got: {stdout}");
}

#[test]
fn cli_run_stops_at_first_failure() {
    let dir = TempDir::new().unwrap();
    let script = write_file(
        dir.path(),
        "bad.rag",
        "process P1\nrequest P1 R9 1\nprocess P2\n",
    );

    let output = ragsim_bin().arg("run").arg(&script).output().unwrap();

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("Added process P1"));
    assert!(!stdout.contains("Added process P2"), "should stop: {stdout}");
    assert!(stderr.contains("line 2"), "got: {stderr}");
    assert!(stderr.contains("resource 'R9' not found"), "got: {stderr}");
}

#[test]
fn cli_run_keep_going() {
    let dir = TempDir::new().unwrap();
    let script = write_file(
        dir.path(),
        "bad.rag",
        "process P1\nrequest P1 R9 1\nprocess P2\n",
    );

    let output = ragsim_bin()
        .arg("run")
        .arg(&script)
        .arg("--keep-going")
        .output()
        .unwrap();

    // Failures still make the exit status non-zero.
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Added process P2"), "got: {stdout}");
}

#[test]
fn cli_run_rejects_malformed_script() {
    let dir = TempDir::new().unwrap();
    let script = write_file(dir.path(), "typo.rag", "process P1\nprocces P2\n");

    let output = ragsim_bin().arg("run").arg(&script).output().unwrap();

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.is_empty(), "nothing should run: {stdout}");
    assert!(stderr.contains("unknown command 'procces'"), "got: {stderr}");
}

#[test]
fn cli_run_save_then_detect_and_show() {
    let dir = TempDir::new().unwrap();
    let script = write_file(dir.path(), "classic.rag", CLASSIC);
    let snapshot = dir.path().join("out").join("classic.json");

    let output = ragsim_bin()
        .arg("run")
        .arg(&script)
        .arg("--save")
        .arg(&snapshot)
        .output()
        .unwrap();
    assert!(output.status.success(), "{output:?}");
    assert!(snapshot.exists());

    let output = ragsim_bin().arg("detect").arg(&snapshot).output().unwrap();
    assert!(output.status.success(), "detect exits 0 on deadlock");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("P1 -> P2 -> P1"), "got: {stdout}");

    let output = ragsim_bin().arg("show").arg(&snapshot).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("0/1 available"), "got: {stdout}");
    assert!(stdout.contains("P2 -> R1 request x1"), "got: {stdout}");
}

#[test]
fn cli_run_load_continues_from_snapshot() {
    let dir = TempDir::new().unwrap();
    let snapshot = dir.path().join("classic.json");
    let status = ragsim_bin()
        .args(["scenarios", "export", "classic_deadlock"])
        .arg(&snapshot)
        .status()
        .unwrap();
    assert!(status.success());

    let script = write_file(dir.path(), "fix.rag", "release P1 R1 1\ndetect\n");
    let output = ragsim_bin()
        .arg("run")
        .arg(&script)
        .arg("--load")
        .arg(&snapshot)
        .output()
        .unwrap();

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("promoted: P2 gets 1 x R1"), "got: {stdout}");
    assert!(stdout.contains("Verdict: no deadlock"), "got: {stdout}");
}

// ---------------------------------------------------------------------------
// `ragsim shell`
// ---------------------------------------------------------------------------

#[test]
fn cli_shell_reports_errors_and_continues() {
    let mut child = ragsim_bin()
        .arg("shell")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn ragsim shell");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"process P1\nprocess P1\nbogus\nresource R1 2\nundo\nshow\nquit\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("a node named 'P1' already exists"), "got: {stderr}");
    assert!(stderr.contains("unknown command 'bogus'"), "got: {stderr}");
    assert!(stdout.contains("Undid: Added resource R1"), "got: {stdout}");
    assert!(!stdout.contains("available"), "R1 should be gone: {stdout}");
}

// ---------------------------------------------------------------------------
// `ragsim scenarios` and settings
// ---------------------------------------------------------------------------

#[test]
fn cli_scenarios_list() {
    let output = ragsim_bin().args(["scenarios", "list"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for name in [
        "empty",
        "classic_deadlock",
        "safe_cycle",
        "dining_philosophers",
        "promotion",
    ] {
        assert!(stdout.contains(name), "listing should contain '{name}'");
    }
}

#[test]
fn cli_scenarios_show_safe_cycle() {
    let output = ragsim_bin()
        .args(["scenarios", "show", "safe_cycle"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Safe sequence: P3 -> P2 -> P1"), "got: {stdout}");
}

#[test]
fn cli_scenarios_unknown_name_fails() {
    let output = ragsim_bin()
        .args(["scenarios", "show", "nope"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("scenario not found: nope"), "got: {stderr}");
}

#[test]
fn cli_config_history_limit() {
    let dir = TempDir::new().unwrap();
    let config = write_file(dir.path(), "ragsim.toml", "history_limit = 2\n");
    let script = write_file(
        dir.path(),
        "limited.rag",
        "process A\nprocess B\nprocess C\nundo\nundo\n",
    );

    let output = ragsim_bin()
        .arg("--config")
        .arg(&config)
        .arg("run")
        .arg(&script)
        .output()
        .unwrap();

    // Only one step back is kept with a limit of 2.
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nothing to undo"), "got: {stderr}");
}
