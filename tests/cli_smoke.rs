mod support;

use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;
use support::TestDir;

fn tracker(dir: &TestDir) -> Command {
    let mut cmd = Command::cargo_bin("tracker").expect("binary");
    cmd.current_dir(dir.path()).env_remove("TRACKER_CONFIG");
    cmd
}

#[test]
fn tracker_help_works() {
    let dir = TestDir::new();
    tracker(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("tasks, epics and subtasks"));
}

#[test]
fn subcommand_help_works() {
    let dir = TestDir::new();
    for cmd in ["demo", "run", "config"] {
        tracker(&dir).arg(cmd).arg("--help").assert().success();
    }
}

#[test]
fn demo_prints_history() {
    let dir = TestDir::new();
    tracker(&dir)
        .arg("demo")
        .assert()
        .success()
        .stdout(contains("tracker demo"))
        .stdout(contains("history: [#4]"));
}

#[test]
fn demo_json_reports_entities() {
    let dir = TestDir::new();
    let output = tracker(&dir)
        .args(["--json", "demo"])
        .output()
        .expect("run demo");
    assert!(output.status.success());

    let payload: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(payload["schema_version"], "tracker.v1");
    assert_eq!(payload["status"], "success");
    let entities = payload["data"]["entities"].as_array().expect("entities");
    assert_eq!(entities.len(), 4);
    assert_eq!(entities[0]["kind"], "task");
    assert_eq!(entities[0]["status"], "DONE");
    assert_eq!(payload["data"]["epic_subtasks"].as_array().unwrap().len(), 2);
}

#[test]
fn run_executes_script() {
    let dir = TestDir::new();
    let script = dir
        .write_file(
            "session.toml",
            r#"
[[step]]
op = "add_epic"
title = "Epic"

[[step]]
op = "add_subtask"
epic = 1
title = "Child"
status = "done"

[[step]]
op = "get"
id = 1
"#,
        )
        .expect("write script");

    tracker(&dir)
        .arg("run")
        .arg(&script)
        .assert()
        .success()
        .stdout(contains("3. found epic #1 [DONE] Epic"));
}

const EPIC_STATUS_UPDATE: &str = r#"
[[step]]
op = "add_epic"
title = "Epic"

[[step]]
op = "update"
id = 1
status = "done"
"#;

#[test]
fn run_warns_when_epic_status_is_ignored() {
    let dir = TestDir::new();
    let script = dir
        .write_file("epic.toml", EPIC_STATUS_UPDATE)
        .expect("write script");

    tracker(&dir)
        .arg("run")
        .arg(&script)
        .assert()
        .success()
        .stdout(contains("2. updated epic #1 [NEW] Epic"))
        .stderr(contains("warning: step 2: status of epic #1"));
}

#[test]
fn run_json_carries_warnings() {
    let dir = TestDir::new();
    let script = dir
        .write_file("epic.toml", EPIC_STATUS_UPDATE)
        .expect("write script");

    let output = tracker(&dir)
        .args(["--json", "run"])
        .arg(&script)
        .output()
        .expect("run script");
    assert!(output.status.success());

    let payload: Value = serde_json::from_slice(&output.stdout).expect("json");
    let warnings = payload["warnings"].as_array().expect("warnings");
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].as_str().unwrap().contains("epic #1"));
    assert_eq!(payload["data"]["warnings"], payload["warnings"]);
}

#[test]
fn run_failure_exits_with_user_error() {
    let dir = TestDir::new();
    let script = dir
        .write_file(
            "bad.toml",
            "[[step]]\nop = \"add_subtask\"\nepic = 5\ntitle = \"orphan\"\n",
        )
        .expect("write script");

    let output = tracker(&dir)
        .args(["--json", "run"])
        .arg(&script)
        .output()
        .expect("run script");
    assert_eq!(output.status.code(), Some(2));

    let payload: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["command"], "run");
    assert_eq!(payload["error"]["kind"], "user_error");
    assert_eq!(payload["error"]["details"]["step"], 1);
}

#[test]
fn config_show_reads_local_file() {
    let dir = TestDir::new();
    dir.write_file(".tracker.toml", "[history]\nmax_entries = 3\n")
        .expect("write config");

    tracker(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("history.max_entries: 3"));
}

#[test]
fn config_init_writes_defaults_once() {
    let dir = TestDir::new();
    tracker(&dir).args(["config", "init"]).assert().success();
    assert!(dir.path().join(".tracker.toml").exists());

    tracker(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(contains("already exists"));
}

#[test]
fn explicit_bad_config_fails() {
    let dir = TestDir::new();
    let path = dir
        .write_file("custom.toml", "[ids]\nfirst = 0\n")
        .expect("write config");

    tracker(&dir)
        .arg("--config")
        .arg(&path)
        .arg("demo")
        .assert()
        .code(2)
        .stderr(contains("Invalid configuration"));
}

#[test]
fn invalid_local_config_warns_and_uses_defaults() {
    let dir = TestDir::new();
    dir.write_file(".tracker.toml", "[history]\nmax_entries = 0\n")
        .expect("write config");

    tracker(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("history.max_entries: 10"))
        .stderr(contains("ignoring invalid .tracker.toml"))
        .stderr(contains("using defaults"));
}

#[test]
fn verbose_logs_progress_to_stderr() {
    let dir = TestDir::new();
    tracker(&dir)
        .env_remove("RUST_LOG")
        .args(["-v", "demo"])
        .assert()
        .success()
        .stderr(contains("demo step"));
}

#[test]
fn quiet_run_is_silent_without_verbose() {
    let dir = TestDir::new();
    tracker(&dir)
        .env_remove("RUST_LOG")
        .args(["--quiet", "demo"])
        .assert()
        .success()
        .stdout("")
        .stderr("");
}
