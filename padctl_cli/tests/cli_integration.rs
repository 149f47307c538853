use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use tempfile::tempdir;

const VALID: &str = r#"
[analog]
oversample = 4

[[analog.channels]]
input = 0
param_id = 20

[[analog.channels]]
input = 1
param_id = 21

[[analog.channels]]
input = 2
param_id = 22

[[analog.channels]]
input = 3
param_id = 23

[digital]
lines = [
    { pin = 5, role = "up" },
    { pin = 6, role = "a" },
]

[simulation]
level = 2048
"#;

fn write_config(dir: &tempfile::TempDir, extra: &str) -> PathBuf {
    let path = dir.path().join("cfg.toml");
    fs::write(&path, format!("{VALID}\n{extra}")).unwrap();
    path
}

fn padctl(cfg: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("padctl").unwrap();
    cmd.arg("--config").arg(cfg);
    cmd
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["run", "--ticks", "3", "--period-ms", "1", "--dry-run"], 0, "run complete: ticks=3 events=4", "stdout")]
#[case(&["self-check"], 0, "self-check ok", "stdout")]
#[case(&["run", "--period-ms", "0"], 2, "period-ms", "stderr")]
#[case(&["replay"], 2, "--trace", "stderr")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "");

    let mut cmd = padctl(&cfg);
    for a in args {
        cmd.arg(a);
    }
    let assert = cmd.assert().code(exit_code);
    match stream {
        "stdout" => assert.stdout(predicate::str::contains(needle)),
        _ => assert.stderr(predicate::str::contains(needle)),
    };
}

#[test]
fn dry_run_json_summary() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "");

    let out = padctl(&cfg)
        .args(["--json", "run", "--ticks", "5", "--period-ms", "1", "--dry-run"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let line = stdout.lines().last().unwrap();
    let v: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(v["ticks"], 5);
    // every channel seeds once at mid-scale, then stays put
    assert_eq!(v["events_emitted"], 4);
    assert_eq!(v["events_deferred"], 0);
    assert_eq!(v["scan_failures"], 0);
}

#[test]
fn invalid_config_exits_with_config_code() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "[dispatch]\nmidi_channel = 0\n");

    padctl(&cfg)
        .args(["run", "--ticks", "1", "--dry-run"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Invalid configuration"))
        .stderr(predicate::str::contains("midi_channel"));
}

#[test]
fn invalid_config_json_error() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "[tick]\nperiod_ms = 0\n");

    let out = padctl(&cfg).args(["--json", "self-check"]).output().unwrap();
    assert_eq!(out.status.code(), Some(3));
    let stderr = String::from_utf8(out.stderr).unwrap();
    let v: serde_json::Value = serde_json::from_str(stderr.lines().last().unwrap()).unwrap();
    assert_eq!(v["reason"], "InvalidConfig");
}

#[test]
fn missing_config_file() {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("nope.toml");

    padctl(&cfg)
        .args(["self-check"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not be read"));
}

#[test]
fn replay_prints_events() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "");
    let trace = dir.path().join("trace.csv");
    let mut csv = String::from("tick,channel,raw\n");
    for tick in 0..4 {
        for _ in 0..4 {
            csv.push_str(&format!("{tick},0,4095\n"));
        }
    }
    fs::write(&trace, csv).unwrap();

    padctl(&cfg)
        .args(["replay", "--trace"])
        .arg(&trace)
        .assert()
        .success()
        .stdout(predicate::str::contains("tick,channel,param_id,value"))
        .stdout(predicate::str::contains("0,0,20,127"));
}

#[test]
fn replay_rejects_bad_header() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "");
    let trace = dir.path().join("trace.csv");
    fs::write(&trace, "t,ch,value\n0,0,1\n").unwrap();

    padctl(&cfg)
        .args(["replay", "--trace"])
        .arg(&trace)
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "Invalid headers in trace CSV. Expected 'tick,channel,raw'.",
        ));
}

#[test]
fn replay_rejects_unknown_channel() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "");
    let trace = dir.path().join("trace.csv");
    fs::write(&trace, "tick,channel,raw\n0,9,100\n").unwrap();

    padctl(&cfg)
        .args(["replay", "--trace"])
        .arg(&trace)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("channel 9"));
}

#[cfg(not(feature = "hardware"))]
#[test]
fn rpi_backend_needs_hardware_build() {
    let dir = tempdir().unwrap();
    let cfg = write_config(&dir, "[hardware]\nbackend = \"rpi\"\n");

    padctl(&cfg)
        .args(["run", "--ticks", "1", "--dry-run"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("--features hardware"));
}

#[test]
fn device_sinks_receive_reports_and_events() {
    let dir = tempdir().unwrap();
    let pad = dir.path().join("hidg0");
    let midi = dir.path().join("midi");
    fs::write(&pad, b"").unwrap();
    fs::write(&midi, b"").unwrap();
    let extra = format!(
        "[dispatch]\ncontinuous = \"gamepad\"\nevents = \"midi\"\ngamepad_device = \"{}\"\nmidi_device = \"{}\"\n",
        pad.display(),
        midi.display()
    );
    let cfg = write_config(&dir, &extra);

    padctl(&cfg)
        .args(["run", "--ticks", "3", "--period-ms", "1"])
        .assert()
        .success();

    // one 12-byte report per tick, one CC per channel on the first tick
    assert_eq!(fs::read(&pad).unwrap().len(), 3 * 12);
    let cc = fs::read(&midi).unwrap();
    assert_eq!(cc.len(), 4 * 3);
    assert_eq!(&cc[..3], &[0xB0, 20, 64]);
}
