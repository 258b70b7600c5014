use std::fs;
use std::path::PathBuf;
use std::process::Command;

use serde_json::{Value, json};

fn cli() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_glean"));
    cmd.env("NO_COLOR", "1");
    cmd
}

fn scratch(tag: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("glean_cli_{}_{tag}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

#[test]
fn echo_to_json_fixture() {
    let dir = scratch("echo");
    let output = cli()
        .args(["Glean\\Diagnostics", "echo", "null", "true", "3", "--name", "case1"])
        .args(["--format", "json", "--path"])
        .arg(&dir)
        .output()
        .expect("failed to run glean");
    assert!(
        output.status.success(),
        "glean exited with {:?}: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );

    let file = dir.join("case1.json");
    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    assert_eq!(stdout.trim(), format!("Saved {}", file.display()));

    let written: Value =
        serde_json::from_str(&fs::read_to_string(&file).expect("fixture written")).unwrap();
    assert_eq!(written, json!([null, true, "3"]));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn hyphenated_arguments_after_separator() {
    let dir = scratch("hyphen");
    let output = cli()
        .args(["-a", "neg", "-f", "yml", "-p"])
        .arg(&dir)
        .args(["Glean\\Diagnostics", "echo", "--", "-1", "false"])
        .output()
        .expect("failed to run glean");
    assert!(output.status.success());
    let content = fs::read_to_string(dir.join("neg.yml")).unwrap();
    let loaded: Value = serde_yaml::from_str(&content).unwrap();
    assert_eq!(loaded, json!(["-1", false]));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_name_fails_without_touching_disk() {
    let dir = scratch("noname");
    for extra in [&[][..], &["--name", ""][..]] {
        let output = cli()
            .args(["Glean\\Diagnostics", "echo"])
            .args(extra)
            .arg("--path")
            .arg(&dir)
            .output()
            .expect("failed to run glean");
        assert!(!output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(
            stderr.contains("The 'name' option must have a value"),
            "unexpected stderr: {stderr}"
        );
    }
    assert!(!dir.exists());
}

#[test]
fn default_path_uses_storage_root() {
    let root = scratch("storage");
    fs::create_dir(&root).unwrap();
    let output = cli()
        .env("GLEAN_STORAGE_PATH", &root)
        .args(["Glean\\Config", "all", "--name", "config"])
        .output()
        .expect("failed to run glean");
    assert!(output.status.success());

    let file = root.join("fixtures").join("config.php");
    let content = fs::read_to_string(&file).expect("php fixture written");
    assert!(content.starts_with("<?php\n\nreturn array (\n"));
    let loaded = glean::fixture::load(&file).unwrap();
    assert_eq!(loaded, json!({"storage_root": root.display().to_string()}));
    fs::remove_dir_all(&root).unwrap();
}

#[test]
fn invocation_failure_exits_non_zero() {
    let dir = scratch("fail");
    let output = cli()
        .args(["Glean\\Diagnostics", "fail", "kaput", "-a", "x", "-p"])
        .arg(&dir)
        .output()
        .expect("failed to run glean");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("kaput"));
    assert!(stderr.contains("[ERROR]"));
    assert!(stderr.contains("Glean\\Diagnostics::fail failed; no fixture written"));
    assert!(!dir.exists());
}

#[test]
fn destination_is_logged_and_quiet_silences_it() {
    let dir = scratch("logging");
    let output = cli()
        .args(["Glean\\Diagnostics", "echo", "-a", "log", "-f", "json", "-p"])
        .arg(&dir)
        .output()
        .expect("failed to run glean");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[INFO]"), "unexpected stderr: {stderr}");
    assert!(stderr.contains("gleaning Glean\\Diagnostics::echo into"));
    assert!(stderr.contains("log.json"));

    let output = cli()
        .args(["-q", "Glean\\Diagnostics", "echo", "-a", "log", "-f", "json", "-p"])
        .arg(&dir)
        .output()
        .expect("failed to run glean");
    assert!(output.status.success());
    assert!(output.stderr.is_empty());
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn piped_status_line_has_no_ansi_codes() {
    let dir = scratch("plain");
    let output = Command::new(env!("CARGO_BIN_EXE_glean"))
        .env_remove("NO_COLOR")
        .args(["Glean\\Diagnostics", "echo", "-a", "plain", "-p"])
        .arg(&dir)
        .output()
        .expect("failed to run glean");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout UTF-8");
    assert!(!stdout.contains('\x1b'), "status line carries escapes: {stdout:?}");
    assert_eq!(stdout.trim(), format!("Saved {}", dir.join("plain.php").display()));
    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn unknown_method_is_a_resolution_error() {
    let output = cli()
        .args(["Glean\\Env", "nope", "-a", "x"])
        .output()
        .expect("failed to run glean");
    assert!(!output.status.success());
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("Method Glean\\Env::nope() does not exist")
    );
}

#[test]
fn second_write_overwrites() {
    let dir = scratch("overwrite");
    for arg in ["first-and-longer", "second"] {
        let output = cli()
            .args(["Glean\\Diagnostics", "echo", arg, "-a", "same", "-f", "json", "-p"])
            .arg(&dir)
            .output()
            .expect("failed to run glean");
        assert!(output.status.success());
    }
    let written: Value =
        serde_json::from_str(&fs::read_to_string(dir.join("same.json")).unwrap()).unwrap();
    assert_eq!(written, json!(["second"]));
    fs::remove_dir_all(&dir).unwrap();
}
