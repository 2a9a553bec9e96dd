extern crate assert_cmd;
extern crate serde_json;

use assert_cmd::prelude::*;
use serde_json::json;
use std::process::{Command, Output};

fn run_cli(args: &[&str]) -> Output {
    Command::cargo_bin("bounded")
        .unwrap()
        .args(args)
        .stdin(std::process::Stdio::null())
        .output()
        .expect("test command failed to execute")
}

fn stdout_of(args: &[&str]) -> String {
    let output = run_cli(args);
    assert!(
        output.status.success(),
        "test command must execute successfully but status was {}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr),
    );
    String::from_utf8(output.stdout).expect("test command output must be UTF-8")
}

fn stderr_of_failure(args: &[&str]) -> String {
    let output = run_cli(args);
    assert!(!output.status.success(), "test command must fail");
    String::from_utf8(output.stderr).expect("test command output must be UTF-8")
}

#[test]
fn clamps_at_construction() {
    let stdout = stdout_of(&["clamp", "--kind=int", "--minimum=0", "--maximum=10", "--", "-3"]);
    assert_eq!(stdout.trim(), "0");
}

#[test]
fn clamps_after_each_step() {
    let stdout = stdout_of(&[
        "clamp",
        "--kind=int",
        "--minimum=0",
        "--maximum=10",
        "--then=+=20",
        "--then=-=4",
        "5",
    ]);
    assert_eq!(stdout.trim(), "6");
}

#[test]
fn reports_json() {
    let stdout = stdout_of(&[
        "clamp",
        "--json",
        "--minimum=0.5",
        "--maximum=2.5",
        "--then=**=2",
        "2",
    ]);
    let result: serde_json::Value =
        serde_json::from_str(&stdout).expect("clamp result must be JSON");
    assert_eq!(
        result,
        json!({
            "value": 2.5,
            "minimum": 0.5,
            "maximum": 2.5,
            "width": 2.0,
            "is_bounded": true,
            "steps": ["**=2"],
        })
    );
}

#[test]
fn has_no_width_for_text() {
    let stdout = stdout_of(&["clamp", "--json", "--kind=text", "--maximum=m", "--then=+=ore", "lo"]);
    let result: serde_json::Value =
        serde_json::from_str(&stdout).expect("clamp result must be JSON");
    assert_eq!(result["value"], json!("loore"));
    assert_eq!(result["width"], json!(null));
    assert_eq!(result["minimum"], json!(null));
}

#[test]
fn clamps_text_at_maximum() {
    let stdout = stdout_of(&["clamp", "--kind=text", "--maximum=mid", "--then=+=z", "m"]);
    assert_eq!(stdout.trim(), "mid");

    // clamped to the minimum before the step is applied
    let stdout = stdout_of(&["clamp", "--kind=text", "--minimum=b", "--then=+=z", "a"]);
    assert_eq!(stdout.trim(), "bz");
}

#[test]
fn fails_on_unsupported_operator() {
    let stderr = stderr_of_failure(&["clamp", "--kind=char", "--then=+=b", "a"]);
    assert!(stderr.starts_with("ERROR: cannot apply +=b"), "stderr: {}", stderr);
}

#[test]
fn fails_on_division_by_zero() {
    let stderr = stderr_of_failure(&["clamp", "--kind=int", "--then=//=0", "7"]);
    assert!(stderr.contains("division by zero"), "stderr: {}", stderr);
}

#[test]
fn checks_without_clamping() {
    let stdout = stdout_of(&["check", "--kind=int", "--minimum=0", "--maximum=10", "4"]);
    assert_eq!(stdout.trim(), "BoundedValue(4 in 0 ..= 10)");

    let stderr = stderr_of_failure(&["check", "--kind=int", "--maximum=10", "11"]);
    assert_eq!(stderr.trim(), "ERROR: value 11 is out of bounds None ..= 10");
}

#[test]
fn rejects_unparseable_bounds() {
    let stderr = stderr_of_failure(&["clamp", "--kind=int", "--minimum=zero", "4"]);
    assert!(stderr.contains("--minimum"), "stderr: {}", stderr);
}
