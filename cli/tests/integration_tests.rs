//! Integration tests for the magpie CLI.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn parse_script_file() {
    let mut cmd = Command::cargo_bin("magpie").unwrap();
    let assert = cmd
        .arg(format!("{}/fixtures/script.mp", env!("CARGO_MANIFEST_DIR")))
        .assert();
    assert
        .success()
        .stdout("let x = 5let add = fn(a, b) {return (a + b);}add(x, 3)\n");
}

#[test]
fn syntax_errors_go_to_stderr_with_exit_code_2() {
    let mut cmd = Command::cargo_bin("magpie").unwrap();
    let assert = cmd
        .arg(format!("{}/fixtures/bad.mp", env!("CARGO_MANIFEST_DIR")))
        .assert();
    assert
        .code(2)
        .stderr(predicate::str::contains(
            "expected next token to be IDENTIFIER, got ASSIGN instead",
        ))
        .stdout("");
}

#[test]
fn token_dump_mode() {
    let mut cmd = Command::cargo_bin("magpie").unwrap();
    let assert = cmd
        .arg("--tokens")
        .arg(format!("{}/fixtures/script.mp", env!("CARGO_MANIFEST_DIR")))
        .assert();
    assert
        .success()
        .stdout(predicate::str::contains("1:1 LET 'let'"))
        .stdout(predicate::str::contains("2:11 FUNCTION 'fn'"))
        .stdout(predicate::str::contains("EOF ''"));
}

#[test]
fn stdin_expression() {
    let mut cmd = Command::cargo_bin("magpie").unwrap();
    let assert = cmd.write_stdin("1 + 2").assert();
    assert.success().stdout("(1 + 2)\n");
}

#[test]
fn stdin_empty() {
    let mut cmd = Command::cargo_bin("magpie").unwrap();
    let assert = cmd.write_stdin("").assert();
    assert.success().stdout("\n");
}

#[test]
fn missing_file_reports_exit_code_1() {
    let mut cmd = Command::cargo_bin("magpie").unwrap();
    let assert = cmd.arg("no-such-file.mp").assert();
    assert
        .code(1)
        .stderr(predicate::str::contains("Error reading file"));
}
