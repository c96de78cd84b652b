//! Integration tests for the TACode CLI.
//!
//! These tests invoke the `tacode` binary as a subprocess and check
//! exit statuses, stdout, and stderr.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[allow(deprecated)]
fn tacode() -> Command {
    Command::cargo_bin("tacode").unwrap()
}

/// Write a source file into the temp dir and return its path.
fn source_file(dir: &TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("program.tacode");
    fs::write(&path, content).unwrap();
    path
}

// ---- Usage ----

#[test]
fn no_args_is_status_10() {
    tacode()
        .assert()
        .failure()
        .code(10)
        .stderr(predicate::str::contains("Usage: tacode"));
}

#[test]
fn help_flag_exits_0() {
    tacode()
        .arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::contains("Usage: tacode"));
}

#[test]
fn unknown_argument_is_status_10() {
    tacode()
        .arg("--frobnicate")
        .assert()
        .code(10)
        .stderr(predicate::str::contains("unknown argument"));
}

#[test]
fn source_flag_without_value_is_status_10() {
    tacode().arg("--source").assert().code(10);
}

#[test]
fn unreadable_source_file_is_status_11() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.tacode");
    tacode()
        .arg("--source")
        .arg(&missing)
        .assert()
        .code(11)
        .stderr(predicate::str::contains("cannot read"));
}

// ---- Parsing ----

#[test]
fn missing_header_is_status_31() {
    let dir = TempDir::new().unwrap();
    let src = source_file(&dir, "WRITE string@hi\n");
    tacode().arg("--source").arg(&src).assert().code(31);
}

#[test]
fn invalid_utf8_source_is_status_31() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.tacode");
    fs::write(&path, b".TACODE\nWRITE string@\xff\xfe\n").unwrap();
    tacode()
        .arg("--source")
        .arg(&path)
        .assert()
        .code(31)
        .stderr(predicate::str::contains("UTF-8"));
}

#[test]
fn unknown_opcode_is_status_32() {
    let dir = TempDir::new().unwrap();
    let src = source_file(&dir, ".TACODE\nFLY GF@x\n");
    tacode()
        .arg("--source")
        .arg(&src)
        .assert()
        .code(32)
        .stderr(predicate::str::contains("unknown opcode"));
}

// ---- Execution ----

#[test]
fn program_output_goes_to_stdout() {
    let dir = TempDir::new().unwrap();
    let src = source_file(
        &dir,
        ".TACODE
        DEFVAR GF@x
        MOVE GF@x int@40
        ADD GF@x GF@x int@2
        WRITE GF@x
        WRITE string@\\010",
    );
    tacode()
        .arg("--source")
        .arg(&src)
        .write_stdin("")
        .assert()
        .success()
        .stdout("42\n");
}

#[test]
fn exit_status_is_the_programs_exit_code() {
    let dir = TempDir::new().unwrap();
    let src = source_file(&dir, ".TACODE\nEXIT int@7\n");
    tacode()
        .arg("--source")
        .arg(&src)
        .write_stdin("")
        .assert()
        .code(7);
}

#[test]
fn runtime_error_status_and_message() {
    let dir = TempDir::new().unwrap();
    let src = source_file(&dir, ".TACODE\nWRITE GF@ghost\n");
    tacode()
        .arg("--source")
        .arg(&src)
        .write_stdin("")
        .assert()
        .code(54)
        .stderr(predicate::str::contains("undeclared variable"));
}

#[test]
fn input_file_feeds_read() {
    let dir = TempDir::new().unwrap();
    let src = source_file(
        &dir,
        ".TACODE
        DEFVAR GF@n
        READ GF@n int
        ADD GF@n GF@n int@1
        WRITE GF@n",
    );
    let input = dir.path().join("values.txt");
    fs::write(&input, "41\n").unwrap();
    tacode()
        .arg("--source")
        .arg(&src)
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stdout("42");
}

#[test]
fn source_defaults_to_stdin_when_only_input_is_given() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("values.txt");
    fs::write(&input, "hello\n").unwrap();
    tacode()
        .arg("--input")
        .arg(&input)
        .write_stdin(".TACODE\nDEFVAR GF@s\nREAD GF@s string\nWRITE GF@s\n")
        .assert()
        .success()
        .stdout("hello");
}

#[test]
fn equals_form_of_flags_works() {
    let dir = TempDir::new().unwrap();
    let src = source_file(&dir, ".TACODE\nWRITE string@ok\n");
    tacode()
        .arg(format!("--source={}", src.display()))
        .write_stdin("")
        .assert()
        .success()
        .stdout("ok");
}

#[test]
fn diagnostics_go_to_stderr_not_stdout() {
    let dir = TempDir::new().unwrap();
    let src = source_file(
        &dir,
        ".TACODE
        DPRINT string@trace-me
        WRITE string@payload",
    );
    tacode()
        .arg("--source")
        .arg(&src)
        .write_stdin("")
        .assert()
        .success()
        .stdout("payload")
        .stderr(predicate::str::contains("trace-me"));
}
