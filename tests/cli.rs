//! CLI regression tests.
//!
//! Requires: assert_cmd, predicates crates in [dev-dependencies].

#![cfg(unix)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;

fn write_suite(root: &Path, ids: &[&str]) {
    fs::write(root.join("Makefile"), format!("all: {}\n", ids.join(" "))).unwrap();
    fs::create_dir_all(root.join("bin")).unwrap();
}

fn write_case(root: &Path, id: &str, host_src: &str, device_src: &str, script_body: &str) {
    use std::os::unix::fs::PermissionsExt;
    let case_dir = root.join(id);
    fs::create_dir_all(&case_dir).unwrap();
    fs::write(case_dir.join(format!("host_{id}.c")), host_src).unwrap();
    fs::write(case_dir.join(format!("e_{id}.c")), device_src).unwrap();
    let bin = root.join("bin").join(format!("host_{id}"));
    fs::write(&bin, format!("#!/bin/sh\n{script_body}\n")).unwrap();
    fs::set_permissions(&bin, fs::Permissions::from_mode(0o755)).unwrap();
}

fn harness() -> Command {
    Command::cargo_bin("ebsp_test").unwrap()
}

#[test]
fn passing_suite_prints_the_success_sentinel() {
    let dir = tempfile::tempdir().unwrap();
    write_suite(dir.path(), &["hello"]);
    write_case(
        dir.path(),
        "hello",
        "// expect: (Hello)\n",
        "// expect: (World)\n",
        "printf 'World\\nHello\\n'",
    );

    harness()
        .arg("run")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(
            contains("Testing hello...")
                .and(contains("All 1 tests passed"))
                .and(contains("Unit tests SUCCESS")),
        );
}

#[test]
fn failing_suite_prints_the_failure_sentinel_and_diff() {
    let dir = tempfile::tempdir().unwrap();
    write_suite(dir.path(), &["greet"]);
    write_case(
        dir.path(),
        "greet",
        "// expect: (Hello)\n",
        "",
        "printf 'Goodbye\\n'",
    );

    harness()
        .arg("run")
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stdout(
            contains("Unit tests FAILURE")
                .and(contains("- Hello"))
                .and(contains("+ Goodbye")),
        );
}

#[test]
fn missing_build_description_is_fatal_with_a_diagnostic() {
    let dir = tempfile::tempdir().unwrap();

    harness()
        .arg("run")
        .arg(dir.path())
        .assert()
        .failure()
        .code(2)
        .stderr(contains("cannot read build description"));
}

#[test]
fn list_prints_ids_in_declared_order_and_flags_strays() {
    let dir = tempfile::tempdir().unwrap();
    write_suite(dir.path(), &["bsp_pid", "bsp_init"]);
    write_case(dir.path(), "bsp_pid", "", "", "true");
    write_case(dir.path(), "bsp_init", "", "", "true");
    // A case directory that nobody declared.
    let stray = dir.path().join("bsp_forgotten");
    fs::create_dir_all(&stray).unwrap();
    fs::write(stray.join("e_bsp_forgotten.c"), "").unwrap();

    harness()
        .arg("list")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("bsp_pid\nbsp_init\n"))
        .stderr(contains("bsp_forgotten"));
}

#[test]
fn expected_subcommand_prints_the_expansion() {
    let dir = tempfile::tempdir().unwrap();
    write_suite(dir.path(), &["pids"]);
    write_case(dir.path(), "pids", "// expect: (Done)\n", "// expect_for_pid: (pid)\n", "true");

    harness()
        .args(["expected", "pids", "--nprocs", "2", "--root"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(contains("00: 0\n01: 1\nDone\n"));
}

#[test]
fn json_report_follows_the_human_summary() {
    let dir = tempfile::tempdir().unwrap();
    write_suite(dir.path(), &["ok"]);
    write_case(dir.path(), "ok", "// expect: (fine)\n", "", "echo fine");

    harness()
        .args(["run", "--json"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(
            contains("Unit tests SUCCESS")
                .and(contains("\"success\": true"))
                .and(contains("\"status\": \"passed\"")),
        );
}

#[test]
fn strict_lines_flag_rejects_collapsed_equivalence() {
    let dir = tempfile::tempdir().unwrap();
    write_suite(dir.path(), &["wrap"]);
    write_case(
        dir.path(),
        "wrap",
        "// expect: (Hello)\n// expect: (World)\n",
        "",
        "printf 'HelloWorld\\n'",
    );

    harness()
        .arg("run")
        .arg(dir.path())
        .assert()
        .success();

    harness()
        .args(["run", "--strict-lines"])
        .arg(dir.path())
        .assert()
        .failure()
        .code(1);
}
