use assert_cmd::Command;
use predicates::prelude::*;

#[allow(deprecated)]
fn mfaguard_cmd() -> Command {
    Command::cargo_bin("mfaguard").expect("mfaguard binary")
}

#[test]
fn help_works() {
    mfaguard_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("explain"));
}

#[test]
fn check_requires_an_account_source() {
    mfaguard_cmd()
        .arg("check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--accounts"));
}

#[test]
fn accounts_and_synthetic_conflict() {
    mfaguard_cmd()
        .args(["check", "--accounts", "a.json", "--synthetic", "10"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}
