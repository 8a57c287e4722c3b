use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_version_prints_json() {
    let output = Command::cargo_bin("gojo").unwrap().arg("version").output().unwrap();
    assert!(output.status.success());

    let info: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(info["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(info["os"], std::env::consts::OS);
    assert_eq!(info["arch"], std::env::consts::ARCH);
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("gojo")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_command_fails() {
    Command::cargo_bin("gojo").unwrap().arg("deploy").assert().failure();
}
