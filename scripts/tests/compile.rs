#![cfg(unix)]

mod common;

use std::{fs, os::unix::fs::PermissionsExt, path::Path};

use predicates::str::contains;

use common::{TestProject, BYTECODE};

/// A `solc` stand-in reporting `version` and compiling anything to `AnomalyLogger`
fn fake_solc(dir: &Path, version: &str) -> String {
    let path = dir.join("solc");
    fs::write(
        &path,
        format!(
            r#"#!/bin/sh
if [ "$1" = "--version" ]; then
    echo "solc, the solidity compiler commandline interface"
    echo "Version: {version}+commit.c7dfd78e.Linux.g++"
    exit 0
fi
echo '{{"contracts":{{"contracts/anomaly_logger.sol:AnomalyLogger":{{"abi":[],"bin":"{bin}","bin-runtime":"602a60005260206000f3"}}}}}}'
"#,
            bin = BYTECODE.trim_start_matches("0x"),
        ),
    )
    .unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path.display().to_string()
}

fn with_sources(project: &TestProject) {
    let sources = project.root().join("contracts");
    fs::create_dir_all(&sources).unwrap();
    fs::write(sources.join("anomaly_logger.sol"), "pragma solidity ^0.8.0;").unwrap();
}

#[test]
fn compiles_into_loadable_artifacts() {
    let project = TestProject::new();
    with_sources(&project);
    let solc = fake_solc(project.root(), "0.8.0");

    project.cmd().args(["compile", "--solc", &solc]).assert().success().stdout("");

    let artifact = project
        .root()
        .join("artifacts/contracts/anomaly_logger.sol/AnomalyLogger.json");
    let artifact = json::parse(&fs::read_to_string(artifact).unwrap()).unwrap();
    assert_eq!(artifact["contractName"], "AnomalyLogger");
    assert_eq!(artifact["sourceName"], "contracts/anomaly_logger.sol");
    assert_eq!(artifact["bytecode"], BYTECODE);
}

#[test]
fn refuses_a_mismatched_compiler() {
    let project = TestProject::new();
    with_sources(&project);
    let solc = fake_solc(project.root(), "0.7.6");

    project
        .cmd()
        .args(["compile", "--solc", &solc])
        .assert()
        .code(1)
        .stderr(contains("solc 0.7.6 found, but the config expects 0.8.0"));

    assert!(!project.root().join("artifacts").exists());
}

#[test]
fn missing_compiler_is_reported() {
    let project = TestProject::new();
    with_sources(&project);

    project
        .cmd()
        .args(["compile", "--solc", "/nonexistent/solc"])
        .assert()
        .code(1)
        .stderr(contains("error compiling contract: Failed to run solc"));
}
