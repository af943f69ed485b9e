//! Loading of compiled contract artifacts.
//!
//! Artifacts follow the Hardhat layout: one JSON file per contract, stored at
//! `<artifacts>/<source path>/<ContractName>.json`, next to a `.dbg.json`
//! file we ignore.

use std::{
    fs,
    path::{Path, PathBuf},
};

use alloy::{hex, primitives::Bytes};
use json::JsonValue;
use tracing::debug;

use crate::{constants::BUILD_INFO_DIR, errors::ScriptError};

/// A compiled contract, ready to be deployed
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub contract_name: String,
    pub source_name: String,
    pub abi: JsonValue,
    pub bytecode: Bytes,
    /// File it was loaded from
    pub path: PathBuf,
}

impl ContractArtifact {
    /// Parse an artifact file
    pub fn from_file(path: &Path) -> Result<Self, ScriptError> {
        let invalid = |reason: String| ScriptError::InvalidArtifact {
            path: path.to_path_buf(),
            reason,
        };

        let content = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let parsed = json::parse(&content).map_err(|e| invalid(e.to_string()))?;

        let contract_name = parsed["contractName"]
            .as_str()
            .ok_or_else(|| invalid("missing `contractName`".to_string()))?
            .to_string();
        let source_name = parsed["sourceName"].as_str().unwrap_or_default().to_string();

        let abi = parsed["abi"].clone();
        if !abi.is_array() {
            return Err(invalid("missing `abi`".to_string()));
        }

        let raw_bytecode = parsed["bytecode"]
            .as_str()
            .ok_or_else(|| invalid("missing `bytecode`".to_string()))?;
        // Unlinked library references are left as `__$<hash>$__` placeholders
        if raw_bytecode.contains("__") {
            return Err(invalid("bytecode has unlinked library references".to_string()));
        }
        let bytecode = hex::decode(raw_bytecode).map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            contract_name,
            source_name,
            abi,
            bytecode: bytecode.into(),
            path: path.to_path_buf(),
        })
    }

    /// Number of arguments the constructor expects
    pub fn constructor_inputs(&self) -> usize {
        self.abi
            .members()
            .find(|item| item["type"] == "constructor")
            .map(|constructor| constructor["inputs"].len())
            .unwrap_or(0)
    }

    /// Check the artifact can be deployed without arguments
    pub fn ensure_deployable(&self) -> Result<(), ScriptError> {
        let invalid = |reason: String| ScriptError::InvalidArtifact {
            path: self.path.clone(),
            reason,
        };

        if self.bytecode.is_empty() {
            return Err(invalid(format!(
                "`{}` has no bytecode, is it abstract or an interface?",
                self.contract_name
            )));
        }

        let inputs = self.constructor_inputs();
        if inputs > 0 {
            return Err(invalid(format!(
                "`{}` constructor expects {inputs} argument(s)",
                self.contract_name
            )));
        }

        Ok(())
    }
}

/// Find the artifact file of a contract.
///
/// `name` is either a bare contract name, searched for in the whole artifacts
/// tree, or a fully qualified `path/to/Source.sol:Name`.
pub fn find_artifact(artifacts_dir: &Path, name: &str) -> Result<PathBuf, ScriptError> {
    if let Some((source, contract)) = name.rsplit_once(':') {
        let path = artifacts_dir.join(source).join(format!("{contract}.json"));
        return path
            .is_file()
            .then_some(path)
            .ok_or_else(|| ScriptError::ArtifactNotFound(name.to_string()));
    }

    let file_name = format!("{name}.json");
    let mut candidates = Vec::new();
    collect_artifacts(artifacts_dir, &file_name, &mut candidates);
    candidates.sort();

    match candidates.len() {
        0 => Err(ScriptError::ArtifactNotFound(name.to_string())),
        1 => Ok(candidates.remove(0)),
        _ => Err(ScriptError::AmbiguousArtifact {
            name: name.to_string(),
            candidates,
        }),
    }
}

/// Find, parse and validate the artifact of a contract
pub fn load_artifact(artifacts_dir: &Path, name: &str) -> Result<ContractArtifact, ScriptError> {
    let path = find_artifact(artifacts_dir, name)?;
    debug!("Using artifact {}", path.display());

    let artifact = ContractArtifact::from_file(&path)?;
    artifact.ensure_deployable()?;

    Ok(artifact)
}

/// Recursively collect the files named `file_name`, skipping raw compiler output.
/// Symlinked directories are not followed.
fn collect_artifacts(dir: &Path, file_name: &str, found: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            if path.file_name().is_some_and(|n| n == BUILD_INFO_DIR) {
                continue;
            }
            collect_artifacts(&path, file_name, found);
        } else if path.file_name().is_some_and(|n| n == file_name) {
            found.push(path);
        }
    }
}
