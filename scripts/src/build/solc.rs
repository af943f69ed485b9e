use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use json::JsonValue;
use tracing::info;

use crate::{
    config::ScriptConfig,
    constants::{ARTIFACT_FORMAT, SOLC_BINARY},
    errors::ScriptError,
    utils::command_output_or,
};

/// Compiles the project sources with a local `solc`, writing one artifact per contract
pub struct SolcBuilder {
    /// The solc binary to invoke
    solc: PathBuf,
    /// The version the sources are written against
    version: String,
}

impl SolcBuilder {
    /// Builder for the version declared in the config, using the `solc` on the `PATH`
    pub fn new(version: &str) -> Self {
        Self {
            solc: PathBuf::from(SOLC_BINARY),
            version: version.to_string(),
        }
    }

    /// Use a specific solc binary
    pub fn with_solc(mut self, solc: PathBuf) -> Self {
        self.solc = solc;
        self
    }

    /// Full build of the project sources, returning the written artifacts
    pub fn build(&self, config: &ScriptConfig) -> Result<Vec<PathBuf>, ScriptError> {
        self.check_version()?;

        let mut sources = Vec::new();
        collect_sources(&config.sources_dir(), &mut sources)?;
        if sources.is_empty() {
            return Err(ScriptError::ContractCompilation(format!(
                "no solidity sources found in {}",
                config.sources_dir().display()
            )));
        }
        sources.sort();
        // Pass paths relative to the root so they end up as source names
        let sources = sources
            .iter()
            .map(|s| s.strip_prefix(&config.root).unwrap_or(s).to_path_buf())
            .collect::<Vec<_>>();
        info!("Compiling {} source file(s) with solc {}", sources.len(), self.version);

        let mut build_cmd = Command::new(&self.solc);
        build_cmd.stdin(Stdio::null());
        build_cmd.current_dir(&config.root);
        build_cmd.args(["--combined-json", "abi,bin,bin-runtime"]);
        build_cmd.args(&sources);
        let output = command_output_or(build_cmd, "Failed to compile contracts")?;

        let artifacts = parse_combined_json(&output)?;
        let artifacts_dir = config.artifacts_dir();
        let mut written = Vec::with_capacity(artifacts.len());
        for (source_name, contract_name, artifact) in artifacts {
            let dir = artifacts_dir.join(&source_name);
            fs::create_dir_all(&dir)
                .map_err(|e| ScriptError::ContractCompilation(e.to_string()))?;
            let path = dir.join(format!("{contract_name}.json"));
            fs::write(&path, json::stringify_pretty(artifact, 2))
                .map_err(|e| ScriptError::ContractCompilation(e.to_string()))?;
            written.push(path);
        }

        Ok(written)
    }

    /// Ensure the local solc matches the configured version
    fn check_version(&self) -> Result<(), ScriptError> {
        let mut version_cmd = Command::new(&self.solc);
        version_cmd.arg("--version");
        let output = command_output_or(version_cmd, "Failed to run solc")?;

        let found = parse_solc_version(&output).ok_or_else(|| {
            ScriptError::ContractCompilation(String::from("Could not read solc version"))
        })?;
        if found != self.version {
            return Err(ScriptError::ContractCompilation(format!(
                "solc {found} found, but the config expects {}",
                self.version
            )));
        }

        Ok(())
    }
}

/// Extract the `x.y.z` version from the output of `solc --version`
fn parse_solc_version(output: &str) -> Option<String> {
    let line = output.lines().find(|l| l.starts_with("Version:"))?;
    let version = line.trim_start_matches("Version:").trim();
    let end = version
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(version.len());
    (end > 0).then(|| version[..end].to_string())
}

/// Turn solc's `--combined-json` output into artifacts, keyed by source and contract name
fn parse_combined_json(output: &str) -> Result<Vec<(String, String, JsonValue)>, ScriptError> {
    let parsed =
        json::parse(output).map_err(|e| ScriptError::ContractCompilation(e.to_string()))?;

    let mut artifacts = Vec::new();
    for (key, contract) in parsed["contracts"].entries() {
        let Some((source_name, contract_name)) = key.rsplit_once(':') else {
            continue;
        };

        // Older solc releases embed the abi as a string
        let abi = match contract["abi"].as_str() {
            Some(raw) => {
                json::parse(raw).map_err(|e| ScriptError::ContractCompilation(e.to_string()))?
            }
            None => contract["abi"].clone(),
        };

        let mut artifact = JsonValue::new_object();
        artifact["_format"] = ARTIFACT_FORMAT.into();
        artifact["contractName"] = contract_name.into();
        artifact["sourceName"] = source_name.into();
        artifact["abi"] = abi;
        artifact["bytecode"] =
            format!("0x{}", contract["bin"].as_str().unwrap_or_default()).into();
        artifact["deployedBytecode"] =
            format!("0x{}", contract["bin-runtime"].as_str().unwrap_or_default()).into();
        artifact["linkReferences"] = JsonValue::new_object();
        artifact["deployedLinkReferences"] = JsonValue::new_object();
        artifacts.push((source_name.to_string(), contract_name.to_string(), artifact));
    }

    Ok(artifacts)
}

/// Recursively collect the `.sol` files of a directory
fn collect_sources(dir: &Path, found: &mut Vec<PathBuf>) -> Result<(), ScriptError> {
    let entries = fs::read_dir(dir).map_err(|e| {
        ScriptError::ContractCompilation(format!("{}: {e}", dir.display()))
    })?;

    for entry in entries.flatten() {
        let path = entry.path();
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        if file_type.is_dir() {
            collect_sources(&path, found)?;
        } else if path.extension().is_some_and(|ext| ext == "sol") {
            found.push(path);
        }
    }

    Ok(())
}
