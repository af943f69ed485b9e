use std::{fmt::LowerHex, fs, path::Path};

use json::JsonValue;

use crate::errors::ScriptError;

/// Keys of the deployments file, scoped by network then contract
pub enum OutputKeys<'a> {
    // Address of a deployed contract
    Deployment { network: &'a str, contract: &'a str },
    // Hash of the tx that deployed it
    DeploymentTx { network: &'a str, contract: &'a str },
}

impl OutputKeys<'_> {
    /// Path of the key inside the json document
    fn path(&self) -> (&str, &str, &'static str) {
        match *self {
            OutputKeys::Deployment { network, contract } => (network, contract, "deploy"),
            OutputKeys::DeploymentTx { network, contract } => (network, contract, "tx"),
        }
    }
}

/// Read a value from the output file
pub fn read_output_file(file_path: &Path, key: OutputKeys) -> Result<String, ScriptError> {
    if !file_path.exists() {
        return Err(ScriptError::JsonOutputError(format!(
            "deployments file {} not found",
            file_path.display()
        )));
    }

    // Parse it's json content into objects
    let parsed_json = get_json_from_file(file_path)?;
    let (network, contract, field) = key.path();

    parsed_json[network][contract][field]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| {
            ScriptError::JsonOutputError(format!(
                "no `{field}` entry for {contract} on {network} in {}",
                file_path.display()
            ))
        })
}

/// Writes the given values in the output file, keeping the other entries.
/// All values land in a single write.
pub fn write_output_file(
    file_path: &Path,
    entries: &[(OutputKeys, &dyn LowerHex)],
) -> Result<(), ScriptError> {
    // If the file doesn't exist, start from an empty document
    let mut parsed_json = if file_path.exists() {
        get_json_from_file(file_path)?
    } else {
        JsonValue::new_object()
    };

    // Update the right keys
    for (key, value) in entries {
        let (network, contract, field) = key.path();
        parsed_json[network][contract][field] = JsonValue::String(format!("{value:#x}"));
    }

    // Write the updated json back to the file
    fs::write(file_path, json::stringify_pretty(parsed_json, 4))
        .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;

    Ok(())
}

/// Parses the JSON file at the given path
fn get_json_from_file(file_path: &Path) -> Result<JsonValue, ScriptError> {
    let file_contents =
        fs::read_to_string(file_path).map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;

    json::parse(&file_contents).map_err(|e| ScriptError::JsonOutputError(e.to_string()))
}
