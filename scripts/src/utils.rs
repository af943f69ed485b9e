//! Utilities for the deploy scripts.

use std::process::Command;

use alloy::primitives::Address;
use tracing::debug;

use crate::errors::ScriptError;

/// Executes a command, returning its stdout, or an error if the command fails
pub fn command_output_or(mut cmd: Command, err_msg: &str) -> Result<String, ScriptError> {
    debug!("Running command: {:?}", cmd);
    let output = cmd
        .output()
        .map_err(|e| ScriptError::ContractCompilation(format!("{err_msg}: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ScriptError::ContractCompilation(format!(
            "{err_msg}: {}",
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parse a user supplied contract address
pub fn parse_address(value: &str) -> Result<Address, ScriptError> {
    value
        .parse::<Address>()
        .map_err(|e| ScriptError::ContractInteraction(format!("invalid address `{value}`: {e}")))
}
