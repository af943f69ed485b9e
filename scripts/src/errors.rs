//! Definitions of errors that can occur during the execution of the contract management scripts

use std::path::PathBuf;

use alloy::primitives::TxHash;
use thiserror::Error;

/// Errors that can occur during the execution of the contract management scripts
#[derive(Debug, Error)]
pub enum ScriptError {
    /// Error reading or parsing the configuration file
    #[error("error reading config: {0}")]
    Config(String),
    /// The requested network is not declared in the configuration
    #[error("network `{0}` is not declared in the config")]
    UnknownNetwork(String),
    /// No compiled artifact matches the requested contract
    #[error("no artifact found for contract `{0}`, did you compile it?")]
    ArtifactNotFound(String),
    /// More than one compiled artifact matches the requested contract
    #[error("multiple artifacts found for contract `{name}`: {candidates:?}, use a fully qualified name")]
    AmbiguousArtifact {
        /// The requested contract name
        name: String,
        /// The matching artifact files
        candidates: Vec<PathBuf>,
    },
    /// The artifact exists but can't be used for a deployment
    #[error("invalid artifact {path}: {reason}")]
    InvalidArtifact {
        /// The artifact file
        path: PathBuf,
        /// Why it was rejected
        reason: String,
    },
    /// Error when building output file
    #[error("error writing json output: {0}")]
    JsonOutputError(String),
    /// Error when creating the client
    #[error("error during client init: {0}")]
    ClientInitialization(String),
    /// Error deploying a contract
    #[error("error deploying contract: {0}")]
    ContractDeployment(String),
    /// Error compiling a contract
    #[error("error compiling contract: {0}")]
    ContractCompilation(String),
    /// Error calling a contract method
    #[error("error interacting with contract: {0}")]
    ContractInteraction(String),
    /// The transaction was mined but reverted
    #[error("transaction {0} reverted")]
    TransactionReverted(TxHash),
    /// The transaction wasn't confirmed in time
    #[error("transaction {tx_hash} not confirmed after {secs}s")]
    ConfirmationTimeout {
        /// The pending transaction
        tx_hash: TxHash,
        /// How long we waited
        secs: u64,
    },
}
