//! Constants used in the deploy scripts

/// The contract deployed when none is given
pub const DEFAULT_CONTRACT: &str = "AnomalyLogger";

/// Solidity compiler version the contracts are written against
pub const DEFAULT_SOLIDITY_VERSION: &str = "0.8.0";

/// Name of the local development network
pub const DEFAULT_NETWORK: &str = "ganache";

/// Default RPC endpoint, a local ganache node
pub const DEFAULT_RPC: &str = "http://127.0.0.1:8545";

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "anomaly.toml";

/// Where deployed addresses are recorded, relative to the project root
pub const DEPLOYMENTS_FILE: &str = "deployments.json";

/// Default project directories
pub const DEFAULT_SOURCES_DIR: &str = "./contracts";
pub const DEFAULT_TESTS_DIR: &str = "./test";
pub const DEFAULT_CACHE_DIR: &str = "./cache";
pub const DEFAULT_ARTIFACTS_DIR: &str = "./artifacts";

/// Sub directory of the artifacts holding raw compiler output
pub const BUILD_INFO_DIR: &str = "build-info";

/// Format marker written in each artifact
pub const ARTIFACT_FORMAT: &str = "hh-sol-artifact-1";

/// Gas limit used for `logAnomaly` transactions
pub const LOG_ANOMALY_GAS_LIMIT: u64 = 3_000_000;

/// How long to wait for a transaction receipt, in seconds
pub const CONFIRMATION_TIMEOUT_SECS: u64 = 120;

/// The solc binary looked up on the `PATH`
pub const SOLC_BINARY: &str = "solc";

/// Delay between two receipt lookups, in milliseconds
pub const RECEIPT_POLL_INTERVAL_MS: u64 = 250;
