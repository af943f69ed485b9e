//! Project configuration: compiler version, networks and directory layout.
//!
//! Every field has a default matching the local ganache setup, so running
//! without a config file works out of the box. A TOML file only needs to
//! declare what differs:
//!
//! ```toml
//! solidity = "0.8.24"
//!
//! [networks.sepolia]
//! url = "https://rpc.sepolia.org"
//! accounts = ["0x..."]
//!
//! [paths]
//! artifacts = "./out"
//! ```

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::debug;

use crate::{
    constants::{
        DEFAULT_ARTIFACTS_DIR, DEFAULT_CACHE_DIR, DEFAULT_CONFIG_FILE, DEFAULT_NETWORK,
        DEFAULT_RPC, DEFAULT_SOLIDITY_VERSION, DEFAULT_SOURCES_DIR, DEFAULT_TESTS_DIR,
        DEPLOYMENTS_FILE,
    },
    errors::ScriptError,
};

/// A network the scripts can talk to
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint of the node
    pub url: String,
    /// Private keys to sign with. Empty means the node's unlocked accounts are used.
    #[serde(default)]
    pub accounts: Vec<String>,
}

/// Directories of the project, relative to the project root unless absolute
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProjectPaths {
    pub sources: PathBuf,
    pub tests: PathBuf,
    pub cache: PathBuf,
    pub artifacts: PathBuf,
}

impl Default for ProjectPaths {
    fn default() -> Self {
        Self {
            sources: PathBuf::from(DEFAULT_SOURCES_DIR),
            tests: PathBuf::from(DEFAULT_TESTS_DIR),
            cache: PathBuf::from(DEFAULT_CACHE_DIR),
            artifacts: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
        }
    }
}

/// The resolved configuration of the scripts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptConfig {
    /// Expected solc version
    pub solidity: String,
    /// Known networks, by name
    pub networks: BTreeMap<String, NetworkConfig>,
    /// Project layout
    pub paths: ProjectPaths,
    /// Directory the relative paths are resolved from
    pub root: PathBuf,
}

/// Shape of the TOML file, everything optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    solidity: Option<String>,
    #[serde(default)]
    networks: BTreeMap<String, NetworkConfig>,
    paths: Option<ProjectPaths>,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        let mut networks = BTreeMap::new();
        networks.insert(
            DEFAULT_NETWORK.to_string(),
            NetworkConfig {
                url: DEFAULT_RPC.to_string(),
                accounts: Vec::new(),
            },
        );

        Self {
            solidity: DEFAULT_SOLIDITY_VERSION.to_string(),
            networks,
            paths: ProjectPaths::default(),
            root: PathBuf::from("."),
        }
    }
}

impl ScriptConfig {
    /// Load the config.
    ///
    /// With an explicit `path` the file must exist. Without one, `anomaly.toml`
    /// in the working directory is used if present, the defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ScriptError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default_path.exists() {
                    debug!("No {DEFAULT_CONFIG_FILE} found, using default config");
                    return Ok(Self::default());
                }
                default_path
            }
        };

        let content = fs::read_to_string(&path)
            .map_err(|e| ScriptError::Config(format!("{}: {e}", path.display())))?;
        let mut config = Self::from_toml_str(&content)?;

        // Relative paths are relative to the config file
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            config.root = parent.to_path_buf();
        }
        debug!("Loaded config from {}", path.display());

        Ok(config)
    }

    /// Parse a TOML document on top of the defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ScriptError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ScriptError::Config(e.to_string()))?;

        let mut config = Self::default();
        if let Some(solidity) = file.solidity {
            config.solidity = solidity;
        }
        // Declared networks are added to, or replace, the built-in ones
        config.networks.extend(file.networks);
        if let Some(paths) = file.paths {
            config.paths = paths;
        }

        Ok(config)
    }

    /// Get a network by name
    pub fn network(&self, name: &str) -> Result<&NetworkConfig, ScriptError> {
        self.networks
            .get(name)
            .ok_or_else(|| ScriptError::UnknownNetwork(name.to_string()))
    }

    /// Directory holding the solidity sources
    pub fn sources_dir(&self) -> PathBuf {
        self.root.join(&self.paths.sources)
    }

    /// Directory holding the compiled artifacts
    pub fn artifacts_dir(&self) -> PathBuf {
        self.root.join(&self.paths.artifacts)
    }

    /// File recording the deployed addresses
    pub fn deployments_file(&self) -> PathBuf {
        self.root.join(DEPLOYMENTS_FILE)
    }
}
