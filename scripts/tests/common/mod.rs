#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use assert_cmd::Command;
use httpmock::{prelude::*, Mock};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Init code deploying a contract that returns 42 from any call
pub const BYTECODE: &str = "0x600a600c600039600a6000f3602a60005260206000f3";

/// Runtime code of the above
pub const RUNTIME: &[u8] = &[0x60, 0x2a, 0x60, 0x00, 0x52, 0x60, 0x20, 0x60, 0x00, 0xf3];

/// The node's first unlocked account (anvil and ganache dev mnemonic)
pub const ACCOUNT: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

/// First contract created by `ACCOUNT`
pub const CONTRACT: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";

/// Hash of every transaction sent to the mock node
pub const TX_HASH: &str = "0xabababababababababababababababababababababababababababababababab";

/// Anvil's first pre-funded account
pub const ANVIL_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// A throwaway project directory with compiled artifacts
pub struct TestProject {
    dir: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write a Hardhat style artifact under `artifacts/contracts/<source>/<name>.json`
    pub fn with_artifact(self, source: &str, name: &str) -> Self {
        let dir = self.root().join("artifacts").join("contracts").join(source);
        fs::create_dir_all(&dir).expect("create artifacts dir");
        fs::write(
            dir.join(format!("{name}.json")),
            format!(
                r#"{{
                    "_format": "hh-sol-artifact-1",
                    "contractName": "{name}",
                    "sourceName": "contracts/{source}",
                    "abi": [],
                    "bytecode": "{BYTECODE}",
                    "deployedBytecode": "0x602a60005260206000f3",
                    "linkReferences": {{}},
                    "deployedLinkReferences": {{}}
                }}"#
            ),
        )
        .expect("write artifact");
        self
    }

    /// Record a deployment of `contract` on ganache
    pub fn with_deployment(self, contract: &str, address: &str) -> Self {
        fs::write(
            self.deployments_file(),
            format!(r#"{{"ganache":{{"{contract}":{{"deploy":"{address}","tx":"{TX_HASH}"}}}}}}"#),
        )
        .expect("write deployments");
        self
    }

    pub fn deployments_file(&self) -> PathBuf {
        self.root().join("deployments.json")
    }

    /// The scripts binary, running inside the project
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("anomaly-scripts").expect("binary built");
        cmd.current_dir(self.root())
            .env_remove("RPC_URL")
            .env_remove("PRIVATE_KEY")
            .env("RUST_LOG", "info");
        cmd
    }
}

/// A JSON-RPC node answering each method with a canned result
pub struct MockNode {
    server: MockServer,
}

impl MockNode {
    /// A node with a chain id and one unlocked account
    pub fn start() -> Self {
        let node = Self {
            server: MockServer::start(),
        };
        node.answer("eth_chainId", json!("0x539"));
        node.answer("eth_accounts", json!([ACCOUNT]));
        node
    }

    pub fn url(&self) -> String {
        self.server.base_url()
    }

    /// Answer every call to `method` with `result`
    pub fn answer(&self, method: &str, result: Value) -> Mock<'_> {
        self.answer_matching(method, "", result)
    }

    /// Answer the calls to `method` whose body contains `needle` with `result`
    pub fn answer_matching(&self, method: &str, needle: &str, result: Value) -> Mock<'_> {
        self.server.mock(|when, then| {
            when.method(POST)
                .body_contains(format!(r#""method":"{method}""#))
                .body_contains(needle);
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({ "jsonrpc": "2.0", "id": 0, "result": result }));
        })
    }

    /// Accept transactions from `ACCOUNT`: nonce 0, 1 gwei gas price
    pub fn accepting_transactions(self) -> Self {
        self.answer("eth_getTransactionCount", json!("0x0"));
        self.answer("eth_gasPrice", json!("0x3b9aca00"));
        self.answer("eth_estimateGas", json!("0x30d40"));
        self
    }
}

/// Receipt of `TX_HASH`, mined in block 1
pub fn receipt(success: bool, to: Option<&str>, contract_address: Option<&str>) -> Value {
    json!({
        "type": "0x0",
        "status": if success { "0x1" } else { "0x0" },
        "cumulativeGasUsed": "0x30d40",
        "logs": [],
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "transactionHash": TX_HASH,
        "transactionIndex": "0x0",
        "blockHash": "0x1111111111111111111111111111111111111111111111111111111111111111",
        "blockNumber": "0x1",
        "gasUsed": "0x30d40",
        "effectiveGasPrice": "0x3b9aca00",
        "from": ACCOUNT,
        "to": to,
        "contractAddress": contract_address,
    })
}
