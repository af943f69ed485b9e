//! Implementations of the CLI commands

use std::time::Duration;

use alloy::primitives::Address;
use chrono::Utc;
use tracing::{info, warn};

use crate::{
    artifacts::load_artifact,
    build::solc::SolcBuilder,
    cli::{AnomaliesArgs, CompileArgs, DeployArgs, LogAnomalyArgs},
    config::ScriptConfig,
    deploy::{deploy_contract, Deployment},
    errors::ScriptError,
    output_writer::{read_output_file, write_output_file, OutputKeys},
    tx::{
        client::{create_rpc_client, RpcClient},
        reader::get_all_anomalies,
        sender::{send_log_anomaly, NewAnomaly},
    },
    utils::parse_address,
};

/// Everything a command needs to know about its environment
pub struct ScriptContext {
    pub config: ScriptConfig,
    /// Name of the selected network
    pub network: String,
    pub rpc_url: String,
    /// Signing key, when not relying on the node's accounts
    pub priv_key: Option<String>,
}

impl ScriptContext {
    /// Resolve the selected network. An explicit rpc url or private key wins
    /// over the network config.
    pub fn new(
        config: ScriptConfig,
        network: &str,
        rpc_url: Option<String>,
        priv_key: Option<String>,
    ) -> Result<Self, ScriptError> {
        let network_config = config.network(network)?;
        let rpc_url = rpc_url.unwrap_or_else(|| network_config.url.clone());
        let priv_key = priv_key.or_else(|| network_config.accounts.first().cloned());

        Ok(Self {
            network: network.to_string(),
            rpc_url,
            priv_key,
            config,
        })
    }

    /// Connect to the selected network
    pub async fn client(&self) -> Result<RpcClient, ScriptError> {
        info!("Connecting to {} at {}", self.network, self.rpc_url);
        create_rpc_client(&self.rpc_url, self.priv_key.as_deref()).await
    }

    /// Address of a contract: the given one, or the recorded deployment on this network
    fn contract_address(&self, address: Option<&str>, contract: &str) -> Result<Address, ScriptError> {
        match address {
            Some(address) => parse_address(address),
            None => {
                let recorded = read_output_file(
                    &self.config.deployments_file(),
                    OutputKeys::Deployment {
                        network: &self.network,
                        contract,
                    },
                )?;
                parse_address(&recorded)
            }
        }
    }
}

/// Deploy a contract, the equivalent of the original deploy script
pub async fn deploy_contracts(
    args: DeployArgs,
    ctx: &ScriptContext,
) -> Result<Deployment, ScriptError> {
    // Resolve the artifact first, nothing is sent if it's unusable
    let artifact = load_artifact(&ctx.config.artifacts_dir(), &args.contract)?;
    info!("Loaded {} from {}", artifact.contract_name, artifact.path.display());

    let client = ctx.client().await?;

    // Deploy it
    info!("Deploying {}...", artifact.contract_name);
    let deployment =
        deploy_contract(&artifact, &client, Duration::from_secs(args.timeout)).await?;
    info!("Deployed with success");

    if args.no_save {
        return Ok(deployment);
    }

    // Save the deployed address
    let deployments_file = ctx.config.deployments_file();
    let contract = deployment.contract_name.as_str();
    let network = ctx.network.as_str();
    write_output_file(
        &deployments_file,
        &[
            (OutputKeys::Deployment { network, contract }, &deployment.address),
            (OutputKeys::DeploymentTx { network, contract }, &deployment.tx_hash),
        ],
    )?;
    info!("Recorded deployment in {}", deployments_file.display());

    Ok(deployment)
}

/// Compile the project sources
pub fn compile_contracts(args: CompileArgs, config: &ScriptConfig) -> Result<(), ScriptError> {
    let mut builder = SolcBuilder::new(&config.solidity);
    if let Some(solc) = args.solc {
        builder = builder.with_solc(solc);
    }

    info!("Building contracts...");
    let artifacts = builder.build(config)?;
    for artifact in &artifacts {
        info!("Wrote {}", artifact.display());
    }
    info!("Built {} artifact(s) with success", artifacts.len());

    Ok(())
}

/// Log an anomaly on a deployed contract
pub async fn log_anomaly(args: LogAnomalyArgs, ctx: &ScriptContext) -> Result<(), ScriptError> {
    let contract = ctx.contract_address(args.address.as_deref(), &args.contract)?;
    let client = ctx.client().await?;

    let anomaly = NewAnomaly {
        timestamp: args.timestamp.unwrap_or_else(|| Utc::now().timestamp().unsigned_abs()),
        sensor_id: args.sensor_id,
        data_value: args.value,
        anomaly_type: args.anomaly_type,
        explanation: args.explanation,
    };
    info!(
        "Logging: timestamp={}, sensor_id='{}', value={}, type='{}'",
        anomaly.timestamp, anomaly.sensor_id, anomaly.data_value, anomaly.anomaly_type
    );

    let tx_hash =
        send_log_anomaly(contract, anomaly, &client, Duration::from_secs(args.timeout)).await?;
    println!("Anomaly logged in tx {tx_hash}");

    Ok(())
}

/// Print every anomaly logged on a deployed contract
pub async fn list_anomalies(args: AnomaliesArgs, ctx: &ScriptContext) -> Result<(), ScriptError> {
    let contract = ctx.contract_address(args.address.as_deref(), &args.contract)?;
    let client = ctx.client().await?;

    let anomalies = get_all_anomalies(contract, client.provider).await?;

    if args.json {
        let output = serde_json::to_string_pretty(&anomalies)
            .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;
        println!("{output}");
        return Ok(());
    }

    if anomalies.is_empty() {
        warn!("No anomalies logged on the contract yet");
        return Ok(());
    }

    println!("Found {} anomalies:", anomalies.len());
    for (i, anomaly) in anomalies.iter().enumerate() {
        println!("Anomaly {}:", i + 1);
        println!("  Timestamp: {} ({})", anomaly.timestamp, anomaly.datetime);
        println!("  Sensor ID: {}", anomaly.sensor_id);
        println!("  Value: {}", anomaly.data_value);
        println!("  Type: {}", anomaly.anomaly_type);
        println!("  Explanation: {}", anomaly.explanation);
    }

    Ok(())
}
