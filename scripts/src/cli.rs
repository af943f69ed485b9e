//! Definitions of CLI arguments and commands for deploy scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::{
    commands::{compile_contracts, deploy_contracts, list_anomalies, log_anomaly, ScriptContext},
    config::ScriptConfig,
    constants::{CONFIRMATION_TIMEOUT_SECS, DEFAULT_CONTRACT, DEFAULT_NETWORK},
    errors::ScriptError,
};

/// Scripts for building, deploying & using the AnomalyLogger contract
#[derive(Parser)]
#[command(name = "anomaly-scripts", version)]
pub struct Cli {
    /// Config file, `anomaly.toml` in the working directory by default
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Network to use, as declared in the config
    #[arg(short, long, global = true, default_value = DEFAULT_NETWORK)]
    pub network: String,

    /// Network RPC URL, overriding the one from the config
    #[arg(short, long, global = true, env = "RPC_URL")]
    pub rpc_url: Option<String>,

    /// Private key of the sender, the node's first unlocked account is used otherwise
    #[arg(short, long, global = true, env = "PRIVATE_KEY", hide_env_values = true)]
    pub priv_key: Option<String>,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Resolve the config and run the selected command
    pub async fn run(self) -> Result<(), ScriptError> {
        let Cli {
            config,
            network,
            rpc_url,
            priv_key,
            command,
        } = self;

        let config = ScriptConfig::load(config.as_deref())?;
        let ctx = ScriptContext::new(config, &network, rpc_url, priv_key)?;
        command.run(&ctx).await
    }
}

/// The possible CLI commands
#[derive(Subcommand)]
pub enum Command {
    /// Deploy a contract
    Deploy(DeployArgs),
    /// Compile the contracts with solc
    Compile(CompileArgs),
    /// Log an anomaly on the deployed contract
    LogAnomaly(LogAnomalyArgs),
    /// List the anomalies logged on the deployed contract
    Anomalies(AnomaliesArgs),
}

impl Command {
    /// Run the command
    pub async fn run(self, ctx: &ScriptContext) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => {
                info!("Deploying contracts...");
                let deployment = deploy_contracts(args, ctx).await?;
                println!(
                    "{} deployed to {}",
                    deployment.contract_name, deployment.address
                );

                Ok(())
            }
            // Compiling doesn't touch the network
            Command::Compile(args) => compile_contracts(args, &ctx.config),
            Command::LogAnomaly(args) => {
                info!("Logging anomaly...");
                log_anomaly(args, ctx).await
            }
            Command::Anomalies(args) => {
                info!("Fetching all anomalies...");
                list_anomalies(args, ctx).await
            }
        }
    }
}

/// Deploy a contract
#[derive(Args)]
pub struct DeployArgs {
    /// Name of the contract, or `path/to/Source.sol:Name`
    #[arg(long, default_value = DEFAULT_CONTRACT)]
    pub contract: String,
    /// Seconds to wait for the deployment to be mined
    #[arg(long, default_value_t = CONFIRMATION_TIMEOUT_SECS)]
    pub timeout: u64,
    /// Don't record the address in the deployments file
    #[arg(long)]
    pub no_save: bool,
}

/// Compile the contracts
#[derive(Args)]
pub struct CompileArgs {
    /// The solc binary, `solc` from the `PATH` by default
    #[arg(long)]
    pub solc: Option<PathBuf>,
}

/// Log an anomaly
#[derive(Args)]
pub struct LogAnomalyArgs {
    /// Contract address, the recorded deployment by default
    #[arg(short, long)]
    pub address: Option<String>,
    /// Contract name the deployment was recorded under
    #[arg(long, default_value = DEFAULT_CONTRACT)]
    pub contract: String,
    /// Id of the sensor that reported the anomaly
    #[arg(short, long)]
    pub sensor_id: String,
    /// Value of the reading
    #[arg(short, long, allow_hyphen_values = true)]
    pub value: i64,
    /// Kind of anomaly
    #[arg(short = 't', long, default_value = "Manual Anomaly (Point)")]
    pub anomaly_type: String,
    /// Free form explanation
    #[arg(short, long, default_value = "Logged from the command line")]
    pub explanation: String,
    /// Unix timestamp of the reading, now by default
    #[arg(long)]
    pub timestamp: Option<u64>,
    /// Seconds to wait for the transaction to be mined
    #[arg(long, default_value_t = CONFIRMATION_TIMEOUT_SECS)]
    pub timeout: u64,
}

/// List the logged anomalies
#[derive(Args)]
pub struct AnomaliesArgs {
    /// Contract address, the recorded deployment by default
    #[arg(short, long)]
    pub address: Option<String>,
    /// Contract name the deployment was recorded under
    #[arg(long, default_value = DEFAULT_CONTRACT)]
    pub contract: String,
    /// Print the anomalies as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn deploy_defaults_to_anomaly_logger_on_ganache() {
        let cli = Cli::try_parse_from(["anomaly-scripts", "deploy"]).unwrap();

        assert_eq!(cli.network, "ganache");
        assert!(cli.config.is_none());
        match cli.command {
            Command::Deploy(args) => {
                assert_eq!(args.contract, "AnomalyLogger");
                assert_eq!(args.timeout, 120);
                assert!(!args.no_save);
            }
            _ => panic!("expected deploy"),
        }
    }

    #[test]
    fn log_anomaly_accepts_negative_values() {
        let cli = Cli::try_parse_from([
            "anomaly-scripts",
            "--network",
            "sepolia",
            "log-anomaly",
            "--sensor-id",
            "temp_sensor_01",
            "--value",
            "-4",
        ])
        .unwrap();

        assert_eq!(cli.network, "sepolia");
        match cli.command {
            Command::LogAnomaly(args) => {
                assert_eq!(args.sensor_id, "temp_sensor_01");
                assert_eq!(args.value, -4);
                assert_eq!(args.anomaly_type, "Manual Anomaly (Point)");
                assert!(args.address.is_none());
            }
            _ => panic!("expected log-anomaly"),
        }
    }
}
