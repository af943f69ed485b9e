use std::{
    io::{self, IsTerminal},
    process::ExitCode,
};

use anomaly_scripts::cli::Cli;
use clap::Parser;
use dotenv::dotenv;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file
    dotenv().ok();

    let cli = Cli::parse();

    // Logs go to stderr, stdout is kept for the command output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
