//! Scripts for compiling, deploying and using the AnomalyLogger contract.

pub mod artifacts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod errors;
pub mod utils;

/// Our build utils
pub mod build;

/// Our deploy utils
pub mod deploy;

// Our output utils
mod output_writer;

pub mod tx;
