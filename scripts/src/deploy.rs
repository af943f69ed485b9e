//! Deployment of a compiled contract

use std::time::Duration;

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, TxHash},
    providers::Provider,
    rpc::types::eth::TransactionRequest,
};
use tracing::{info, warn};

use crate::{
    artifacts::ContractArtifact,
    errors::ScriptError,
    tx::{client::RpcClient, sender::wait_for_receipt},
};

/// A confirmed deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub contract_name: String,
    pub address: Address,
    pub tx_hash: TxHash,
    pub deployer: Address,
}

/// Deploy a compiled contract and wait for its confirmation
pub async fn deploy_contract(
    artifact: &ContractArtifact,
    client: &RpcClient,
    timeout: Duration,
) -> Result<Deployment, ScriptError> {
    let provider = &client.provider;

    // Predict the contract address
    let nonce = provider
        .get_transaction_count(client.sender)
        .await
        .map_err(|e| ScriptError::ContractDeployment(format!("nonce fetching failed: {e}")))?;
    let expected_address = client.sender.create(nonce);

    // Build the creation tx
    let tx_request = TransactionRequest::default()
        .with_from(client.sender)
        .with_deploy_code(artifact.bytecode.clone())
        .with_nonce(nonce)
        .with_chain_id(client.chain_id);

    // Price it
    let gas_limit = provider
        .estimate_gas(tx_request.clone())
        .await
        .map_err(|e| ScriptError::ContractDeployment(format!("gas estimation failed: {e}")))?;
    let gas_price = provider
        .get_gas_price()
        .await
        .map_err(|e| ScriptError::ContractDeployment(format!("gas price fetching failed: {e}")))?;
    let tx_request = tx_request.with_gas_limit(gas_limit).with_gas_price(gas_price);

    // Send it
    let pending_tx = provider
        .send_transaction(tx_request)
        .await
        .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;
    let tx_hash = *pending_tx.tx_hash();
    info!("Pending deploy transaction... {}", tx_hash);

    // Wait for the transaction to be included.
    let receipt =
        wait_for_receipt(provider, tx_hash, timeout, ScriptError::ContractDeployment).await?;
    let address = receipt.contract_address.ok_or_else(|| {
        ScriptError::ContractDeployment(format!("receipt of {tx_hash} has no contract address"))
    })?;
    if address != expected_address {
        warn!("Contract deployed at {address}, expected {expected_address}");
    }
    info!(
        "Deploy tx done on block: {}",
        receipt.block_number.unwrap_or_default()
    );

    Ok(Deployment {
        contract_name: artifact.contract_name.clone(),
        address,
        tx_hash,
        deployer: client.sender,
    })
}
