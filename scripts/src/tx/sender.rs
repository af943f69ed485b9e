use std::time::Duration;

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, TxHash, I256, U256},
    providers::Provider,
    rpc::types::eth::{TransactionReceipt, TransactionRequest},
};
use tracing::{debug, info};

use crate::{
    constants::{LOG_ANOMALY_GAS_LIMIT, RECEIPT_POLL_INTERVAL_MS},
    errors::ScriptError,
    tx::{
        abi::IAnomalyLogger::logAnomalyCall,
        client::{RpcClient, RpcProvider},
    },
};

/// An anomaly to record on chain
#[derive(Debug, Clone)]
pub struct NewAnomaly {
    /// Unix timestamp, in seconds
    pub timestamp: u64,
    pub sensor_id: String,
    pub data_value: i64,
    pub anomaly_type: String,
    pub explanation: String,
}

/// Wait for a sent transaction to be mined, failing if it reverted or took
/// longer than `timeout`. `on_error` wraps transport errors.
pub async fn wait_for_receipt(
    provider: &RpcProvider,
    tx_hash: TxHash,
    timeout: Duration,
    on_error: fn(String) -> ScriptError,
) -> Result<TransactionReceipt, ScriptError> {
    let receipt = tokio::time::timeout(timeout, poll_receipt(provider, tx_hash, on_error))
        .await
        .map_err(|_| ScriptError::ConfirmationTimeout {
            tx_hash,
            secs: timeout.as_secs(),
        })??;

    if !receipt.status() {
        return Err(ScriptError::TransactionReverted(tx_hash));
    }

    Ok(receipt)
}

/// Ask the node for the receipt until it has one
async fn poll_receipt(
    provider: &RpcProvider,
    tx_hash: TxHash,
    on_error: fn(String) -> ScriptError,
) -> Result<TransactionReceipt, ScriptError> {
    let mut interval = tokio::time::interval(Duration::from_millis(RECEIPT_POLL_INTERVAL_MS));
    loop {
        interval.tick().await;
        let receipt = provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| on_error(e.to_string()))?;
        match receipt {
            Some(receipt) => return Ok(receipt),
            None => debug!("Transaction {tx_hash} not mined yet"),
        }
    }
}

/// Log an anomaly on the contract
pub async fn send_log_anomaly(
    contract: Address,
    anomaly: NewAnomaly,
    client: &RpcClient,
    timeout: Duration,
) -> Result<TxHash, ScriptError> {
    let data_value = I256::try_from(anomaly.data_value)
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

    // Nonce and gas price from the node, fixed gas limit
    let provider = &client.provider;
    let nonce = provider
        .get_transaction_count(client.sender)
        .await
        .map_err(|e| ScriptError::ContractInteraction(format!("nonce fetching failed: {e}")))?;
    let gas_price = provider
        .get_gas_price()
        .await
        .map_err(|e| ScriptError::ContractInteraction(format!("gas price fetching failed: {e}")))?;

    // Build the tx
    let tx_request = TransactionRequest::default()
        .with_from(client.sender)
        .with_to(contract)
        .with_call(&logAnomalyCall {
            timestamp: U256::from(anomaly.timestamp),
            sensorId: anomaly.sensor_id,
            dataValue: data_value,
            anomalyType: anomaly.anomaly_type,
            explanation: anomaly.explanation,
        })
        .with_nonce(nonce)
        .with_chain_id(client.chain_id)
        .with_gas_limit(LOG_ANOMALY_GAS_LIMIT)
        .with_gas_price(gas_price)
        .with_value(U256::ZERO);

    // Send it
    let pending_tx = provider
        .send_transaction(tx_request)
        .await
        .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
    let tx_hash = *pending_tx.tx_hash();
    info!("Pending log anomaly transaction... {}", tx_hash);

    // Wait for the transaction to be included.
    let receipt =
        wait_for_receipt(provider, tx_hash, timeout, ScriptError::ContractInteraction).await?;
    info!(
        "Log anomaly tx done on block: {}",
        receipt.block_number.unwrap_or_default()
    );

    Ok(tx_hash)
}
