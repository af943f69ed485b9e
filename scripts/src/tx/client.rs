use alloy::{
    network::EthereumWallet,
    primitives::Address,
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
};
use reqwest::Url;
use tracing::info;

use crate::errors::ScriptError;

/// A type-erased provider, either signing locally or relying on the node's accounts
pub type RpcProvider = DynProvider;

/// Our RPC client, with the account transactions are sent from
#[derive(Clone)]
pub struct RpcClient {
    pub provider: RpcProvider,
    /// Account sending the transactions
    pub sender: Address,
    pub chain_id: u64,
}

/// Build the RPC client for the given endpoint.
///
/// With a private key, transactions are signed locally. Without one, the first
/// account unlocked on the node is used and the node signs, like ganache or
/// anvil do for their development accounts.
pub async fn create_rpc_client(
    rpc_url: &str,
    priv_key: Option<&str>,
) -> Result<RpcClient, ScriptError> {
    let url = rpc_url
        .parse::<Url>()
        .map_err(|e| ScriptError::ClientInitialization(format!("invalid rpc url {rpc_url}: {e}")))?;

    let (provider, local_sender) = match priv_key {
        Some(priv_key) => {
            // Create our signer
            let signer = priv_key
                .trim()
                .parse::<PrivateKeySigner>()
                .map_err(|e| ScriptError::ClientInitialization(format!("invalid private key: {e}")))?;
            let sender = signer.address();
            let wallet = EthereumWallet::from(signer);

            // Create our provider with the rpc client + signer
            let provider = ProviderBuilder::new().wallet(wallet).connect_http(url).erased();
            (provider, Some(sender))
        }
        None => (ProviderBuilder::new().connect_http(url).erased(), None),
    };

    // Fetch chain id, this is also our connectivity check
    let chain_id = provider
        .get_chain_id()
        .await
        .map_err(|e| ScriptError::ClientInitialization(format!("{rpc_url}: {e}")))?;
    info!("Built client on chain ID: {}", chain_id);

    let sender = match local_sender {
        Some(sender) => sender,
        None => unlocked_account(&provider).await?,
    };
    info!("Using sender account: {}", sender);

    Ok(RpcClient {
        provider,
        sender,
        chain_id,
    })
}

/// First account the node holds the keys of
async fn unlocked_account(provider: &RpcProvider) -> Result<Address, ScriptError> {
    let accounts = provider
        .get_accounts()
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

    accounts.first().copied().ok_or_else(|| {
        ScriptError::ClientInitialization(String::from(
            "node has no unlocked account, provide a private key",
        ))
    })
}
