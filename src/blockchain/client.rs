//! Chain client construction.
//!
//! # Responsibilities
//! - Validate credentials and endpoint before anything touches the network
//! - Derive the operator identity from the signing key
//! - Build a read-only provider and a signing provider for one network
//!
//! Construction is purely in-memory: HTTP providers connect lazily on the
//! first request.

use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};

use crate::blockchain::types::{BlockchainError, BlockchainResult, NetworkProfile};
use crate::blockchain::wallet::Wallet;

/// Identity plus the two capabilities a session needs.
#[derive(Clone)]
pub struct ChainClients {
    /// Operator address; used as `owner` in every vault call.
    pub operator: Address,
    /// Read-only query interface.
    pub query: DynProvider,
    /// Transaction-submitting interface, signing as `operator`.
    pub tx: DynProvider,
    /// Network both providers are bound to.
    pub profile: NetworkProfile,
}

/// Build the operator identity and both providers.
///
/// Fails with [`BlockchainError::Configuration`] when either input is
/// empty, the key cannot be parsed or the URL is malformed.
pub fn create_clients(
    signing_key: &str,
    rpc_url: &str,
    profile: NetworkProfile,
) -> BlockchainResult<ChainClients> {
    if signing_key.trim().is_empty() {
        return Err(BlockchainError::Configuration(
            "PRIVATE_KEY is required".to_string(),
        ));
    }
    if rpc_url.trim().is_empty() {
        return Err(BlockchainError::Configuration(
            "RPC_URL is required".to_string(),
        ));
    }

    let url: url::Url = rpc_url.trim().parse().map_err(|e| {
        BlockchainError::Configuration(format!("Invalid RPC URL '{}': {}", rpc_url, e))
    })?;

    let wallet = Wallet::from_private_key(signing_key, profile.chain_id)?;

    let query = ProviderBuilder::new().connect_http(url.clone()).erased();
    let tx = ProviderBuilder::new()
        .wallet(wallet.ethereum_wallet())
        .connect_http(url)
        .erased();

    tracing::debug!(
        operator = %wallet.address(),
        network = profile.name,
        chain_id = profile.chain_id.0,
        "Chain clients created"
    );

    Ok(ChainClients {
        operator: wallet.address(),
        query,
        tx,
        profile,
    })
}

impl std::fmt::Debug for ChainClients {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClients")
            .field("operator", &self.operator)
            .field("network", &self.profile.name)
            .field("chain_id", &self.profile.chain_id.0)
            .finish()
    }
}
