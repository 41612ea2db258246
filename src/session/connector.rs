//! Turning a session config into a live vault accessor.

use alloy::primitives::Address;
use std::sync::Arc;

use crate::blockchain::client::create_clients;
use crate::blockchain::types::{BlockchainConfig, BlockchainResult, NetworkProfile};
use crate::session::config::SessionConfig;
use crate::vault::{AlloyVault, VaultAccessor};

/// Operator identity plus the accessor used for every vault call.
#[derive(Clone)]
pub struct Connection {
    pub operator: Address,
    pub accessor: Arc<dyn VaultAccessor>,
}

/// Builds connections for the session controller.
pub trait Connector: Send + Sync {
    /// Derive the identity and build clients. Must not touch the network.
    fn connect(&self, config: &SessionConfig) -> BlockchainResult<Connection>;
}

/// Production connector over alloy HTTP providers.
#[derive(Debug, Clone)]
pub struct AlloyConnector {
    blockchain: BlockchainConfig,
}

impl AlloyConnector {
    pub fn new(blockchain: BlockchainConfig) -> Self {
        Self { blockchain }
    }
}

impl Connector for AlloyConnector {
    fn connect(&self, config: &SessionConfig) -> BlockchainResult<Connection> {
        let profile = NetworkProfile::for_chain(self.blockchain.chain_id);
        let clients = create_clients(config.signing_key(), &config.rpc_url, profile)?;
        let vault = AlloyVault::new(&clients, &self.blockchain);
        Ok(Connection {
            operator: clients.operator,
            accessor: Arc::new(vault),
        })
    }
}
