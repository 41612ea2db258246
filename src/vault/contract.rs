//! `VaultAccessor` over alloy providers.

use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::DynProvider;
use alloy::sol;
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use crate::blockchain::client::ChainClients;
use crate::blockchain::transaction::ConfirmationWatcher;
use crate::blockchain::types::{BlockchainConfig, BlockchainError, BlockchainResult, Receipt};
use crate::vault::VaultAccessor;

sol! {
    /// Subset of the ERC-4626 interface the redeemer needs.
    #[sol(rpc)]
    interface IVault {
        function balanceOf(address account) external view returns (uint256);
        function maxRedeem(address owner) external view returns (uint256);
        function redeem(uint256 shares, address receiver, address owner) external returns (uint256 assets);
    }
}

/// Vault accessor backed by the session's chain clients.
#[derive(Clone)]
pub struct AlloyVault {
    query: DynProvider,
    tx: DynProvider,
    watcher: ConfirmationWatcher,
    rpc_timeout: Duration,
}

impl AlloyVault {
    pub fn new(clients: &ChainClients, config: &BlockchainConfig) -> Self {
        let watcher = ConfirmationWatcher::new(
            clients.query.clone(),
            Duration::from_millis(config.receipt_poll_interval_ms),
            Duration::from_secs(config.confirmation_timeout_secs),
        );
        Self {
            query: clients.query.clone(),
            tx: clients.tx.clone(),
            watcher,
            rpc_timeout: Duration::from_secs(config.rpc_timeout_secs),
        }
    }

    /// Run a read call under the RPC timeout.
    async fn read<F, E>(&self, method: &'static str, fut: F) -> BlockchainResult<U256>
    where
        F: Future<Output = Result<U256, E>>,
        E: std::fmt::Display,
    {
        match timeout(self.rpc_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                tracing::warn!(method, error = %e, "Vault read failed");
                Err(BlockchainError::Query(format!("{}: {}", method, e)))
            }
            Err(_) => {
                tracing::warn!(method, "Vault read timed out");
                Err(BlockchainError::Query(format!(
                    "{}: timed out after {} seconds",
                    method,
                    self.rpc_timeout.as_secs()
                )))
            }
        }
    }
}

#[async_trait]
impl VaultAccessor for AlloyVault {
    async fn balance_of(&self, vault: Address, holder: Address) -> BlockchainResult<U256> {
        let contract = IVault::new(vault, self.query.clone());
        self.read("balanceOf", async move { contract.balanceOf(holder).call().await })
            .await
    }

    async fn max_redeem(&self, vault: Address, holder: Address) -> BlockchainResult<U256> {
        let contract = IVault::new(vault, self.query.clone());
        self.read("maxRedeem", async move { contract.maxRedeem(holder).call().await })
            .await
    }

    async fn submit_redeem(
        &self,
        vault: Address,
        shares: U256,
        receiver: Address,
        owner: Address,
    ) -> BlockchainResult<TxHash> {
        let contract = IVault::new(vault, self.tx.clone());
        let call = contract.redeem(shares, receiver, owner);

        match timeout(self.rpc_timeout, call.send()).await {
            Ok(Ok(pending)) => {
                let tx_hash = *pending.tx_hash();
                tracing::info!(tx_hash = %tx_hash, shares = %shares, "Redeem broadcast");
                Ok(tx_hash)
            }
            Ok(Err(e)) => Err(BlockchainError::Submission(e.to_string())),
            Err(_) => Err(BlockchainError::Submission(format!(
                "broadcast timed out after {} seconds",
                self.rpc_timeout.as_secs()
            ))),
        }
    }

    async fn await_confirmation(&self, tx_hash: TxHash) -> BlockchainResult<Receipt> {
        self.watcher.wait(tx_hash).await
    }
}

impl std::fmt::Debug for AlloyVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlloyVault")
            .field("rpc_timeout", &self.rpc_timeout)
            .field("watcher", &self.watcher)
            .finish()
    }
}
