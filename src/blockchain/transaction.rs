//! Transaction confirmation monitoring.
//!
//! # Responsibilities
//! - Poll for the receipt of a broadcast transaction
//! - Translate the receipt into a [`Receipt`] outcome
//! - Give up after the configured confirmation window

use alloy::primitives::TxHash;
use alloy::providers::{DynProvider, Provider};
use std::time::Duration;
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::blockchain::types::{BlockchainError, BlockchainResult, Receipt, ReceiptStatus};

/// Polls a provider until a transaction is mined.
#[derive(Clone)]
pub struct ConfirmationWatcher {
    provider: DynProvider,
    poll_interval: Duration,
    timeout: Duration,
}

impl ConfirmationWatcher {
    pub fn new(provider: DynProvider, poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            provider,
            poll_interval,
            timeout,
        }
    }

    /// Wait for a transaction to be mined.
    ///
    /// A mined-but-reverted transaction is a normal return value with
    /// [`ReceiptStatus::Failure`]; only running out of time is an error.
    pub async fn wait(&self, tx_hash: TxHash) -> BlockchainResult<Receipt> {
        let result = timeout(self.timeout, async {
            let mut ticker = interval(self.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let receipt = match self.provider.get_transaction_receipt(tx_hash).await {
                    Ok(Some(r)) => r,
                    Ok(None) => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                        continue;
                    }
                    Err(e) => {
                        // Transient RPC failures are retried until the window closes.
                        tracing::warn!(tx_hash = %tx_hash, error = %e, "Receipt lookup failed");
                        continue;
                    }
                };

                let status = if receipt.status() {
                    ReceiptStatus::Success
                } else {
                    ReceiptStatus::Failure
                };

                let block_number = match receipt.block_number {
                    Some(n) => n,
                    None => self
                        .provider
                        .get_block_number()
                        .await
                        .map_err(|e| BlockchainError::Rpc(e.to_string()))?,
                };

                return Ok(Receipt {
                    tx_hash,
                    status,
                    block_number,
                });
            }
        })
        .await;

        match result {
            Ok(receipt) => receipt,
            Err(_) => Err(BlockchainError::ConfirmationTimeout {
                tx_hash,
                secs: self.timeout.as_secs(),
            }),
        }
    }
}

impl std::fmt::Debug for ConfirmationWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfirmationWatcher")
            .field("poll_interval", &self.poll_interval)
            .field("timeout", &self.timeout)
            .finish()
    }
}
