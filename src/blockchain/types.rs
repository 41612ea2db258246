//! Chain-specific types and error definitions.

use alloy::primitives::TxHash;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export BlockchainConfig from config module to avoid duplication
pub use crate::config::schema::BlockchainConfig;

/// Chain ID of the Avalanche C-Chain.
pub const AVALANCHE_CHAIN_ID: u64 = 43114;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Network both chain clients are pinned to.
///
/// The profile is fixed when the clients are built. The connected RPC is
/// never asked which chain it serves; a mismatch surfaces as a signing or
/// submission failure instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkProfile {
    pub name: &'static str,
    pub chain_id: ChainId,
}

impl NetworkProfile {
    pub const AVALANCHE: Self = Self {
        name: "avalanche",
        chain_id: ChainId(AVALANCHE_CHAIN_ID),
    };

    /// Resolve the profile for a configured chain ID.
    pub fn for_chain(chain_id: u64) -> Self {
        if chain_id == AVALANCHE_CHAIN_ID {
            Self::AVALANCHE
        } else {
            Self {
                name: "custom",
                chain_id: ChainId(chain_id),
            }
        }
    }
}

impl Default for NetworkProfile {
    fn default() -> Self {
        Self::AVALANCHE
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// Missing or malformed credentials / endpoint.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A read-only contract call failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Signing or broadcasting a transaction failed.
    #[error("Submission failed: {0}")]
    Submission(String),

    /// Transaction was not mined within the confirmation window.
    #[error("Transaction {tx_hash} not confirmed after {secs} seconds")]
    ConfirmationTimeout { tx_hash: TxHash, secs: u64 },

    /// Low-level RPC failure outside of a contract call.
    #[error("RPC error: {0}")]
    Rpc(String),
}

impl BlockchainError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            BlockchainError::Configuration(_) => "configuration",
            BlockchainError::Query(_) => "query",
            BlockchainError::Submission(_) => "submission",
            BlockchainError::ConfirmationTimeout { .. } => "confirmation_timeout",
            BlockchainError::Rpc(_) => "rpc",
        }
    }
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// On-chain outcome of a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceiptStatus {
    Success,
    Failure,
}

/// Finalized record of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub status: ReceiptStatus,
    pub block_number: u64,
}

impl Receipt {
    pub fn succeeded(&self) -> bool {
        self.status == ReceiptStatus::Success
    }
}
