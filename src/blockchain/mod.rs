//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! SessionConfig (signing key, RPC URL)
//!     → wallet.rs (key normalization, identity, signer)
//!     → client.rs (query + signing providers, pinned network)
//!     → transaction.rs (receipt polling, confirmation timeout)
//! ```
//!
//! # Security Constraints
//! - Signing keys are held in memory only
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::{create_clients, ChainClients};
pub use transaction::ConfirmationWatcher;
pub use types::{
    BlockchainConfig, BlockchainError, BlockchainResult, ChainId, NetworkProfile, Receipt,
    ReceiptStatus,
};
pub use wallet::Wallet;
