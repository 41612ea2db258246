//! Operator wallet: key normalization, identity derivation and signing.
//!
//! # Security
//! - The signing key is only ever held in memory
//! - Keys are never logged or serialized

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId};

/// Canonical prefix for hex-encoded keys.
const HEX_PREFIX: &str = "0x";

/// Bring a hex key into canonical `0x`-prefixed form.
pub fn normalize_private_key(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with(HEX_PREFIX) {
        trimmed.to_string()
    } else {
        format!("{}{}", HEX_PREFIX, trimmed)
    }
}

/// Wallet for transaction signing, pinned to one chain.
#[derive(Debug, Clone)]
pub struct Wallet {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
    /// Chain ID for EIP-155 replay protection.
    chain_id: ChainId,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    /// * `chain_id` - Chain ID for transaction signing
    pub fn from_private_key(private_key_hex: &str, chain_id: ChainId) -> BlockchainResult<Self> {
        if private_key_hex.trim().is_empty() {
            return Err(BlockchainError::Configuration(
                "signing key is required".to_string(),
            ));
        }

        let key = normalize_private_key(private_key_hex);
        let signer: PrivateKeySigner = key.parse().map_err(|e| {
            BlockchainError::Configuration(format!("Invalid private key format: {}", e))
        })?;
        let signer = signer.with_chain_id(Some(chain_id.0));

        tracing::info!(
            address = %signer.address(),
            chain_id = chain_id.0,
            "Wallet initialized"
        );

        Ok(Self { signer, chain_id })
    }

    /// The operator identity derived from the key.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Get the chain ID this wallet is configured for.
    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// Wrap the signer for use in a signing provider.
    pub fn ethereum_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}
