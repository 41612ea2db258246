//! Vault contract access.
//!
//! # Data Flow
//! ```text
//! RedemptionMachine
//!     → VaultAccessor (trait seam)
//!         → contract.rs (AlloyVault: sol! bindings over the chain clients)
//! ```
//!
//! The vault speaks a fixed ERC-4626-style interface: `balanceOf`,
//! `maxRedeem` and `redeem(shares, receiver, owner)`.

pub mod contract;

use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::blockchain::types::{BlockchainResult, Receipt};
use crate::redeem::decision::shares_to_redeem;

pub use contract::{AlloyVault, IVault};

/// Typed read/write calls against the vault.
#[async_trait]
pub trait VaultAccessor: Send + Sync {
    /// Share balance of `holder`.
    async fn balance_of(&self, vault: Address, holder: Address) -> BlockchainResult<U256>;

    /// Shares `holder` may redeem right now.
    async fn max_redeem(&self, vault: Address, holder: Address) -> BlockchainResult<U256>;

    /// Sign and broadcast `redeem(shares, receiver, owner)`.
    async fn submit_redeem(
        &self,
        vault: Address,
        shares: U256,
        receiver: Address,
        owner: Address,
    ) -> BlockchainResult<TxHash>;

    /// Wait until the transaction is mined.
    async fn await_confirmation(&self, tx_hash: TxHash) -> BlockchainResult<Receipt>;
}

/// Holder's position as seen by one eligibility check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub balance: U256,
    pub max_redeemable: U256,
}

impl Position {
    /// Shares the holder can redeem now.
    pub fn redeemable(&self) -> U256 {
        shares_to_redeem(self.balance, self.max_redeemable)
    }
}

/// Read balance and redeemable ceiling concurrently.
pub async fn read_position<A>(accessor: &A, vault: Address, holder: Address) -> BlockchainResult<Position>
where
    A: VaultAccessor + ?Sized,
{
    let (balance, max_redeemable) = tokio::try_join!(
        accessor.balance_of(vault, holder),
        accessor.max_redeem(vault, holder),
    )?;
    Ok(Position {
        balance,
        max_redeemable,
    })
}
