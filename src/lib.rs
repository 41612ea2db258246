//! Vault Auto-Redeemer Library
//!
//! Polls an ERC-4626-style vault for an operator account and redeems as
//! soon as shares become redeemable.

pub mod activity;
pub mod blockchain;
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod redeem;
pub mod resilience;
pub mod session;
pub mod vault;

pub use config::schema::RedeemerConfig;
pub use redeem::{RedemptionMachine, RedemptionSnapshot};
pub use session::{SessionConfig, SessionController};
