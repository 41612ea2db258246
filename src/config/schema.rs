//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the redeemer.
//! All types derive Serde traits for deserialization from config files.
//! The signing key is deliberately absent: it is read from the environment.

use serde::{Deserialize, Serialize};

/// Root configuration for the vault redeemer.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RedeemerConfig {
    /// Vault, receiver and RPC endpoint.
    pub session: SessionSettings,

    /// Cycle cadence and retry behaviour.
    pub polling: PollingConfig,

    /// Chain and RPC settings.
    pub blockchain: BlockchainConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// Addresses and endpoint a session is bound to.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SessionSettings {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Vault contract address (0x-prefixed, 20 bytes).
    pub vault: String,

    /// Address credited with the redeemed assets.
    pub receiver: String,
}

/// Polling cadence configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Delay between the end of one cycle and the start of the next.
    pub interval_ms: u64,

    /// Ceiling for the delay after consecutive failed cycles.
    /// Equal to `interval_ms` means a fixed retry delay.
    pub error_backoff_max_ms: u64,

    /// End the session after the first confirmed redemption.
    pub stop_after_success: bool,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            error_backoff_max_ms: 1000,
            stop_after_success: true,
        }
    }
}

/// Blockchain configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// Chain ID the signer is pinned to (43114 = Avalanche C-Chain).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// How long to wait for a submitted transaction to be mined.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub receipt_poll_interval_ms: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            chain_id: crate::blockchain::types::AVALANCHE_CHAIN_ID,
            rpc_timeout_secs: 10,
            confirmation_timeout_secs: 120,
            receipt_poll_interval_ms: 1000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9100".to_string(),
        }
    }
}
