//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Strict 20-byte hex format for vault and receiver addresses
//! - Validate value ranges (intervals > 0, backoff ceiling >= interval)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RedeemerConfig → Result<(), Vec<ValidationError>>
//! - Runs before a session is allowed to start

use alloy::primitives::Address;
use thiserror::Error;

use crate::config::schema::RedeemerConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),

    #[error("{field} address format is invalid: '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} is not a valid URL: '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field} {reason}")]
    OutOfRange { field: &'static str, reason: String },
}

/// `0x` followed by exactly 40 hex digits.
pub fn is_valid_address(value: &str) -> bool {
    match value.strip_prefix("0x") {
        Some(hex) => hex.len() == 40 && hex.bytes().all(|b| b.is_ascii_hexdigit()),
        None => false,
    }
}

/// Check the strict format and parse into an [`Address`].
pub fn parse_address(field: &'static str, value: &str) -> Result<Address, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Missing(field));
    }
    if !is_valid_address(value) {
        return Err(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
    value.parse().map_err(|_| ValidationError::InvalidAddress {
        field,
        value: value.to_string(),
    })
}

/// Validate the full configuration, collecting every error.
pub fn validate_config(config: &RedeemerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let rpc_url = config.session.rpc_url.trim();
    if rpc_url.is_empty() {
        errors.push(ValidationError::Missing("rpc_url"));
    } else if rpc_url.parse::<url::Url>().is_err() {
        errors.push(ValidationError::InvalidUrl {
            field: "rpc_url",
            value: rpc_url.to_string(),
        });
    }

    if let Err(e) = parse_address("vault", &config.session.vault) {
        errors.push(e);
    }
    if let Err(e) = parse_address("receiver", &config.session.receiver) {
        errors.push(e);
    }

    let polling = &config.polling;
    if polling.interval_ms == 0 {
        errors.push(ValidationError::OutOfRange {
            field: "polling.interval_ms",
            reason: "must be greater than 0".to_string(),
        });
    }
    if polling.error_backoff_max_ms < polling.interval_ms {
        errors.push(ValidationError::OutOfRange {
            field: "polling.error_backoff_max_ms",
            reason: format!("must be at least interval_ms ({})", polling.interval_ms),
        });
    }

    let chain = &config.blockchain;
    if chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::OutOfRange {
            field: "blockchain.rpc_timeout_secs",
            reason: "must be greater than 0".to_string(),
        });
    }
    if chain.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::OutOfRange {
            field: "blockchain.confirmation_timeout_secs",
            reason: "must be greater than 0".to_string(),
        });
    }
    if chain.receipt_poll_interval_ms == 0 {
        errors.push(ValidationError::OutOfRange {
            field: "blockchain.receipt_poll_interval_ms",
            reason: "must be greater than 0".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
