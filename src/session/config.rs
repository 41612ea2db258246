//! Per-session configuration.

use alloy::primitives::Address;

use crate::config::schema::SessionSettings;
use crate::config::validation::{parse_address, ValidationError};

/// Credentials and addresses one session is bound to.
///
/// Immutable once handed to the controller. The signing key is kept in
/// memory only and is redacted from `Debug` output.
#[derive(Clone)]
pub struct SessionConfig {
    signing_key: String,
    pub rpc_url: String,
    pub vault: Address,
    pub receiver: Address,
}

impl SessionConfig {
    /// Validate raw inputs, collecting every problem.
    pub fn new(
        signing_key: impl Into<String>,
        rpc_url: impl Into<String>,
        vault: &str,
        receiver: &str,
    ) -> Result<Self, Vec<ValidationError>> {
        let signing_key = signing_key.into().trim().to_string();
        let rpc_url = rpc_url.into().trim().to_string();
        let mut errors = Vec::new();

        if signing_key.is_empty() {
            errors.push(ValidationError::Missing("signing_key"));
        }
        if rpc_url.is_empty() {
            errors.push(ValidationError::Missing("rpc_url"));
        }
        let vault = parse_address("vault", vault).map_err(|e| errors.push(e)).ok();
        let receiver = parse_address("receiver", receiver)
            .map_err(|e| errors.push(e))
            .ok();

        match (vault, receiver) {
            (Some(vault), Some(receiver)) if errors.is_empty() => Ok(Self {
                signing_key,
                rpc_url,
                vault,
                receiver,
            }),
            _ => Err(errors),
        }
    }

    /// Build from the `[session]` table plus a key from the environment.
    pub fn from_settings(
        settings: &SessionSettings,
        signing_key: impl Into<String>,
    ) -> Result<Self, Vec<ValidationError>> {
        Self::new(
            signing_key,
            settings.rpc_url.clone(),
            &settings.vault,
            &settings.receiver,
        )
    }

    pub fn signing_key(&self) -> &str {
        &self.signing_key
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("signing_key", &"<redacted>")
            .field("rpc_url", &self.rpc_url)
            .field("vault", &self.vault)
            .field("receiver", &self.receiver)
            .finish()
    }
}
