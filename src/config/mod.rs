//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → command-line overrides
//!     → validation.rs (semantic checks)
//!     → RedeemerConfig (validated, immutable)
//!
//! REDEEMER_PRIVATE_KEY
//!     → loader.rs (never written to disk, never logged)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once a session starts; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, signing_key_from_env, ConfigError};
pub use schema::{
    BlockchainConfig, LogFormat, ObservabilityConfig, PollingConfig, RedeemerConfig,
    SessionSettings,
};
pub use validation::{validate_config, ValidationError};
