//! Session subsystem.
//!
//! # Data Flow
//! ```text
//! SessionConfig (config.rs)
//!     → Connector (connector.rs: identity + vault accessor)
//!     → SessionController (controller.rs)
//!         → spawns one RedemptionMachine loop
//!         → stop / reconfigure / drop cancel the loop
//! ```

pub mod config;
pub mod connector;
pub mod controller;

pub use config::SessionConfig;
pub use connector::{AlloyConnector, Connection, Connector};
pub use controller::{SessionController, SessionError};
