//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Session (shutdown.rs):
//!     stop() / reconfigure / drop → trigger → loop exits before next cycle
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → stop the active session → exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
