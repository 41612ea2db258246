//! Resilience subsystem.
//!
//! Failed cycles are retried on the polling schedule; the delay before
//! the next attempt may back off exponentially (backoff.rs) up to a
//! configured ceiling.

pub mod backoff;

pub use backoff::{calculate_backoff, retry_delay};
