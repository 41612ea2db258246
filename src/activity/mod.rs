//! Activity log subsystem.
//!
//! Time-ordered record of state-machine events, bounded to the last
//! [`LOG_CAPACITY`] entries, consumed by the presentation layer.

pub mod entry;
pub mod log;

pub use entry::{LogEntry, LogKind};
pub use log::{ActivityLog, LOG_CAPACITY};
