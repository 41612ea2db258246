//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! StatusBoard / RedemptionMachine produce:
//!     → logging.rs (structured log events, pretty or JSON)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stdout / log aggregation
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Every activity-log entry is mirrored as a tracing event
//! - Metrics are cheap (atomic increments)
//! - The signing key is never a log field

pub mod logging;
pub mod metrics;
