//! Shared status board between the state machine and its observers.
//!
//! # Design Decisions
//! - One writer side (machine + controller), many readers
//! - `watch` carries the latest snapshot; readers never mutate it
//! - `broadcast` carries every log entry, in production order
//! - Every entry is mirrored as a tracing event and a metric

use alloy::primitives::Address;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};

use crate::activity::{LogEntry, LogKind};
use crate::observability::metrics;
use crate::redeem::state::{RedemptionSnapshot, RedemptionState};

/// Buffered log entries per slow subscriber before it lags.
const LOG_CHANNEL_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct StatusBoard {
    state: Arc<watch::Sender<RedemptionSnapshot>>,
    entries: broadcast::Sender<LogEntry>,
}

impl StatusBoard {
    pub fn new() -> Self {
        let (state, _) = watch::channel(RedemptionSnapshot::default());
        let (entries, _) = broadcast::channel(LOG_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(state),
            entries,
        }
    }

    /// Copy of the current snapshot.
    pub fn snapshot(&self) -> RedemptionSnapshot {
        self.state.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().state.running
    }

    pub fn subscribe_state(&self) -> watch::Receiver<RedemptionSnapshot> {
        self.state.subscribe()
    }

    pub fn subscribe_log(&self) -> broadcast::Receiver<LogEntry> {
        self.entries.subscribe()
    }

    /// Mutate the state fields, keeping `processing ⇒ running`.
    pub fn update(&self, f: impl FnOnce(&mut RedemptionState)) {
        self.state.send_modify(|snapshot| {
            f(&mut snapshot.state);
            if !snapshot.state.running {
                snapshot.state.processing = false;
            }
        });
    }

    /// Append an entry to the log and fan it out.
    pub fn record(&self, entry: LogEntry) {
        trace_entry(&entry);
        metrics::record_log_entry(entry.kind.as_str());

        let published = entry.clone();
        self.state.send_modify(|snapshot| snapshot.log.push(entry));
        // No subscribers is fine; the snapshot still holds the entry.
        let _ = self.entries.send(published);
    }

    /// Reset state and log for a new session and mark it running.
    pub fn begin_session(&self, operator: Address, bootstrap: Vec<LogEntry>) {
        self.state.send_modify(|snapshot| {
            snapshot.state = RedemptionState {
                running: true,
                ..RedemptionState::default()
            };
            snapshot.operator = Some(operator);
            snapshot.log.reset(Vec::new());
        });
        metrics::set_running(true);
        for entry in bootstrap {
            self.record(entry);
        }
    }

    /// Mark the session stopped.
    ///
    /// Appends `notice` only on the running → stopped edge and returns
    /// whether that edge was taken.
    pub fn end_session(&self, notice: Option<LogEntry>) -> bool {
        let mut was_running = false;
        self.update(|state| {
            was_running = state.running;
            state.running = false;
            state.processing = false;
        });
        if was_running {
            metrics::set_running(false);
            if let Some(entry) = notice {
                self.record(entry);
            }
        }
        was_running
    }

    /// A start attempt failed before the session entered running.
    pub fn reject_start(&self, message: String) {
        self.update(|state| {
            state.running = false;
            state.last_error = Some(message);
        });
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for StatusBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.state.borrow();
        f.debug_struct("StatusBoard")
            .field("running", &snapshot.state.running)
            .field("processing", &snapshot.state.processing)
            .field("log_len", &snapshot.log.len())
            .finish()
    }
}

fn trace_entry(entry: &LogEntry) {
    let tx_hash = entry.tx_hash.map(|h| h.to_string());
    match entry.kind {
        LogKind::Error => tracing::warn!(
            kind = %entry.kind,
            tx_hash = tx_hash.as_deref(),
            "{}",
            entry.message
        ),
        _ => tracing::info!(
            kind = %entry.kind,
            tx_hash = tx_hash.as_deref(),
            block_number = entry.block_number,
            "{}",
            entry.message
        ),
    }
}
