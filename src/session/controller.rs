//! Session lifecycle.
//!
//! # Responsibilities
//! - Bind one `SessionConfig` to at most one running polling loop
//! - Start, stop and reconfigure sessions
//! - Cancel the loop's pending cycle on stop and on drop
//! - Expose state and log to the presentation layer

use alloy::primitives::Address;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::activity::LogEntry;
use crate::blockchain::types::BlockchainError;
use crate::config::PollingConfig;
use crate::lifecycle::Shutdown;
use crate::redeem::{RedemptionMachine, RedemptionSnapshot, StatusBoard, Target};
use crate::session::config::SessionConfig;
use crate::session::connector::Connector;

/// Errors returned by [`SessionController::start`].
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Blockchain(#[from] BlockchainError),
}

/// Polling loop belonging to the current (or last) session.
struct ActiveSession {
    shutdown: Shutdown,
    task: JoinHandle<()>,
}

pub struct SessionController {
    connector: Arc<dyn Connector>,
    polling: PollingConfig,
    board: StatusBoard,
    config: Option<SessionConfig>,
    active: Option<ActiveSession>,
}

impl SessionController {
    pub fn new(connector: Arc<dyn Connector>, polling: PollingConfig) -> Self {
        Self {
            connector,
            polling,
            board: StatusBoard::new(),
            config: None,
            active: None,
        }
    }

    /// Replace the configuration, stopping a running session first.
    pub fn configure(&mut self, config: SessionConfig) {
        if self.board.is_running() {
            self.stop();
        }
        tracing::debug!(vault = %config.vault, receiver = %config.receiver, "Session configured");
        self.config = Some(config);
    }

    pub fn config(&self) -> Option<&SessionConfig> {
        self.config.as_ref()
    }

    /// Start polling with the current configuration.
    ///
    /// A no-op while a session is already running. If the previous
    /// session still has a cycle in flight, waits for it to finish so
    /// cycles never overlap.
    pub async fn start(&mut self) -> Result<(), SessionError> {
        let Some(config) = self.config.clone() else {
            let message = "Please configure first".to_string();
            self.board.reject_start(message.clone());
            return Err(SessionError::Configuration(message));
        };

        if self.board.is_running() {
            tracing::warn!("Session already running, ignoring start");
            return Ok(());
        }

        self.finish_previous().await;

        let connection = match self.connector.connect(&config) {
            Ok(connection) => connection,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create chain clients");
                self.board.reject_start(e.to_string());
                return Err(e.into());
            }
        };

        let target = Target {
            vault: config.vault,
            receiver: config.receiver,
            operator: connection.operator,
        };
        self.board.begin_session(
            target.operator,
            RedemptionMachine::bootstrap_entries(&target, &self.polling),
        );

        let machine = RedemptionMachine::new(
            connection.accessor,
            self.board.clone(),
            target,
            self.polling.clone(),
        );
        let shutdown = Shutdown::new();
        let signal = shutdown.subscribe();
        let task = tokio::spawn(async move { machine.run(signal).await });

        tracing::info!(
            vault = %target.vault,
            operator = %target.operator,
            "Session started"
        );
        self.active = Some(ActiveSession { shutdown, task });
        Ok(())
    }

    /// Stop polling.
    ///
    /// The pending cycle is cancelled; a cycle already in flight finishes
    /// (a broadcast transaction cannot be recalled). Only the transition
    /// from running appends the stop entry.
    pub fn stop(&mut self) {
        if let Some(active) = &self.active {
            active.shutdown.trigger();
        }
        if self.board.end_session(Some(LogEntry::check("Auto-redeem stopped"))) {
            tracing::info!("Session stopped");
        }
    }

    /// Wait for the current polling loop to exit.
    pub async fn wait(&mut self) {
        if let Some(active) = self.active.take() {
            if let Err(e) = active.task.await {
                tracing::error!(error = %e, "Polling loop terminated abnormally");
            }
        }
    }

    async fn finish_previous(&mut self) {
        if let Some(active) = &self.active {
            active.shutdown.trigger();
        }
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        self.board.is_running()
    }

    pub fn operator(&self) -> Option<Address> {
        self.board.snapshot().operator
    }

    pub fn snapshot(&self) -> RedemptionSnapshot {
        self.board.snapshot()
    }

    pub fn subscribe_state(&self) -> watch::Receiver<RedemptionSnapshot> {
        self.board.subscribe_state()
    }

    pub fn subscribe_log(&self) -> broadcast::Receiver<LogEntry> {
        self.board.subscribe_log()
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.shutdown.trigger();
            active.task.abort();
        }
        self.board.end_session(None);
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("config", &self.config)
            .field("polling", &self.polling)
            .field("board", &self.board)
            .field("has_task", &self.active.is_some())
            .finish()
    }
}
