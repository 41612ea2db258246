//! Redemption state machine.
//!
//! # States
//! ```text
//! Idle ──start──▶ Running/Polling ──timer──▶ Running/Processing
//!                        ▲                          │
//!                        └──── next delay ──────────┤
//!                                                   ▼
//!                                  Idle (confirmed redemption or stop)
//! ```
//!
//! # Cycle
//! 1. log the check
//! 2. read balance and max redeem concurrently
//! 3. record both, clear the last error
//! 4. `shares = min(balance, max_redeemable)`
//! 5. nothing to redeem → poll again after the interval
//! 6. otherwise submit, then wait for the receipt
//!    - success → the session ends
//!    - reverted → poll again after the interval
//!    - session stopped during the reads → nothing is submitted
//! 7. any error → record it, poll again after the retry delay
//!
//! At most one cycle is in flight: a cycle entered while another holds
//! the processing guard returns [`CycleOutcome::Skipped`] without doing
//! anything.

use alloy::primitives::{Address, TxHash, U256};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::sleep;

use crate::activity::LogEntry;
use crate::blockchain::types::BlockchainError;
use crate::config::PollingConfig;
use crate::observability::metrics;
use crate::redeem::board::StatusBoard;
use crate::resilience::backoff::retry_delay;
use crate::vault::{read_position, VaultAccessor};

/// Addresses a machine operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub vault: Address,
    pub receiver: Address,
    pub operator: Address,
}

/// Result of one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Another cycle was in flight, or the session is not running.
    Skipped,
    /// Nothing redeemable yet.
    NothingToRedeem,
    /// The redeem transaction was mined successfully.
    Redeemed { tx_hash: TxHash, block_number: u64 },
    /// The redeem transaction was mined but reverted.
    Reverted { tx_hash: TxHash },
    /// A read, submission or confirmation failed.
    Failed,
    /// The session stopped mid-cycle; nothing was submitted.
    Stopped,
}

impl CycleOutcome {
    fn label(&self) -> &'static str {
        match self {
            CycleOutcome::Skipped => "skipped",
            CycleOutcome::NothingToRedeem => "nothing_to_redeem",
            CycleOutcome::Redeemed { .. } => "redeemed",
            CycleOutcome::Reverted { .. } => "reverted",
            CycleOutcome::Failed => "failed",
            CycleOutcome::Stopped => "stopped",
        }
    }
}

/// Claims the processing flag for the lifetime of one cycle.
struct ProcessingGuard<'a> {
    flag: &'a AtomicBool,
    board: &'a StatusBoard,
}

impl<'a> ProcessingGuard<'a> {
    fn acquire(flag: &'a AtomicBool, board: &'a StatusBoard) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()?;
        board.update(|state| state.processing = state.running);
        Some(Self { flag, board })
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.board.update(|state| state.processing = false);
        self.flag.store(false, Ordering::Release);
    }
}

/// Scheduler and decision core for one session.
pub struct RedemptionMachine {
    accessor: Arc<dyn VaultAccessor>,
    board: StatusBoard,
    target: Target,
    polling: PollingConfig,
    processing: AtomicBool,
    consecutive_failures: AtomicU32,
}

impl RedemptionMachine {
    pub fn new(
        accessor: Arc<dyn VaultAccessor>,
        board: StatusBoard,
        target: Target,
        polling: PollingConfig,
    ) -> Self {
        Self {
            accessor,
            board,
            target,
            polling,
            processing: AtomicBool::new(false),
            consecutive_failures: AtomicU32::new(0),
        }
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Whether a cycle currently holds the processing guard.
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Bootstrap entries written when a session starts.
    pub fn bootstrap_entries(target: &Target, polling: &PollingConfig) -> Vec<LogEntry> {
        vec![
            LogEntry::check("Auto-redeem script started"),
            LogEntry::check(format!("Vault: {}", target.vault)),
            LogEntry::check(format!("Recipient address: {}", target.receiver)),
            LogEntry::check(format!("Operator address: {}", target.operator)),
            LogEntry::check(format!("Check interval: {}ms", polling.interval_ms)),
        ]
    }

    /// Drive cycles until the session ends or `shutdown` fires.
    ///
    /// The first cycle runs immediately. A cycle already in flight when
    /// shutdown fires runs to completion; only the next one is cancelled.
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            vault = %self.target.vault,
            operator = %self.target.operator,
            interval_ms = self.polling.interval_ms,
            "Redemption loop starting"
        );

        loop {
            if !self.board.is_running() {
                break;
            }

            let outcome = self.run_cycle().await;
            let Some(delay) = self.next_delay(&outcome) else {
                break;
            };

            tokio::select! {
                _ = sleep(delay) => {}
                _ = shutdown.recv() => {
                    tracing::debug!("Redemption loop received shutdown signal");
                    break;
                }
            }
        }

        tracing::info!("Redemption loop exited");
    }

    /// Run one check-and-maybe-redeem cycle.
    pub async fn run_cycle(&self) -> CycleOutcome {
        if !self.board.is_running() {
            return CycleOutcome::Skipped;
        }
        let Some(_guard) = ProcessingGuard::acquire(&self.processing, &self.board) else {
            tracing::trace!("Cycle already in flight, skipping");
            return CycleOutcome::Skipped;
        };

        let outcome = match self.execute().await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.fail(&e);
                CycleOutcome::Failed
            }
        };
        metrics::record_cycle(outcome.label());
        outcome
    }

    /// Delay before the next cycle, or `None` if the session is over.
    pub fn next_delay(&self, outcome: &CycleOutcome) -> Option<Duration> {
        let interval = Duration::from_millis(self.polling.interval_ms);
        match outcome {
            CycleOutcome::Redeemed { .. } if self.polling.stop_after_success => None,
            CycleOutcome::Stopped => None,
            CycleOutcome::Failed => Some(retry_delay(
                self.consecutive_failures.load(Ordering::Acquire),
                self.polling.interval_ms,
                self.polling.error_backoff_max_ms,
            )),
            _ => Some(interval),
        }
    }

    async fn execute(&self) -> Result<CycleOutcome, BlockchainError> {
        let Target {
            vault,
            receiver,
            operator,
        } = self.target;

        self.board
            .record(LogEntry::check(format!("Checking vault, address: {}", vault)));

        let position = read_position(self.accessor.as_ref(), vault, operator).await?;
        self.consecutive_failures.store(0, Ordering::Release);
        self.board.update(|state| {
            state.balance = Some(position.balance);
            state.max_redeemable = Some(position.max_redeemable);
            state.last_error = None;
        });
        self.board.record(LogEntry::check(format!(
            "Balance: {}, Max redeemable: {}",
            position.balance, position.max_redeemable
        )));

        let shares = position.redeemable();
        if shares == U256::ZERO {
            self.board
                .record(LogEntry::check("No redeemable shares available"));
            return Ok(CycleOutcome::NothingToRedeem);
        }

        // Stop may land while the reads are in flight; never submit after it.
        if !self.board.is_running() {
            tracing::info!(shares = %shares, "Session stopped before submission");
            return Ok(CycleOutcome::Stopped);
        }

        self.board.record(LogEntry::redeem(format!(
            "Found {} shares redeemable! Attempting to redeem to: {}",
            shares, receiver
        )));

        let tx_hash = self
            .accessor
            .submit_redeem(vault, shares, receiver, operator)
            .await?;
        self.board.record(
            LogEntry::redeem(format!("Transaction sent! Hash: {}", tx_hash)).with_tx_hash(tx_hash),
        );

        let receipt = self.accessor.await_confirmation(tx_hash).await?;
        if receipt.succeeded() {
            self.board.record(
                LogEntry::success(format!(
                    "Transaction confirmed successfully! Block: {}",
                    receipt.block_number
                ))
                .with_tx_hash(tx_hash)
                .with_block_number(receipt.block_number),
            );
            metrics::record_redemption();
            if self.polling.stop_after_success {
                self.board.end_session(None);
            }
            Ok(CycleOutcome::Redeemed {
                tx_hash,
                block_number: receipt.block_number,
            })
        } else {
            self.board
                .update(|state| state.last_error = Some("Transaction failed".to_string()));
            self.board.record(
                LogEntry::error("Transaction failed!")
                    .with_tx_hash(tx_hash)
                    .with_block_number(receipt.block_number),
            );
            Ok(CycleOutcome::Reverted { tx_hash })
        }
    }

    fn fail(&self, error: &BlockchainError) {
        let message = error.to_string();
        self.consecutive_failures.fetch_add(1, Ordering::AcqRel);
        metrics::record_error(error.kind());
        self.board
            .update(|state| state.last_error = Some(message.clone()));
        self.board
            .record(LogEntry::error(format!("Error: {}", message)));
    }
}

impl std::fmt::Debug for RedemptionMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedemptionMachine")
            .field("target", &self.target)
            .field("polling", &self.polling)
            .field("processing", &self.is_processing())
            .finish()
    }
}
