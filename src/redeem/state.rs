//! Observable redemption state.

use alloy::primitives::{Address, U256};
use serde::Serialize;

use crate::activity::ActivityLog;

/// Scheduler and last-read values of the current (or last) session.
///
/// Invariant: `processing` implies `running`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RedemptionState {
    pub running: bool,
    pub processing: bool,
    pub balance: Option<U256>,
    pub max_redeemable: Option<U256>,
    pub last_error: Option<String>,
}

/// Everything the presentation layer renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RedemptionSnapshot {
    #[serde(flatten)]
    pub state: RedemptionState,
    pub operator: Option<Address>,
    pub log: ActivityLog,
}
