//! Redemption subsystem.
//!
//! # Data Flow
//! ```text
//! SessionController
//!     → machine.rs (cadence, mutual exclusion, tx lifecycle)
//!         → decision.rs (how many shares)
//!         → VaultAccessor (reads, submit, confirmation)
//!     → board.rs (state snapshot + ordered log entries)
//!         → presentation layer (watch / broadcast receivers)
//! ```

pub mod board;
pub mod decision;
pub mod machine;
pub mod state;

pub use board::StatusBoard;
pub use decision::shares_to_redeem;
pub use machine::{CycleOutcome, RedemptionMachine, Target};
pub use state::{RedemptionSnapshot, RedemptionState};
