//! Transactional money transfer engine
//!
//! A transfer debits one account, credits another and appends one transfer
//! record plus two entries, all inside a single PostgreSQL transaction.
//!
//! # Components
//!
//! - [`executor::TxExecutor`]: begin, run a unit of work, commit or roll back
//! - [`engine::TransferEngine`]: the transfer unit of work and its lock order
//! - [`error::TransferError`]: structured failure returned to callers
//!
//! # Safety Invariants
//!
//! 1. **All or nothing**: a failed transfer leaves no transfer row, no entry
//!    rows and no balance change
//! 2. **Lock order**: account rows are locked lower id first, independent of
//!    transfer direction, so concurrent transfers cannot deadlock
//! 3. **Balance floor**: a debit never drives a balance negative; the check
//!    runs inside the locked update
//! 4. **No retry**: failures are surfaced once; retry policy belongs to callers

pub mod engine;
pub mod error;
pub mod executor;
pub mod types;

// Re-exports for convenience
pub use engine::{TransferEngine, lock_order};
pub use error::{AbortCause, TransferError};
pub use executor::TxExecutor;
pub use types::{BalanceAdjustment, Side, TransferParams, TransferResult};
