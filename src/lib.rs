//! simplebank - account ledger backend
//!
//! Users own accounts in a single currency. Money moves between accounts
//! through transfers, each of which writes one transfer record and two
//! ledger entries and adjusts both balances inside one PostgreSQL
//! transaction.
//!
//! # Modules
//!
//! - [`transfer`] - Transfer engine and transactional executor
//! - [`account`] - Account store and supported currencies
//! - [`ledger`] - Transfer and entry store
//! - [`user`] - Users and password hashing
//! - [`token`] - Signed access tokens
//! - [`gateway`] - HTTP API
//! - [`db`] - Connection pool and migrations
//! - [`config`] / [`logging`] - Startup plumbing

pub mod account;
pub mod config;
pub mod db;
pub mod gateway;
pub mod ledger;
pub mod logging;
pub mod token;
pub mod transfer;
pub mod user;

// Convenient re-exports at crate root
pub use account::{Account, AccountRepository, Currency};
pub use db::Database;
pub use ledger::{Entry, LedgerRepository, Transfer};
pub use transfer::{TransferEngine, TransferError, TransferParams, TransferResult, TxExecutor};
