//! Ledger - immutable transfer and entry records
//!
//! Every successful transfer appends one row to `transfers` and two rows to
//! `entries`. Rows are never updated or deleted.

pub mod models;
pub mod repository;

pub use models::{Entry, Transfer};
pub use repository::LedgerRepository;
