//! Account management module
//!
//! PostgreSQL-backed storage for monetary accounts. Balance mutation
//! primitives used by the transfer engine live in [`AccountRepository`].

pub mod currency;
pub mod models;
pub mod repository;

// Re-export commonly used types
pub use currency::{Currency, CurrencyError};
pub use models::{Account, CreateAccountParams};
pub use repository::AccountRepository;
