//! HTTP handlers
//!
//! - [`user`]: registration and login
//! - [`account`]: account creation and lookup (authenticated)
//! - [`transfer`]: money transfer (authenticated)
//! - [`health`]: liveness plus database ping

pub mod account;
pub mod health;
pub mod transfer;
pub mod user;

pub use account::{create_account, get_account, list_accounts};
pub use health::health_check;
pub use transfer::create_transfer;
pub use user::{create_user, login_user};
