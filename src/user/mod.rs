//! Users: the owners of accounts and the subjects of access tokens

pub mod models;
pub mod password;
pub mod repository;

pub use models::{CreateUserParams, User};
pub use password::{PasswordError, check_password, hash_password};
pub use repository::UserRepository;
