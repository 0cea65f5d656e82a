//! Gateway types module
//!
//! ## Input Types
//! - [`request`]: JSON bodies and query strings, validated with `validator`
//! - [`ValidatedJson`], [`ValidatedQuery`]: extractors that reject invalid input
//!
//! ## Output Types
//! - [`ApiResponse<T>`]: Unified API response wrapper
//! - [`ApiError`]: Error response carrying HTTP status and error code
//! - [`UserResponse`], [`LoginUserResponse`]: user DTOs without secrets

pub mod request;
pub mod response;

// Re-export commonly used types at module root
pub use request::{
    CreateAccountRequest, CreateUserRequest, ListAccountsQuery, LoginUserRequest, MAX_PAGE_ID,
    TransferRequest, ValidatedJson, ValidatedQuery,
};
pub use response::{
    ApiError, ApiResponse, ApiResult, LoginUserResponse, UserResponse, created, error_codes, ok,
};
