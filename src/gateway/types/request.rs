//! Request bodies and query strings
//!
//! Field-level checks are declared with `validator`. Handlers receive
//! bodies through [`ValidatedJson`] and query strings through
//! [`ValidatedQuery`], so they never see a value that failed them.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
};
use serde::{Deserialize, de::DeserializeOwned};
use validator::{Validate, ValidationError};

use super::response::ApiError;
use crate::account::Currency;

/// Highest page number accepted by account listing
pub const MAX_PAGE_ID: i64 = 1_000_000;

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(length(min = 1))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginUserRequest {
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(length(min = 6))]
    pub password: String,
}

/// Create account request. The owner is the authenticated user.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAccountRequest {
    #[validate(custom(function = "validate_currency"))]
    pub currency: String,
}

/// Pagination for account listing
#[derive(Debug, Deserialize, Validate)]
pub struct ListAccountsQuery {
    #[validate(range(min = 1, max = MAX_PAGE_ID))]
    pub page_id: i64,
    #[validate(range(min = 5, max = 10))]
    pub page_size: i64,
}

impl ListAccountsQuery {
    /// Row offset of the page. Saturates instead of overflowing on
    /// unvalidated input.
    pub fn offset(&self) -> i64 {
        self.page_id
            .saturating_sub(1)
            .max(0)
            .saturating_mul(self.page_size.max(0))
    }
}

/// Transfer request. Both accounts must hold `currency`.
#[derive(Debug, Deserialize, Validate)]
pub struct TransferRequest {
    #[validate(range(min = 1))]
    pub from_account_id: i64,
    #[validate(range(min = 1))]
    pub to_account_id: i64,
    #[validate(range(min = 1))]
    pub amount: i64,
    #[validate(custom(function = "validate_currency"))]
    pub currency: String,
}

fn validate_currency(currency: &str) -> Result<(), ValidationError> {
    if Currency::is_supported(currency) {
        Ok(())
    } else {
        Err(ValidationError::new("currency"))
    }
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    let valid = !username.is_empty()
        && username.len() <= 64
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("username"))
    }
}

// ============================================================================
// Validating extractors
// ============================================================================

/// JSON body that deserialized and passed `validate()`.
///
/// Malformed bodies and failed checks are both rejected with the
/// `{code, msg}` envelope.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Query string that deserialized and passed `validate()`
#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        value.validate()?;
        Ok(ValidatedQuery(value))
    }
}
