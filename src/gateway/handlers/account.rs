//! Account handlers. Callers only ever see their own accounts.

use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, State, rejection::PathRejection},
};

use super::super::state::AppState;
use super::super::types::{
    ApiError, ApiResult, CreateAccountRequest, ListAccountsQuery, ValidatedJson, ValidatedQuery,
    created, error_codes, ok,
};
use crate::account::{Account, AccountRepository, CreateAccountParams};
use crate::token::Payload;

/// Open a zero-balance account for the caller
///
/// POST /accounts
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Extension(payload): Extension<Payload>,
    ValidatedJson(req): ValidatedJson<CreateAccountRequest>,
) -> ApiResult<Account> {
    let params = CreateAccountParams {
        owner: payload.username,
        balance: 0,
        currency: req.currency,
    };
    let account = AccountRepository::create(state.db.pool(), &params).await?;

    tracing::info!(
        account_id = account.id,
        owner = %account.owner,
        currency = %account.currency,
        "Account created"
    );
    created(account)
}

/// GET /accounts/{id}
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Extension(payload): Extension<Payload>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Account> {
    let Path(id) = id?;
    if id < 1 {
        return ApiError::bad_request("id must be at least 1").into_err();
    }

    let account = AccountRepository::get(state.db.pool(), id)
        .await?
        .ok_or_else(|| ApiError::not_found(error_codes::ACCOUNT_NOT_FOUND, "account not found"))?;

    if account.owner != payload.username {
        return ApiError::unauthorized("account doesn't belong to the authenticated user")
            .into_err();
    }

    ok(account)
}

/// GET /accounts?page_id=1&page_size=5
pub async fn list_accounts(
    State(state): State<Arc<AppState>>,
    Extension(payload): Extension<Payload>,
    ValidatedQuery(query): ValidatedQuery<ListAccountsQuery>,
) -> ApiResult<Vec<Account>> {
    let accounts = AccountRepository::list_by_owner(
        state.db.pool(),
        &payload.username,
        query.page_size,
        query.offset(),
    )
    .await?;

    ok(accounts)
}
