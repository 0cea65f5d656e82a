//! Transfer handler
//!
//! Checks that both accounts exist, hold the requested currency and that
//! the caller owns the source account, then hands off to the engine.

use std::sync::Arc;

use axum::{Extension, extract::State};

use super::super::state::AppState;
use super::super::types::{ApiError, ApiResult, TransferRequest, ValidatedJson, error_codes, ok};
use crate::account::{Account, AccountRepository};
use crate::token::Payload;
use crate::transfer::{TransferError, TransferParams, TransferResult};

/// Move money between two accounts
///
/// POST /transfers
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    Extension(payload): Extension<Payload>,
    ValidatedJson(req): ValidatedJson<TransferRequest>,
) -> ApiResult<TransferResult> {
    // 1. Field checks beyond the validated body
    if req.from_account_id == req.to_account_id {
        return Err(TransferError::SameAccount.into());
    }

    // 2. Source account: exists, right currency, owned by caller
    let from_account = valid_account(&state, req.from_account_id, &req.currency).await?;
    if from_account.owner != payload.username {
        return ApiError::unauthorized("from account doesn't belong to the authenticated user")
            .into_err();
    }

    // 3. Destination account: exists, right currency
    valid_account(&state, req.to_account_id, &req.currency).await?;

    // 4. Execute
    let params = TransferParams {
        from_account_id: req.from_account_id,
        to_account_id: req.to_account_id,
        amount: req.amount,
    };
    let result = state.engine.execute(params).await?;

    ok(result)
}

async fn valid_account(
    state: &AppState,
    account_id: i64,
    currency: &str,
) -> Result<Account, ApiError> {
    let account = AccountRepository::get(state.db.pool(), account_id)
        .await?
        .ok_or_else(|| ApiError::from(TransferError::NotFound(account_id)))?;

    if account.currency != currency {
        return ApiError::new(
            axum::http::StatusCode::BAD_REQUEST,
            error_codes::CURRENCY_MISMATCH,
            format!(
                "account [{}] currency mismatch: {} vs {}",
                account.id, account.currency, currency
            ),
        )
        .into_err();
    }

    Ok(account)
}
