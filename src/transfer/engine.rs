//! Transfer transaction engine
//!
//! One transfer is one transaction:
//!
//! ```text
//! BEGIN
//!   INSERT transfers (from, to, amount)
//!   INSERT entries   (from, -amount)
//!   INSERT entries   (to,   +amount)
//!   UPDATE accounts  (lower id first)
//!   UPDATE accounts  (higher id second)
//! COMMIT
//! ```
//!
//! Both balance updates take an exclusive row lock held until commit. The
//! lower account id is always locked first, whichever side it is on, so two
//! transfers running in opposite directions between the same accounts queue
//! on the same row instead of waiting on each other.

use sqlx::{PgConnection, PgPool};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::error::TransferError;
use super::executor::TxExecutor;
use super::types::{BalanceAdjustment, Side, TransferParams, TransferResult};
use crate::account::{Account, AccountRepository};
use crate::config::TransferConfig;
use crate::ledger::LedgerRepository;

/// Order the two balance adjustments of a transfer by account id.
///
/// The debit goes first when both sides name the same account so the
/// balance floor is checked before the credit lands.
pub fn lock_order(params: &TransferParams) -> [BalanceAdjustment; 2] {
    let debit = BalanceAdjustment::debit(params.from_account_id, params.amount);
    let credit = BalanceAdjustment::credit(params.to_account_id, params.amount);

    if params.to_account_id < params.from_account_id {
        [credit, debit]
    } else {
        [debit, credit]
    }
}

/// Executes money transfers atomically
#[derive(Clone)]
pub struct TransferEngine {
    executor: TxExecutor,
}

impl TransferEngine {
    pub fn new(executor: TxExecutor) -> Self {
        Self { executor }
    }

    /// Build an engine over `pool` with the configured lock and transaction limits
    pub fn from_config(pool: PgPool, config: &TransferConfig) -> Self {
        let executor = TxExecutor::new(pool)
            .with_lock_timeout(config.lock_timeout())
            .with_tx_timeout(config.tx_timeout());
        Self::new(executor)
    }

    pub fn executor(&self) -> &TxExecutor {
        &self.executor
    }

    /// Move `amount` from one account to another
    pub async fn execute(&self, params: TransferParams) -> Result<TransferResult, TransferError> {
        self.execute_until(params, None).await
    }

    /// Like [`execute`](Self::execute), rolling back if `deadline` passes first
    pub async fn execute_until(
        &self,
        params: TransferParams,
        deadline: Option<Instant>,
    ) -> Result<TransferResult, TransferError> {
        debug!(
            from_account_id = params.from_account_id,
            to_account_id = params.to_account_id,
            amount = params.amount,
            "Transfer started"
        );

        let result = self
            .executor
            .run_atomic_until(deadline, move |conn| Box::pin(transfer_tx(conn, params)))
            .await;

        match &result {
            Ok(res) => info!(
                transfer_id = res.transfer.id,
                from_account_id = params.from_account_id,
                to_account_id = params.to_account_id,
                amount = params.amount,
                "Transfer committed"
            ),
            Err(e) => warn!(
                from_account_id = params.from_account_id,
                to_account_id = params.to_account_id,
                amount = params.amount,
                code = e.code(),
                error = %e,
                "Transfer failed"
            ),
        }

        result
    }
}

/// The unit of work run inside the transaction
async fn transfer_tx(
    conn: &mut PgConnection,
    params: TransferParams,
) -> Result<TransferResult, TransferError> {
    let TransferParams {
        from_account_id,
        to_account_id,
        amount,
    } = params;

    let transfer = LedgerRepository::insert_transfer(&mut *conn, from_account_id, to_account_id, amount)
        .await
        .map_err(|e| TransferError::from(e).resolve_missing_account(from_account_id, to_account_id))?;

    let from_entry = LedgerRepository::insert_entry(&mut *conn, from_account_id, -amount).await?;
    let to_entry = LedgerRepository::insert_entry(&mut *conn, to_account_id, amount).await?;

    let [first, second] = lock_order(&params);
    let first_account = apply_adjustment(conn, first).await?;
    let second_account = apply_adjustment(conn, second).await?;

    let (mut from_account, to_account) = match first.side {
        Side::Debit => (first_account, second_account),
        Side::Credit => (second_account, first_account),
    };

    // Self-transfer: both adjustments hit one row; report its final state
    if from_account_id == to_account_id {
        from_account = to_account.clone();
    }

    Ok(TransferResult {
        transfer,
        from_entry,
        to_entry,
        from_account,
        to_account,
    })
}

async fn apply_adjustment(
    conn: &mut PgConnection,
    adjustment: BalanceAdjustment,
) -> Result<Account, TransferError> {
    let account_id = adjustment.account_id;
    let updated = match adjustment.side {
        Side::Debit => AccountRepository::debit(&mut *conn, account_id, adjustment.amount).await?,
        Side::Credit => {
            AccountRepository::add_balance(&mut *conn, account_id, adjustment.delta()).await?
        }
    };

    if let Some(account) = updated {
        return Ok(account);
    }

    // No row matched: either the account is gone or the floor rejected the debit
    match AccountRepository::get_for_update(&mut *conn, account_id).await? {
        None => Err(TransferError::NotFound(account_id)),
        Some(_) => Err(TransferError::InsufficientBalance { account_id }),
    }
}
