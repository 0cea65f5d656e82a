//! Transactional executor
//!
//! Runs a unit of work inside one PostgreSQL transaction and guarantees
//! exactly one terminal action per call: commit on success, rollback on
//! error. If the caller drops the returned future mid-flight, the sqlx
//! transaction guard rolls back when it is dropped.
//!
//! Deadlines are enforced on the server. A statement still running on the
//! backend (a row-lock wait, typically) keeps the connection busy, so the
//! rollback could not be sent until it finished. The transaction therefore
//! carries `statement_timeout` set to the time left, and if the local timer
//! fires first the backend is cancelled with `pg_cancel_backend`.

use futures::future::BoxFuture;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, error, warn};

use super::error::{AbortCause, TransferError};

/// Unit of work bound to an open transaction
pub type UnitOfWork<'c, T> = BoxFuture<'c, Result<T, TransferError>>;

/// Begins, commits and rolls back transactions on behalf of the engine
#[derive(Clone)]
pub struct TxExecutor {
    pool: PgPool,
    lock_timeout: Option<Duration>,
    tx_timeout: Option<Duration>,
}

impl TxExecutor {
    /// Create an executor without lock or transaction time limits
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            lock_timeout: None,
            tx_timeout: None,
        }
    }

    /// Bound every row-lock wait inside the transaction (`SET LOCAL lock_timeout`)
    pub fn with_lock_timeout(mut self, lock_timeout: Option<Duration>) -> Self {
        self.lock_timeout = lock_timeout;
        self
    }

    /// Bound the whole unit of work, commit excluded
    pub fn with_tx_timeout(mut self, tx_timeout: Option<Duration>) -> Self {
        self.tx_timeout = tx_timeout;
        self
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run `unit` atomically
    pub async fn run_atomic<T, F>(&self, unit: F) -> Result<T, TransferError>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut PgConnection) -> UnitOfWork<'c, T> + Send,
    {
        self.run_atomic_until(None, unit).await
    }

    /// Run `unit` atomically, aborting if `deadline` (or the configured
    /// transaction timeout, whichever is earlier) passes first
    pub async fn run_atomic_until<T, F>(
        &self,
        deadline: Option<Instant>,
        unit: F,
    ) -> Result<T, TransferError>
    where
        T: Send,
        F: for<'c> FnOnce(&'c mut PgConnection) -> UnitOfWork<'c, T> + Send,
    {
        let deadline = earliest(deadline, self.tx_timeout.map(|t| Instant::now() + t));

        let remaining = match deadline {
            Some(at) => match time_left(at, Instant::now()) {
                Some(left) => Some(left),
                None => {
                    warn!("Deadline passed before the transaction started");
                    return Err(TransferError::Aborted(AbortCause::Cancelled));
                }
            },
            None => None,
        };

        let mut tx = self.pool.begin().await?;

        let backend_pid = match configure(&mut tx, self.lock_timeout, remaining).await {
            Ok(pid) => pid,
            Err(e) => return Self::abort(tx, e.into()).await,
        };

        let outcome = match deadline {
            Some(at) => match tokio::time::timeout_at(at, unit(&mut *tx)).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    warn!(backend_pid = ?backend_pid, "Unit of work exceeded its deadline");
                    if let Some(pid) = backend_pid {
                        self.cancel_backend(pid).await;
                    }
                    Err(TransferError::Aborted(AbortCause::Cancelled))
                }
            },
            None => unit(&mut *tx).await,
        };

        match outcome {
            Ok(value) => {
                tx.commit().await?;
                debug!("Transaction committed");
                Ok(value)
            }
            Err(err) => Self::abort(tx, err).await,
        }
    }

    /// Interrupt whatever the transaction's backend is running so the
    /// connection is free to roll back
    async fn cancel_backend(&self, pid: i32) {
        match sqlx::query_scalar::<_, bool>("SELECT pg_cancel_backend($1)")
            .bind(pid)
            .fetch_one(&self.pool)
            .await
        {
            Ok(true) => debug!(backend_pid = pid, "Backend cancelled"),
            Ok(false) => debug!(backend_pid = pid, "Backend had nothing to cancel"),
            Err(e) => error!(backend_pid = pid, error = %e, "Failed to cancel backend"),
        }
    }

    /// Roll back and surface `err`, or both errors if the rollback fails too
    async fn abort<T>(tx: Transaction<'static, Postgres>, err: TransferError) -> Result<T, TransferError> {
        match tx.rollback().await {
            Ok(()) => {
                debug!(error = %err, "Transaction rolled back");
                Err(err)
            }
            Err(rollback_err) => {
                error!(error = %err, rollback_error = %rollback_err, "Rollback failed");
                Err(TransferError::RollbackFailed {
                    source: Box::new(err),
                    rollback: rollback_err.to_string(),
                })
            }
        }
    }
}

/// Apply transaction-local limits. Returns the backend pid when a deadline
/// is in force so the statement can be cancelled from another connection.
async fn configure(
    conn: &mut PgConnection,
    lock_timeout: Option<Duration>,
    statement_timeout: Option<Duration>,
) -> Result<Option<i32>, sqlx::Error> {
    if let Some(lock_timeout) = lock_timeout {
        set_local(&mut *conn, "lock_timeout", lock_timeout).await?;
    }

    let Some(statement_timeout) = statement_timeout else {
        return Ok(None);
    };
    set_local(&mut *conn, "statement_timeout", statement_timeout).await?;

    let pid = sqlx::query_scalar::<_, i32>("SELECT pg_backend_pid()")
        .fetch_one(conn)
        .await?;
    Ok(Some(pid))
}

async fn set_local(conn: &mut PgConnection, name: &str, value: Duration) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT set_config($1, $2, true)")
        .bind(name)
        .bind(pg_millis(value))
        .execute(conn)
        .await?;
    Ok(())
}

/// Postgres duration setting. Never `0ms`, which would disable the limit.
fn pg_millis(d: Duration) -> String {
    format!("{}ms", d.as_millis().max(1))
}

/// Time left before `deadline`, or `None` if it already passed
fn time_left(deadline: Instant, now: Instant) -> Option<Duration> {
    let left = deadline.saturating_duration_since(now);
    (!left.is_zero()).then_some(left)
}

fn earliest(a: Option<Instant>, b: Option<Instant>) -> Option<Instant> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}
