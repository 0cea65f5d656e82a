//! Repository layer for account rows
//!
//! Every function is generic over [`PgExecutor`] so the same query runs
//! against the pool or inside an open transaction.

use sqlx::PgExecutor;

use super::models::{Account, CreateAccountParams};

/// Account repository for CRUD and balance mutation
pub struct AccountRepository;

impl AccountRepository {
    /// Create a new account
    pub async fn create<'e, E>(executor: E, params: &CreateAccountParams) -> Result<Account, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Account>(
            r#"INSERT INTO accounts (owner, balance, currency)
               VALUES ($1, $2, $3)
               RETURNING id, owner, balance, currency, created_at"#,
        )
        .bind(&params.owner)
        .bind(params.balance)
        .bind(&params.currency)
        .fetch_one(executor)
        .await
    }

    /// Get account by ID
    pub async fn get<'e, E>(executor: E, id: i64) -> Result<Option<Account>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Account>(
            "SELECT id, owner, balance, currency, created_at FROM accounts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Get account by ID and hold its row lock until the transaction ends.
    ///
    /// Uses `FOR NO KEY UPDATE`: it excludes other balance writers but not the
    /// `FOR KEY SHARE` locks that ledger inserts take through their foreign keys.
    pub async fn get_for_update<'e, E>(executor: E, id: i64) -> Result<Option<Account>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Account>(
            r#"SELECT id, owner, balance, currency, created_at
               FROM accounts WHERE id = $1
               FOR NO KEY UPDATE"#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Atomically apply `delta` to the balance and return the updated row.
    ///
    /// Returns `None` if the account does not exist.
    pub async fn add_balance<'e, E>(executor: E, id: i64, delta: i64) -> Result<Option<Account>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Account>(
            r#"UPDATE accounts SET balance = balance + $2
               WHERE id = $1
               RETURNING id, owner, balance, currency, created_at"#,
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(executor)
        .await
    }

    /// Atomically subtract `amount` unless the balance would go negative.
    ///
    /// The floor predicate is evaluated on the locked row, so concurrent
    /// debits cannot overdraw. Returns `None` if the account does not exist
    /// or holds less than `amount`.
    pub async fn debit<'e, E>(executor: E, id: i64, amount: i64) -> Result<Option<Account>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Account>(
            r#"UPDATE accounts SET balance = balance - $2
               WHERE id = $1 AND balance >= $2
               RETURNING id, owner, balance, currency, created_at"#,
        )
        .bind(id)
        .bind(amount)
        .fetch_optional(executor)
        .await
    }

    /// Overwrite the balance (administrative update)
    pub async fn update_balance<'e, E>(executor: E, id: i64, balance: i64) -> Result<Option<Account>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Account>(
            r#"UPDATE accounts SET balance = $2
               WHERE id = $1
               RETURNING id, owner, balance, currency, created_at"#,
        )
        .bind(id)
        .bind(balance)
        .fetch_optional(executor)
        .await
    }

    /// Delete an account. Returns true if a row was removed.
    pub async fn delete<'e, E>(executor: E, id: i64) -> Result<bool, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List accounts owned by `owner`, oldest first
    pub async fn list_by_owner<'e, E>(
        executor: E,
        owner: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Account>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Account>(
            r#"SELECT id, owner, balance, currency, created_at
               FROM accounts WHERE owner = $1
               ORDER BY id
               LIMIT $2 OFFSET $3"#,
        )
        .bind(owner)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await
    }
}
