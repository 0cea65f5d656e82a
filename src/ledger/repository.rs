//! Repository layer for the append-only ledger tables

use sqlx::PgExecutor;

use super::models::{Entry, Transfer};

/// Ledger repository. Writes are inserts only.
pub struct LedgerRepository;

impl LedgerRepository {
    /// Append a transfer record
    pub async fn insert_transfer<'e, E>(
        executor: E,
        from_account_id: i64,
        to_account_id: i64,
        amount: i64,
    ) -> Result<Transfer, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Transfer>(
            r#"INSERT INTO transfers (from_account_id, to_account_id, amount)
               VALUES ($1, $2, $3)
               RETURNING id, from_account_id, to_account_id, amount, created_at"#,
        )
        .bind(from_account_id)
        .bind(to_account_id)
        .bind(amount)
        .fetch_one(executor)
        .await
    }

    /// Append an entry record
    pub async fn insert_entry<'e, E>(executor: E, account_id: i64, amount: i64) -> Result<Entry, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Entry>(
            r#"INSERT INTO entries (account_id, amount)
               VALUES ($1, $2)
               RETURNING id, account_id, amount, created_at"#,
        )
        .bind(account_id)
        .bind(amount)
        .fetch_one(executor)
        .await
    }

    /// Get transfer by ID
    pub async fn get_transfer<'e, E>(executor: E, id: i64) -> Result<Option<Transfer>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Transfer>(
            r#"SELECT id, from_account_id, to_account_id, amount, created_at
               FROM transfers WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// List transfers touching `account_id` in either direction, oldest first
    pub async fn list_transfers<'e, E>(
        executor: E,
        account_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Transfer>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Transfer>(
            r#"SELECT id, from_account_id, to_account_id, amount, created_at
               FROM transfers
               WHERE from_account_id = $1 OR to_account_id = $1
               ORDER BY id
               LIMIT $2 OFFSET $3"#,
        )
        .bind(account_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await
    }

    /// Get entry by ID
    pub async fn get_entry<'e, E>(executor: E, id: i64) -> Result<Option<Entry>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Entry>(
            "SELECT id, account_id, amount, created_at FROM entries WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// List entries of `account_id`, oldest first
    pub async fn list_entries<'e, E>(
        executor: E,
        account_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Entry>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_as::<_, Entry>(
            r#"SELECT id, account_id, amount, created_at
               FROM entries WHERE account_id = $1
               ORDER BY id
               LIMIT $2 OFFSET $3"#,
        )
        .bind(account_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await
    }

    /// Sum of all entry amounts for `account_id` (0 if none)
    pub async fn sum_entries<'e, E>(executor: E, account_id: i64) -> Result<i64, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        sqlx::query_scalar::<_, i64>(
            "SELECT COALESCE(SUM(amount), 0)::BIGINT FROM entries WHERE account_id = $1",
        )
        .bind(account_id)
        .fetch_one(executor)
        .await
    }
}
