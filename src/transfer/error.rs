//! Transfer Error Types
//!
//! One structured error per failed transfer. Store failures are classified
//! by Postgres SQLSTATE so callers can decide whether a retry makes sense.

use thiserror::Error;

/// Foreign key from `transfers.from_account_id` to `accounts.id`
pub const FROM_ACCOUNT_FKEY: &str = "transfers_from_account_id_fkey";
/// Foreign key from `transfers.to_account_id` to `accounts.id`
pub const TO_ACCOUNT_FKEY: &str = "transfers_to_account_id_fkey";

/// Why a transaction was rolled back by the store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbortCause {
    #[error("lock wait timed out")]
    LockTimeout,

    #[error("deadlock detected")]
    Deadlock,

    #[error("serialization failure")]
    SerializationFailure,

    #[error("cancelled or deadline exceeded")]
    Cancelled,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),
}

/// Transfer error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    // === Request validation (raised by the request layer) ===
    #[error("Source and target account cannot be the same")]
    SameAccount,

    #[error("Amount must be greater than zero")]
    InvalidAmount,

    // === Account errors ===
    #[error("Account not found: {0}")]
    NotFound(i64),

    #[error("Insufficient balance in account {account_id}")]
    InsufficientBalance { account_id: i64 },

    // === Store errors ===
    #[error("Constraint violation: {message}")]
    ConstraintViolation {
        constraint: Option<String>,
        message: String,
    },

    #[error("Transaction aborted: {0}")]
    Aborted(AbortCause),

    #[error("{source}; rollback also failed: {rollback}")]
    RollbackFailed {
        source: Box<TransferError>,
        rollback: String,
    },
}

impl TransferError {
    /// Get the error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::SameAccount => "SAME_ACCOUNT",
            TransferError::InvalidAmount => "INVALID_AMOUNT",
            TransferError::NotFound(_) => "ACCOUNT_NOT_FOUND",
            TransferError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            TransferError::ConstraintViolation { .. } => "CONSTRAINT_VIOLATION",
            TransferError::Aborted(_) => "ABORTED",
            TransferError::RollbackFailed { .. } => "ROLLBACK_FAILED",
        }
    }

    /// Get HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            TransferError::SameAccount | TransferError::InvalidAmount => 400,
            TransferError::NotFound(_) => 404,
            TransferError::InsufficientBalance { .. } => 422,
            TransferError::ConstraintViolation { .. }
            | TransferError::Aborted(_)
            | TransferError::RollbackFailed { .. } => 500,
        }
    }

    /// Transient failures worth retrying as a fresh transaction
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransferError::Aborted(
                AbortCause::LockTimeout | AbortCause::Deadlock | AbortCause::SerializationFailure
            )
        )
    }

    /// Map a SQLSTATE and server message onto the taxonomy
    pub fn from_sqlstate(code: &str, constraint: Option<&str>, message: &str) -> Self {
        match code {
            "55P03" => TransferError::Aborted(AbortCause::LockTimeout),
            "40P01" => TransferError::Aborted(AbortCause::Deadlock),
            "40001" => TransferError::Aborted(AbortCause::SerializationFailure),
            "57014" => TransferError::Aborted(AbortCause::Cancelled),
            c if c.starts_with("23") => TransferError::ConstraintViolation {
                constraint: constraint.map(str::to_string),
                message: message.to_string(),
            },
            c if c.starts_with("08") => {
                TransferError::Aborted(AbortCause::Connection(message.to_string()))
            }
            _ => TransferError::Aborted(AbortCause::Database(format!("{}: {}", code, message))),
        }
    }

    /// Resolve a foreign-key violation on the transfer row to the missing account
    pub fn resolve_missing_account(self, from_account_id: i64, to_account_id: i64) -> Self {
        match &self {
            TransferError::ConstraintViolation {
                constraint: Some(name),
                ..
            } => match name.as_str() {
                FROM_ACCOUNT_FKEY => TransferError::NotFound(from_account_id),
                TO_ACCOUNT_FKEY => TransferError::NotFound(to_account_id),
                _ => self,
            },
            _ => self,
        }
    }
}

impl From<sqlx::Error> for TransferError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) => {
                let code = db.code().map(|c| c.into_owned()).unwrap_or_default();
                TransferError::from_sqlstate(&code, db.constraint(), db.message())
            }
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => {
                TransferError::Aborted(AbortCause::Connection(e.to_string()))
            }
            _ => TransferError::Aborted(AbortCause::Database(e.to_string())),
        }
    }
}
