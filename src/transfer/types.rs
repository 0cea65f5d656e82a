//! Transfer request and result types

use serde::{Deserialize, Serialize};

use crate::account::Account;
use crate::ledger::{Entry, Transfer};

/// Input to one transfer. Callers guarantee both accounts exist and
/// `amount > 0`; the engine does not re-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferParams {
    pub from_account_id: i64,
    pub to_account_id: i64,
    pub amount: i64,
}

/// Everything one committed transfer produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferResult {
    pub transfer: Transfer,
    pub from_entry: Entry,
    pub to_entry: Entry,
    pub from_account: Account,
    pub to_account: Account,
}

/// Which side of the transfer a balance adjustment belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Debit,
    Credit,
}

/// One balance mutation inside a transfer transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BalanceAdjustment {
    pub account_id: i64,
    pub side: Side,
    pub amount: i64,
}

impl BalanceAdjustment {
    pub fn debit(account_id: i64, amount: i64) -> Self {
        Self {
            account_id,
            side: Side::Debit,
            amount,
        }
    }

    pub fn credit(account_id: i64, amount: i64) -> Self {
        Self {
            account_id,
            side: Side::Credit,
            amount,
        }
    }

    /// Signed balance change
    pub fn delta(&self) -> i64 {
        match self.side {
            Side::Debit => -self.amount,
            Side::Credit => self.amount,
        }
    }
}
