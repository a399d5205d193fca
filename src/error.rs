// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use thiserror::Error;

/// Failure modes of the ledger operations in [`crate::ledger`].
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid amount {0}: must be greater than zero")]
    InvalidAmount(Decimal),

    #[error("Insufficient funds: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: Decimal, requested: Decimal },

    #[error("Cannot transfer within the same account '{0}'")]
    SameAccount(String),

    #[error("Account '{0}' already exists")]
    DuplicateAccount(String),

    #[error("Category '{0}' already exists")]
    DuplicateCategory(String),

    #[error("Account '{0}' not found")]
    AccountNotFound(String),

    #[error("Category '{0}' not found")]
    CategoryNotFound(String),

    #[error("Transaction {0} not found")]
    TransactionNotFound(i64),

    #[error("Save failed: {0}")]
    Save(#[from] rusqlite::Error),
}
