// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::error::LedgerError;
use crate::models::{
    Account, AccountType, Budget, BudgetPeriod, Category, Frequency, RecurringTransaction,
    Transaction, TransactionType,
};

pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Food",
    "Transport",
    "Entertainment",
    "Shopping",
    "Bills",
    "Other",
];

#[derive(Debug, Clone)]
pub struct TransactionInput {
    pub date: NaiveDate,
    pub account: String,
    /// Positive magnitude; the sign is derived from `r#type`.
    pub amount: Decimal,
    pub r#type: TransactionType,
    pub category: String,
    pub note: Option<String>,
    pub recurring: Option<RecurringInput>,
}

#[derive(Debug, Clone)]
pub struct RecurringInput {
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct TransferInput {
    pub date: NaiveDate,
    pub from: String,
    pub to: String,
    pub amount: Decimal,
    pub note: Option<String>,
}

fn decimal_col(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = row.get(idx)?;
    Decimal::from_str_exact(&s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn account_row(conn: &Connection, name: &str) -> Result<(i64, Decimal), LedgerError> {
    let row: Option<(i64, Decimal)> = conn
        .query_row(
            "SELECT id, balance FROM accounts WHERE name=?1",
            params![name],
            |r| Ok((r.get(0)?, decimal_col(r, 1)?)),
        )
        .optional()?;
    row.ok_or_else(|| LedgerError::AccountNotFound(name.to_string()))
}

pub fn create_account(
    conn: &Connection,
    name: &str,
    r#type: AccountType,
    initial_balance: Decimal,
    is_default: bool,
) -> Result<Account, LedgerError> {
    let exists: Option<i64> = conn
        .query_row(
            "SELECT id FROM accounts WHERE name=?1",
            params![name],
            |r| r.get(0),
        )
        .optional()?;
    if exists.is_some() {
        return Err(LedgerError::DuplicateAccount(name.to_string()));
    }
    conn.execute(
        "INSERT INTO accounts(name, type, balance, is_default) VALUES (?1, ?2, ?3, ?4)",
        params![name, r#type.as_str(), initial_balance.to_string(), is_default],
    )?;
    let id = conn.last_insert_rowid();
    let created_at: String = conn.query_row(
        "SELECT created_at FROM accounts WHERE id=?1",
        params![id],
        |r| r.get(0),
    )?;
    Ok(Account {
        id,
        name: name.to_string(),
        r#type,
        balance: initial_balance,
        is_default,
        created_at,
    })
}

/// Field updates only; the balance is never editable directly.
pub fn update_account(
    conn: &Connection,
    name: &str,
    new_name: Option<&str>,
    r#type: Option<AccountType>,
    is_default: Option<bool>,
) -> Result<(), LedgerError> {
    let (id, _) = account_row(conn, name)?;
    if let Some(new_name) = new_name {
        let clash: Option<i64> = conn
            .query_row(
                "SELECT id FROM accounts WHERE name=?1 AND id<>?2",
                params![new_name, id],
                |r| r.get(0),
            )
            .optional()?;
        if clash.is_some() {
            return Err(LedgerError::DuplicateAccount(new_name.to_string()));
        }
        conn.execute(
            "UPDATE accounts SET name=?1 WHERE id=?2",
            params![new_name, id],
        )?;
    }
    if let Some(t) = r#type {
        conn.execute(
            "UPDATE accounts SET type=?1 WHERE id=?2",
            params![t.as_str(), id],
        )?;
    }
    if let Some(d) = is_default {
        conn.execute(
            "UPDATE accounts SET is_default=?1 WHERE id=?2",
            params![d, id],
        )?;
    }
    Ok(())
}

/// Removes the account; its transactions go with it via FK cascade.
pub fn delete_account(conn: &Connection, name: &str) -> Result<(), LedgerError> {
    let n = conn.execute("DELETE FROM accounts WHERE name=?1", params![name])?;
    if n == 0 {
        return Err(LedgerError::AccountNotFound(name.to_string()));
    }
    Ok(())
}

/// Records a transaction and applies every side effect in one unit of work:
/// the signed amount lands on the account balance, an optional recurring link
/// is created, and for expenses the matching budgets accumulate the spend.
pub fn create_transaction(
    conn: &mut Connection,
    input: &TransactionInput,
) -> Result<Transaction, LedgerError> {
    if input.amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(input.amount));
    }
    let tx = conn.transaction()?;
    let (account_id, balance) = account_row(&tx, &input.account)?;
    if input.r#type == TransactionType::Expense && balance < input.amount {
        return Err(LedgerError::InsufficientFunds {
            balance,
            requested: input.amount,
        });
    }
    let signed = match input.r#type {
        TransactionType::Expense => -input.amount,
        _ => input.amount,
    };
    let is_recurring = input.recurring.is_some();
    tx.execute(
        "INSERT INTO transactions(date, account_id, amount, category, type, note, is_recurring)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            input.date.to_string(),
            account_id,
            signed.to_string(),
            input.category,
            input.r#type.as_str(),
            input.note,
            is_recurring
        ],
    )?;
    let id = tx.last_insert_rowid();
    tx.execute(
        "UPDATE accounts SET balance=?1 WHERE id=?2",
        params![(balance + signed).to_string(), account_id],
    )?;
    if let Some(rec) = &input.recurring {
        tx.execute(
            "INSERT INTO recurring_transactions(transaction_id, frequency, start_date, end_date, last_processed)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                id,
                rec.frequency.as_str(),
                rec.start_date.to_string(),
                rec.end_date.map(|d| d.to_string()),
                Utc::now().to_rfc3339()
            ],
        )?;
    }
    if input.r#type == TransactionType::Expense {
        update_budget_spending(&tx, &input.category, signed)?;
    }
    tx.commit()?;
    Ok(Transaction {
        id,
        date: input.date,
        account_id,
        amount: signed,
        category: input.category.clone(),
        r#type: input.r#type,
        note: input.note.clone(),
        is_recurring,
    })
}

/// Moves funds between two accounts as a withdrawal/deposit pair. On any
/// failure nothing is written: both rows and both balance updates commit
/// together or not at all.
pub fn create_transfer(
    conn: &mut Connection,
    input: &TransferInput,
) -> Result<(Transaction, Transaction), LedgerError> {
    if input.amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount(input.amount));
    }
    if input.from == input.to {
        return Err(LedgerError::SameAccount(input.from.clone()));
    }
    let tx = conn.transaction()?;
    let (from_id, from_balance) = account_row(&tx, &input.from)?;
    let (to_id, to_balance) = account_row(&tx, &input.to)?;
    if from_balance < input.amount {
        return Err(LedgerError::InsufficientFunds {
            balance: from_balance,
            requested: input.amount,
        });
    }

    let suffix = match &input.note {
        Some(n) => format!(": {}", n),
        None => String::new(),
    };
    let withdrawal_note = format!("Transfer to {}{}", input.to, suffix);
    let deposit_note = format!("Transfer from {}{}", input.from, suffix);
    let date_s = input.date.to_string();

    let mut insert = tx.prepare_cached(
        "INSERT INTO transactions(date, account_id, amount, category, type, note, is_recurring)
         VALUES (?1, ?2, ?3, 'Transfer', 'transfer', ?4, 0)",
    )?;
    insert.execute(params![
        date_s,
        from_id,
        (-input.amount).to_string(),
        withdrawal_note
    ])?;
    let withdrawal_id = tx.last_insert_rowid();
    insert.execute(params![date_s, to_id, input.amount.to_string(), deposit_note])?;
    let deposit_id = tx.last_insert_rowid();
    drop(insert);

    let mut update = tx.prepare_cached("UPDATE accounts SET balance=?1 WHERE id=?2")?;
    update.execute(params![(from_balance - input.amount).to_string(), from_id])?;
    update.execute(params![(to_balance + input.amount).to_string(), to_id])?;
    drop(update);

    tx.commit()?;
    Ok((
        Transaction {
            id: withdrawal_id,
            date: input.date,
            account_id: from_id,
            amount: -input.amount,
            category: "Transfer".to_string(),
            r#type: TransactionType::Transfer,
            note: Some(withdrawal_note),
            is_recurring: false,
        },
        Transaction {
            id: deposit_id,
            date: input.date,
            account_id: to_id,
            amount: input.amount,
            category: "Transfer".to_string(),
            r#type: TransactionType::Transfer,
            note: Some(deposit_note),
            is_recurring: false,
        },
    ))
}

/// Attaches a recurrence schedule to an existing transaction. The link is
/// declarative: nothing ever advances `last_processed` or materializes
/// future occurrences.
pub fn create_recurring(
    conn: &mut Connection,
    transaction_id: i64,
    frequency: Frequency,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
) -> Result<RecurringTransaction, LedgerError> {
    let tx = conn.transaction()?;
    let exists: Option<i64> = tx
        .query_row(
            "SELECT id FROM transactions WHERE id=?1",
            params![transaction_id],
            |r| r.get(0),
        )
        .optional()?;
    if exists.is_none() {
        return Err(LedgerError::TransactionNotFound(transaction_id));
    }
    let last_processed = Utc::now().to_rfc3339();
    tx.execute(
        "INSERT INTO recurring_transactions(transaction_id, frequency, start_date, end_date, last_processed)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            transaction_id,
            frequency.as_str(),
            start_date.to_string(),
            end_date.map(|d| d.to_string()),
            last_processed
        ],
    )?;
    let id = tx.last_insert_rowid();
    tx.execute(
        "UPDATE transactions SET is_recurring=1 WHERE id=?1",
        params![transaction_id],
    )?;
    tx.commit()?;
    Ok(RecurringTransaction {
        id,
        transaction_id,
        frequency,
        start_date,
        end_date,
        last_processed,
    })
}

pub fn create_budget(
    conn: &Connection,
    category: &str,
    limit: Decimal,
    period: BudgetPeriod,
) -> Result<Budget, LedgerError> {
    conn.execute(
        "INSERT INTO budgets(category, limit_amount, period, spent) VALUES (?1, ?2, ?3, '0')",
        params![category, limit.to_string(), period.as_str()],
    )?;
    Ok(Budget {
        id: conn.last_insert_rowid(),
        category: category.to_string(),
        limit,
        period,
        spent: Decimal::ZERO,
    })
}

/// Adds `abs(amount)` to the spent total of every budget whose category
/// matches exactly (case-sensitive). `spent` only ever grows; no reset path
/// exists.
pub fn update_budget_spending(
    conn: &Connection,
    category: &str,
    amount: Decimal,
) -> Result<(), LedgerError> {
    let mut stmt = conn.prepare("SELECT id, period, spent FROM budgets WHERE category=?1")?;
    let rows = stmt.query_map(params![category], |r| {
        Ok((r.get::<_, i64>(0)?, r.get::<_, String>(1)?, decimal_col(r, 2)?))
    })?;
    let mut updates = Vec::new();
    for row in rows {
        let (id, period, spent) = row?;
        if !period_is_current(&period) {
            continue;
        }
        updates.push((id, spent + amount.abs()));
    }
    drop(stmt);
    for (id, spent) in updates {
        conn.execute(
            "UPDATE budgets SET spent=?1 WHERE id=?2",
            params![spent.to_string(), id],
        )?;
    }
    Ok(())
}

// Period scoping hook. Every known period answers true, so spent accumulates
// across period boundaries; only an unknown period is skipped.
fn period_is_current(period: &str) -> bool {
    matches!(period, "weekly" | "monthly" | "yearly")
}

/// Reverses the balance delta and removes the row in one unit of work.
/// Budgets are left alone: spent is monotonic.
pub fn delete_transaction(conn: &mut Connection, id: i64) -> Result<(), LedgerError> {
    let tx = conn.transaction()?;
    let row: Option<(i64, Decimal)> = tx
        .query_row(
            "SELECT account_id, amount FROM transactions WHERE id=?1",
            params![id],
            |r| Ok((r.get(0)?, decimal_col(r, 1)?)),
        )
        .optional()?;
    let Some((account_id, amount)) = row else {
        return Err(LedgerError::TransactionNotFound(id));
    };
    let balance: Decimal = tx.query_row(
        "SELECT balance FROM accounts WHERE id=?1",
        params![account_id],
        |r| decimal_col(r, 0),
    )?;
    tx.execute(
        "UPDATE accounts SET balance=?1 WHERE id=?2",
        params![(balance - amount).to_string(), account_id],
    )?;
    tx.execute("DELETE FROM transactions WHERE id=?1", params![id])?;
    tx.commit()?;
    Ok(())
}

pub fn category_exists(conn: &Connection, name: &str) -> Result<bool, LedgerError> {
    let n: i64 = conn.query_row(
        "SELECT COUNT(*) FROM categories WHERE name=?1 COLLATE NOCASE",
        params![name],
        |r| r.get(0),
    )?;
    Ok(n > 0)
}

pub fn create_category(conn: &Connection, name: &str) -> Result<Category, LedgerError> {
    if category_exists(conn, name)? {
        return Err(LedgerError::DuplicateCategory(name.to_string()));
    }
    conn.execute("INSERT INTO categories(name) VALUES (?1)", params![name])?;
    let id = conn.last_insert_rowid();
    let created_at: String = conn.query_row(
        "SELECT created_at FROM categories WHERE id=?1",
        params![id],
        |r| r.get(0),
    )?;
    Ok(Category {
        id,
        name: name.to_string(),
        created_at,
    })
}

pub fn delete_category(conn: &Connection, name: &str) -> Result<(), LedgerError> {
    let n = conn.execute(
        "DELETE FROM categories WHERE name=?1 COLLATE NOCASE",
        params![name],
    )?;
    if n == 0 {
        return Err(LedgerError::CategoryNotFound(name.to_string()));
    }
    Ok(())
}

/// Creates any of the default categories that are missing. Runs on every
/// startup, so a deleted default reappears on the next launch.
pub fn seed_default_categories(conn: &Connection) -> Result<(), LedgerError> {
    for name in DEFAULT_CATEGORIES {
        if !category_exists(conn, name)? {
            conn.execute("INSERT INTO categories(name) VALUES (?1)", params![name])?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_hook_accepts_all_known_periods() {
        assert!(period_is_current("weekly"));
        assert!(period_is_current("monthly"));
        assert!(period_is_current("yearly"));
        assert!(!period_is_current("quarterly"));
    }
}
