// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use moneyflow::error::LedgerError;
use moneyflow::ledger::{self, TransactionInput};
use moneyflow::models::{AccountType, TransactionType};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    moneyflow::db::init_schema(&mut conn).unwrap();
    conn
}

#[test]
fn add_stores_opening_balance_without_transaction() {
    let conn = setup();
    let account = ledger::create_account(
        &conn,
        "Checking",
        AccountType::Checking,
        Decimal::from(250),
        true,
    )
    .unwrap();
    assert_eq!(account.name, "Checking");
    assert!(account.is_default);

    let balance: String = conn
        .query_row(
            "SELECT balance FROM accounts WHERE name='Checking'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(balance, "250");
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 0);
}

#[test]
fn duplicate_name_rejected() {
    let conn = setup();
    ledger::create_account(&conn, "Checking", AccountType::Checking, Decimal::ZERO, false)
        .unwrap();
    let err = ledger::create_account(&conn, "Checking", AccountType::Savings, Decimal::ZERO, false)
        .unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateAccount(_)));
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM accounts", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 1);
}

#[test]
fn edit_renames_and_toggles_default() {
    let conn = setup();
    ledger::create_account(&conn, "Old", AccountType::Cash, Decimal::ZERO, false).unwrap();
    ledger::update_account(&conn, "Old", Some("New"), Some(AccountType::Savings), Some(true))
        .unwrap();

    let (typ, is_default): (String, bool) = conn
        .query_row(
            "SELECT type, is_default FROM accounts WHERE name='New'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(typ, "savings");
    assert!(is_default);
}

#[test]
fn rename_onto_existing_name_rejected() {
    let conn = setup();
    ledger::create_account(&conn, "A", AccountType::Cash, Decimal::ZERO, false).unwrap();
    ledger::create_account(&conn, "B", AccountType::Cash, Decimal::ZERO, false).unwrap();
    let err = ledger::update_account(&conn, "B", Some("A"), None, None).unwrap_err();
    assert!(matches!(err, LedgerError::DuplicateAccount(_)));
}

#[test]
fn remove_cascades_to_transactions() {
    let mut conn = setup();
    ledger::create_account(&conn, "Checking", AccountType::Checking, Decimal::from(100), false)
        .unwrap();
    ledger::create_transaction(
        &mut conn,
        &TransactionInput {
            date: NaiveDate::parse_from_str("2025-08-01", "%Y-%m-%d").unwrap(),
            account: "Checking".to_string(),
            amount: Decimal::from(20),
            r#type: TransactionType::Expense,
            category: "Food".to_string(),
            note: None,
            recurring: None,
        },
    )
    .unwrap();

    ledger::delete_account(&conn, "Checking").unwrap();
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 0);
}

#[test]
fn remove_missing_account_rejected() {
    let conn = setup();
    let err = ledger::delete_account(&conn, "Ghost").unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound(_)));
}
