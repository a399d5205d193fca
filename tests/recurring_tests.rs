// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use moneyflow::error::LedgerError;
use moneyflow::ledger::{self, TransactionInput};
use moneyflow::models::{AccountType, Frequency, TransactionType};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    moneyflow::db::init_schema(&mut conn).unwrap();
    ledger::create_account(&conn, "Checking", AccountType::Checking, Decimal::from(100), true)
        .unwrap();
    conn
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn record_expense(conn: &mut Connection) -> i64 {
    ledger::create_transaction(
        conn,
        &TransactionInput {
            date: date("2025-08-01"),
            account: "Checking".to_string(),
            amount: Decimal::from(15),
            r#type: TransactionType::Expense,
            category: "Bills".to_string(),
            note: None,
            recurring: None,
        },
    )
    .unwrap()
    .id
}

#[test]
fn attach_links_schedule_and_sets_flag() {
    let mut conn = setup();
    let tx_id = record_expense(&mut conn);

    let rec = ledger::create_recurring(
        &mut conn,
        tx_id,
        Frequency::Weekly,
        date("2025-08-01"),
        Some(date("2025-12-31")),
    )
    .unwrap();
    assert_eq!(rec.transaction_id, tx_id);
    assert!(!rec.last_processed.is_empty());

    let (freq, end, flag): (String, Option<String>, bool) = conn
        .query_row(
            "SELECT r.frequency, r.end_date, t.is_recurring
             FROM recurring_transactions r JOIN transactions t ON t.id=r.transaction_id
             WHERE r.transaction_id=?1",
            [tx_id],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .unwrap();
    assert_eq!(freq, "weekly");
    assert_eq!(end.as_deref(), Some("2025-12-31"));
    assert!(flag);
}

#[test]
fn attach_to_missing_transaction_rejected() {
    let mut conn = setup();
    let err = ledger::create_recurring(&mut conn, 42, Frequency::Monthly, date("2025-08-01"), None)
        .unwrap_err();
    assert!(matches!(err, LedgerError::TransactionNotFound(42)));
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM recurring_transactions", [], |r| {
            r.get(0)
        })
        .unwrap();
    assert_eq!(n, 0);
}

#[test]
fn second_schedule_on_same_transaction_rejected() {
    let mut conn = setup();
    let tx_id = record_expense(&mut conn);
    ledger::create_recurring(&mut conn, tx_id, Frequency::Monthly, date("2025-08-01"), None)
        .unwrap();
    let err = ledger::create_recurring(&mut conn, tx_id, Frequency::Daily, date("2025-08-02"), None)
        .unwrap_err();
    assert!(matches!(err, LedgerError::Save(_)));
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM recurring_transactions", [], |r| {
            r.get(0)
        })
        .unwrap();
    assert_eq!(n, 1);
}

#[test]
fn schedule_rides_along_on_transaction_delete() {
    let mut conn = setup();
    let tx_id = record_expense(&mut conn);
    ledger::create_recurring(&mut conn, tx_id, Frequency::Monthly, date("2025-08-01"), None)
        .unwrap();

    ledger::delete_transaction(&mut conn, tx_id).unwrap();
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM recurring_transactions", [], |r| {
            r.get(0)
        })
        .unwrap();
    assert_eq!(n, 0);
}
