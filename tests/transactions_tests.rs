// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use moneyflow::error::LedgerError;
use moneyflow::ledger::{self, RecurringInput, TransactionInput};
use moneyflow::models::{AccountType, BudgetPeriod, Frequency, TransactionType};
use moneyflow::{cli, commands::transactions};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    moneyflow::db::init_schema(&mut conn).unwrap();
    ledger::create_account(&conn, "Checking", AccountType::Checking, Decimal::from(100), true)
        .unwrap();
    conn
}

fn input(date: &str, amount: i64, r#type: TransactionType, category: &str) -> TransactionInput {
    TransactionInput {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        account: "Checking".to_string(),
        amount: Decimal::from(amount),
        r#type,
        category: category.to_string(),
        note: None,
        recurring: None,
    }
}

fn balance(conn: &Connection) -> String {
    conn.query_row(
        "SELECT balance FROM accounts WHERE name='Checking'",
        [],
        |r| r.get(0),
    )
    .unwrap()
}

#[test]
fn balance_is_sum_of_signed_amounts() {
    let mut conn = setup();
    ledger::create_transaction(&mut conn, &input("2025-08-01", 200, TransactionType::Income, "Other"))
        .unwrap();
    ledger::create_transaction(&mut conn, &input("2025-08-02", 30, TransactionType::Expense, "Food"))
        .unwrap();
    ledger::create_transaction(&mut conn, &input("2025-08-03", 45, TransactionType::Expense, "Bills"))
        .unwrap();

    // 100 opening + 200 - 30 - 45
    assert_eq!(balance(&conn), "225");

    let mut stmt = conn.prepare("SELECT amount FROM transactions").unwrap();
    let mut rows = stmt.query([]).unwrap();
    let mut sum = Decimal::ZERO;
    while let Some(r) = rows.next().unwrap() {
        let s: String = r.get::<_, String>(0).unwrap();
        sum += s.parse::<Decimal>().unwrap();
    }
    assert_eq!(sum, Decimal::from(125));
}

#[test]
fn expense_stored_negative_income_positive() {
    let mut conn = setup();
    let exp = ledger::create_transaction(
        &mut conn,
        &input("2025-08-01", 30, TransactionType::Expense, "Food"),
    )
    .unwrap();
    let inc = ledger::create_transaction(
        &mut conn,
        &input("2025-08-02", 40, TransactionType::Income, "Other"),
    )
    .unwrap();
    assert_eq!(exp.amount, Decimal::from(-30));
    assert_eq!(inc.amount, Decimal::from(40));

    let stored_exp: String = conn
        .query_row(
            "SELECT amount FROM transactions WHERE id=?1",
            [exp.id],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(stored_exp, "-30");
}

#[test]
fn expense_exceeding_balance_leaves_no_trace() {
    let mut conn = setup();
    let err = ledger::create_transaction(
        &mut conn,
        &input("2025-08-01", 1000, TransactionType::Expense, "Food"),
    )
    .unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds { .. }));

    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 0);
    assert_eq!(balance(&conn), "100");
}

#[test]
fn income_needs_no_funds() {
    let mut conn = setup();
    ledger::create_account(&conn, "Empty", AccountType::Savings, Decimal::ZERO, false).unwrap();
    let mut inp = input("2025-08-01", 50, TransactionType::Income, "Other");
    inp.account = "Empty".to_string();
    ledger::create_transaction(&mut conn, &inp).unwrap();
    let b: String = conn
        .query_row("SELECT balance FROM accounts WHERE name='Empty'", [], |r| {
            r.get(0)
        })
        .unwrap();
    assert_eq!(b, "50");
}

#[test]
fn non_positive_amount_rejected() {
    let mut conn = setup();
    for amount in [0, -5] {
        let err = ledger::create_transaction(
            &mut conn,
            &input("2025-08-01", amount, TransactionType::Expense, "Food"),
        )
        .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount(_)));
    }
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 0);
}

#[test]
fn unknown_account_rejected() {
    let mut conn = setup();
    let mut inp = input("2025-08-01", 10, TransactionType::Expense, "Food");
    inp.account = "Ghost".to_string();
    let err = ledger::create_transaction(&mut conn, &inp).unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound(_)));
}

#[test]
fn recurring_schedule_created_with_transaction() {
    let mut conn = setup();
    let mut inp = input("2025-08-01", 12, TransactionType::Expense, "Bills");
    inp.recurring = Some(RecurringInput {
        frequency: Frequency::Monthly,
        start_date: NaiveDate::parse_from_str("2025-08-01", "%Y-%m-%d").unwrap(),
        end_date: None,
    });
    let tx = ledger::create_transaction(&mut conn, &inp).unwrap();
    assert!(tx.is_recurring);

    let (freq, last): (String, String) = conn
        .query_row(
            "SELECT frequency, last_processed FROM recurring_transactions WHERE transaction_id=?1",
            [tx.id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(freq, "monthly");
    assert!(!last.is_empty());
}

#[test]
fn expense_feeds_matching_budget_income_does_not() {
    let mut conn = setup();
    ledger::create_budget(
        &conn,
        "Food",
        Decimal::from(100),
        BudgetPeriod::Monthly,
    )
    .unwrap();
    ledger::create_transaction(&mut conn, &input("2025-08-01", 20, TransactionType::Expense, "Food"))
        .unwrap();
    ledger::create_transaction(&mut conn, &input("2025-08-02", 50, TransactionType::Income, "Food"))
        .unwrap();

    let spent: String = conn
        .query_row("SELECT spent FROM budgets WHERE category='Food'", [], |r| {
            r.get(0)
        })
        .unwrap();
    assert_eq!(spent, "20");
}

#[test]
fn delete_reverses_balance_and_keeps_budget_spent() {
    let mut conn = setup();
    ledger::create_budget(
        &conn,
        "Food",
        Decimal::from(100),
        BudgetPeriod::Monthly,
    )
    .unwrap();
    let tx = ledger::create_transaction(
        &mut conn,
        &input("2025-08-01", 30, TransactionType::Expense, "Food"),
    )
    .unwrap();
    assert_eq!(balance(&conn), "70");

    ledger::delete_transaction(&mut conn, tx.id).unwrap();
    assert_eq!(balance(&conn), "100");
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))
        .unwrap();
    assert_eq!(n, 0);

    // spent is monotonic; deletions do not subtract
    let spent: String = conn
        .query_row("SELECT spent FROM budgets WHERE category='Food'", [], |r| {
            r.get(0)
        })
        .unwrap();
    assert_eq!(spent, "30");
}

#[test]
fn delete_missing_transaction_rejected() {
    let mut conn = setup();
    let err = ledger::delete_transaction(&mut conn, 99).unwrap_err();
    assert!(matches!(err, LedgerError::TransactionNotFound(99)));
}

#[test]
fn list_limit_respected() {
    let mut conn = setup();
    for i in 1..=3 {
        ledger::create_transaction(
            &mut conn,
            &input(
                &format!("2025-01-0{}", i),
                10,
                TransactionType::Income,
                "Other",
            ),
        )
        .unwrap();
    }

    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["moneyflow", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].date, "2025-01-03");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn list_search_scans_category_and_note() {
    let mut conn = setup();
    let mut with_note = input("2025-01-01", 5, TransactionType::Expense, "Food");
    with_note.note = Some("coffee beans".to_string());
    ledger::create_transaction(&mut conn, &with_note).unwrap();
    ledger::create_transaction(
        &mut conn,
        &input("2025-01-02", 8, TransactionType::Expense, "Transport"),
    )
    .unwrap();

    let cli = cli::build_cli();
    let matches = cli.get_matches_from(["moneyflow", "tx", "list", "--search", "COFFEE"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&conn, list_m).unwrap();
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].category, "Food");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}
