// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Consistency sweep over the ledger. Each finding is an (issue, detail) pair.
pub fn scan(conn: &Connection) -> Result<Vec<(String, String)>> {
    let mut findings = Vec::new();

    // 1) Budgets pointing at a category that does not exist
    let mut stmt = conn.prepare(
        "SELECT DISTINCT b.category FROM budgets b
         WHERE NOT EXISTS (SELECT 1 FROM categories c WHERE c.name = b.category COLLATE NOCASE)",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let c: String = r.get(0)?;
        findings.push(("budget_unknown_category".to_string(), c));
    }

    // 2) Transactions categorized outside the category list (transfer legs
    //    carry the fixed 'Transfer' label and are exempt)
    let mut stmt2 = conn.prepare(
        "SELECT DISTINCT t.category FROM transactions t
         WHERE t.type != 'transfer'
           AND NOT EXISTS (SELECT 1 FROM categories c WHERE c.name = t.category COLLATE NOCASE)",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let c: String = r.get(0)?;
        findings.push(("txn_unknown_category".to_string(), c));
    }

    // 3) Recurring flag drift, both directions
    let mut stmt3 = conn.prepare(
        "SELECT t.id FROM transactions t
         WHERE t.is_recurring = 1
           AND NOT EXISTS (SELECT 1 FROM recurring_transactions r WHERE r.transaction_id = t.id)",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let id: i64 = r.get(0)?;
        findings.push(("recurring_flag_no_schedule".to_string(), format!("tx {}", id)));
    }
    let mut stmt4 = conn.prepare(
        "SELECT r.transaction_id FROM recurring_transactions r
         JOIN transactions t ON t.id = r.transaction_id
         WHERE t.is_recurring = 0",
    )?;
    let mut cur4 = stmt4.query([])?;
    while let Some(r) = cur4.next()? {
        let id: i64 = r.get(0)?;
        findings.push(("schedule_no_recurring_flag".to_string(), format!("tx {}", id)));
    }

    // 4) Schedules that end before they start
    let mut stmt5 = conn.prepare(
        "SELECT transaction_id, start_date, end_date FROM recurring_transactions
         WHERE end_date IS NOT NULL AND end_date < start_date",
    )?;
    let mut cur5 = stmt5.query([])?;
    while let Some(r) = cur5.next()? {
        let id: i64 = r.get(0)?;
        let start: String = r.get(1)?;
        let end: String = r.get(2)?;
        findings.push((
            "recurring_ends_before_start".to_string(),
            format!("tx {}: {} < {}", id, end, start),
        ));
    }

    // 5) Transfer legs with no opposite leg on the same date
    let mut stmt6 = conn.prepare("SELECT date, amount FROM transactions WHERE type='transfer'")?;
    let rows = stmt6.query_map([], |r| {
        Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
    })?;
    let mut legs: BTreeMap<(String, Decimal), (i64, i64)> = BTreeMap::new();
    for row in rows {
        let (date, stored) = row?;
        let amount = Decimal::from_str_exact(&stored)
            .with_context(|| format!("Invalid stored amount '{}' on {}", stored, date))?;
        let entry = legs.entry((date, amount.abs())).or_insert((0, 0));
        if amount < Decimal::ZERO {
            entry.0 += 1;
        } else {
            entry.1 += 1;
        }
    }
    for ((date, magnitude), (out, inn)) in legs {
        if out != inn {
            findings.push((
                "unpaired_transfer".to_string(),
                format!("{} {} ({} out / {} in)", date, magnitude, out, inn),
            ));
        }
    }

    // 6) Budgets whose spent total went negative
    let mut stmt7 = conn.prepare("SELECT id, category, spent FROM budgets")?;
    let brows = stmt7.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    for row in brows {
        let (id, category, stored) = row?;
        let spent = Decimal::from_str_exact(&stored)
            .with_context(|| format!("Invalid stored spent '{}' for budget {}", stored, id))?;
        if spent < Decimal::ZERO {
            findings.push((
                "negative_budget_spent".to_string(),
                format!("budget {} ({}): {}", id, category, spent),
            ));
        }
    }

    Ok(findings)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let findings = scan(conn)?;
    if findings.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        let rows: Vec<Vec<String>> = findings
            .into_iter()
            .map(|(issue, detail)| vec![issue, detail])
            .collect();
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
