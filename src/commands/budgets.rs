// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::utils::{
    fmt_money, get_currency_symbol, maybe_print_json, parse_decimal, parse_period, pretty_table,
};
use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let category = sub.get_one::<String>("category").unwrap();
            let limit = parse_decimal(sub.get_one::<String>("limit").unwrap())?;
            let period = parse_period(sub.get_one::<String>("period").unwrap())?;
            let budget = ledger::create_budget(conn, category, limit, period)?;
            println!(
                "Budget added for '{}' ({}, limit {})",
                budget.category,
                budget.period.as_str(),
                budget.limit
            );
        }
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
pub struct BudgetRow {
    pub category: String,
    pub period: String,
    pub limit: String,
    pub spent: String,
    pub remaining: String,
    pub used: String,
    pub status: String,
}

// Threshold ladder for spent/limit: 100% over, 80% warn, 60% watch.
fn status_for(used: &Decimal) -> &'static str {
    if *used >= Decimal::from(100) {
        "over"
    } else if *used >= Decimal::from(80) {
        "warn"
    } else if *used >= Decimal::from(60) {
        "watch"
    } else {
        "ok"
    }
}

pub fn progress_rows(conn: &Connection) -> Result<Vec<BudgetRow>> {
    let symbol = get_currency_symbol(conn)?;
    let mut stmt = conn
        .prepare("SELECT category, period, limit_amount, spent FROM budgets ORDER BY category, id")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (category, period, limit_s, spent_s) = row?;
        let limit = Decimal::from_str_exact(&limit_s)
            .with_context(|| format!("Invalid stored limit '{}' for budget {}", limit_s, category))?;
        let spent = Decimal::from_str_exact(&spent_s)
            .with_context(|| format!("Invalid stored spent '{}' for budget {}", spent_s, category))?;
        // Progress is zero when the limit is not positive.
        let used = if limit > Decimal::ZERO {
            spent * Decimal::from(100) / limit
        } else {
            Decimal::ZERO
        };
        data.push(BudgetRow {
            category,
            period,
            limit: fmt_money(&limit, &symbol),
            spent: fmt_money(&spent, &symbol),
            remaining: fmt_money(&(limit - spent), &symbol),
            used: format!("{}%", used.trunc()),
            status: status_for(&used).to_string(),
        });
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = progress_rows(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.category.clone(),
                    r.period.clone(),
                    r.limit.clone(),
                    r.spent.clone(),
                    r.remaining.clone(),
                    r.used.clone(),
                    r.status.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Category", "Period", "Limit", "Spent", "Remaining", "Used", "Status"],
                rows,
            )
        );
    }
    Ok(())
}
