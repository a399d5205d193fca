// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{fmt_money, get_currency_symbol, pretty_table};
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("cashflow", sub)) => cashflow(conn, sub)?,
        Some(("spend-by-category", sub)) => spend_by_category(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, serde::Serialize)]
pub struct Summary {
    pub total_balance: Decimal,
    pub month_income: Decimal,
    pub month_expenses: Decimal,
    pub avg_daily_spending: Decimal,
    pub top_category: Option<(String, Decimal)>,
}

pub fn summary_data(conn: &Connection) -> Result<Summary> {
    let mut total_balance = Decimal::ZERO;
    let mut stmt = conn.prepare("SELECT name, balance FROM accounts")?;
    let rows = stmt.query_map([], |r| {
        Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
    })?;
    for row in rows {
        let (name, stored) = row?;
        total_balance += Decimal::from_str_exact(&stored)
            .with_context(|| format!("Invalid stored balance '{}' for account {}", stored, name))?;
    }

    let today = Utc::now().date_naive();
    let month = today.format("%Y-%m").to_string();
    let window_start = (today - Duration::days(30)).format("%Y-%m-%d").to_string();

    let mut month_income = Decimal::ZERO;
    let mut month_expenses = Decimal::ZERO;
    let mut recent_spend = Decimal::ZERO;
    let mut total_spend = Decimal::ZERO;
    let mut by_category: BTreeMap<String, Decimal> = BTreeMap::new();

    let mut stmt = conn.prepare("SELECT date, amount, category FROM transactions")?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;
    for row in rows {
        let (date, stored, category) = row?;
        let amount = Decimal::from_str_exact(&stored)
            .with_context(|| format!("Invalid stored amount '{}' on {}", stored, date))?;
        if amount > Decimal::ZERO {
            if date.starts_with(&month) {
                month_income += amount;
            }
        } else if amount < Decimal::ZERO {
            let out = -amount;
            if date.starts_with(&month) {
                month_expenses += out;
            }
            if date.as_str() >= window_start.as_str() {
                recent_spend += out;
            }
            total_spend += out;
            *by_category.entry(category).or_insert(Decimal::ZERO) += out;
        }
    }

    let avg_daily_spending = recent_spend / Decimal::from(30);
    let top_category = by_category
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1))
        .map(|(cat, amt)| {
            let share = if total_spend > Decimal::ZERO {
                amt * Decimal::from(100) / total_spend
            } else {
                Decimal::ZERO
            };
            (cat, share)
        });

    Ok(Summary {
        total_balance,
        month_income,
        month_expenses,
        avg_daily_spending,
        top_category,
    })
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let s = summary_data(conn)?;
    let symbol = get_currency_symbol(conn)?;
    let month = Utc::now().date_naive().format("%Y-%m").to_string();
    let top = match &s.top_category {
        Some((cat, share)) => format!("{} ({}%)", cat, share.round_dp(1)),
        None => "None".to_string(),
    };
    let data = vec![
        vec![
            "Total balance".to_string(),
            fmt_money(&s.total_balance, &symbol),
        ],
        vec![
            format!("Income ({})", month),
            fmt_money(&s.month_income, &symbol),
        ],
        vec![
            format!("Expenses ({})", month),
            fmt_money(&s.month_expenses, &symbol),
        ],
        vec![
            "Avg daily spend (30d)".to_string(),
            fmt_money(&s.avg_daily_spending, &symbol),
        ],
        vec!["Top category".to_string(), top],
    ];
    if !crate::utils::maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&["Metric", "Value"], data));
    }
    Ok(())
}

pub fn cashflow_rows(conn: &Connection, months: usize) -> Result<Vec<(String, Decimal, Decimal)>> {
    let mut stmt = conn.prepare(
        "SELECT substr(date,1,7) AS month, date, amount
         FROM transactions
         ORDER BY date DESC",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;

    let mut map: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for row in rows {
        let (m, d, stored) = row?;
        let amt = Decimal::from_str_exact(&stored)
            .with_context(|| format!("Invalid stored amount '{}' on {}", stored, d))?;
        let entry = map.entry(m).or_insert((Decimal::ZERO, Decimal::ZERO));
        if amt > Decimal::ZERO {
            entry.0 += amt;
        } else {
            entry.1 += -amt;
        }
    }
    Ok(map
        .into_iter()
        .rev()
        .take(months)
        .map(|(m, (inc, exp))| (m, inc, exp))
        .collect())
}

fn cashflow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&12);
    let mut data = Vec::new();
    for (m, inc, exp) in cashflow_rows(conn, months)? {
        data.push(vec![m, format!("{:.2}", inc), format!("{:.2}", exp)]);
    }
    if !crate::utils::maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&["Month", "Income", "Expense"], data));
    }
    Ok(())
}

// (category, spent, share of all spending in percent)
pub fn category_spend(
    conn: &Connection,
    month: Option<&str>,
) -> Result<Vec<(String, Decimal, Decimal)>> {
    let mut sql = String::from("SELECT category, date, amount FROM transactions WHERE 1=1");
    let mut args: Vec<String> = Vec::new();
    if let Some(m) = month {
        sql.push_str(" AND substr(date,1,7)=?1");
        args.push(m.to_string());
    }
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;

    let mut agg: BTreeMap<String, Decimal> = BTreeMap::new();
    let mut total = Decimal::ZERO;
    for row in rows {
        let (category, date, stored) = row?;
        let amount = Decimal::from_str_exact(&stored)
            .with_context(|| format!("Invalid stored amount '{}' on {}", stored, date))?;
        if amount >= Decimal::ZERO {
            continue;
        }
        let out = -amount;
        total += out;
        *agg.entry(category).or_insert(Decimal::ZERO) += out;
    }

    let mut items: Vec<_> = agg.into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1));
    Ok(items
        .into_iter()
        .map(|(cat, amt)| {
            let share = if total > Decimal::ZERO {
                amt * Decimal::from(100) / total
            } else {
                Decimal::ZERO
            };
            (cat, amt, share)
        })
        .collect())
}

fn spend_by_category(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = sub.get_one::<String>("month").map(|s| s.as_str());
    let mut data = Vec::new();
    for (cat, amt, share) in category_spend(conn, month)? {
        data.push(vec![
            cat,
            format!("{:.2}", amt),
            format!("{}%", share.round_dp(0)),
        ]);
    }
    if !crate::utils::maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&["Category", "Spent", "Share"], data));
    }
    Ok(())
}
