// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{self, RecurringInput, TransactionInput};
use crate::models::Frequency;
use crate::utils::{
    maybe_print_json, parse_date, parse_decimal, parse_frequency, parse_tx_type, pretty_table,
};
use anyhow::{Context, Result};
use regex::RegexBuilder;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => chrono::Utc::now().date_naive(),
    };
    let account = sub.get_one::<String>("account").unwrap().to_string();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let r#type = parse_tx_type(sub.get_one::<String>("type").unwrap())?;
    let category = sub.get_one::<String>("category").unwrap().to_string();
    let note = sub.get_one::<String>("note").map(|s| s.to_string());

    let recurring = if sub.get_flag("recurring") {
        let frequency = match sub.get_one::<String>("frequency") {
            Some(f) => parse_frequency(f)?,
            None => Frequency::Monthly,
        };
        let start_date = match sub.get_one::<String>("start-date") {
            Some(s) => parse_date(s)?,
            None => date,
        };
        let end_date = match sub.get_one::<String>("end-date") {
            Some(s) => Some(parse_date(s)?),
            None => None,
        };
        Some(RecurringInput {
            frequency,
            start_date,
            end_date,
        })
    } else {
        None
    };

    let input = TransactionInput {
        date,
        account,
        amount,
        r#type,
        category,
        note,
        recurring,
    };
    let tx = ledger::create_transaction(conn, &input)?;
    println!(
        "Recorded {} {} on {} ({}, acct: {})",
        tx.r#type.as_str(),
        tx.amount,
        tx.date,
        tx.category,
        input.account
    );
    if tx.is_recurring {
        println!("Recurring schedule attached to transaction {}", tx.id);
    }
    Ok(())
}

fn rm(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    ledger::delete_transaction(conn, id)?;
    println!("Deleted transaction {} and reversed its balance effect", id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.account.clone(),
                    r.amount.clone(),
                    r.category.clone(),
                    r.r#type.clone(),
                    if r.is_recurring {
                        "yes".to_string()
                    } else {
                        String::new()
                    },
                    r.note.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Id", "Date", "Account", "Amount", "Category", "Type", "Recurring", "Note"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub account: String,
    pub amount: String,
    pub category: String,
    pub r#type: String,
    pub is_recurring: bool,
    pub note: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let search_re = match sub.get_one::<String>("search") {
        Some(p) => Some(
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .with_context(|| format!("Invalid search pattern '{}'", p))?,
        ),
        None => None,
    };

    let mut sql = String::from(
        "SELECT t.id, t.date, a.name, t.amount, t.category, t.type, t.is_recurring, t.note FROM transactions t LEFT JOIN accounts a ON t.account_id=a.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(t.date,1,7)=?");
        params_vec.push(month.into());
    }
    if let Some(acct) = sub.get_one::<String>("account") {
        sql.push_str(" AND a.name=?");
        params_vec.push(acct.into());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        sql.push_str(" AND t.category=?");
        params_vec.push(cat.into());
    }
    if let Some(typ) = sub.get_one::<String>("type") {
        sql.push_str(" AND t.type=?");
        params_vec.push(typ.into());
    }
    sql.push_str(" ORDER BY t.date DESC, t.id DESC");
    // A pattern filter runs after the query, so the limit must too.
    if search_re.is_none() {
        if let Some(limit) = sub.get_one::<usize>("limit") {
            sql.push_str(" LIMIT ?");
            params_vec.push(limit.to_string());
        }
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = if params_vec.is_empty() {
        stmt.query([])?
    } else {
        let params: Vec<&dyn rusqlite::ToSql> = params_vec
            .iter()
            .map(|s| s as &dyn rusqlite::ToSql)
            .collect();
        stmt.query(rusqlite::params_from_iter(params))?
    };

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let id: i64 = r.get(0)?;
        let date: String = r.get(1)?;
        let account: Option<String> = r.get(2)?;
        let amount: String = r.get(3)?;
        let category: String = r.get(4)?;
        let r#type: String = r.get(5)?;
        let is_recurring: bool = r.get(6)?;
        let note: Option<String> = r.get(7)?;
        data.push(TransactionRow {
            id,
            date,
            account: account.unwrap_or_default(),
            amount,
            category,
            r#type,
            is_recurring,
            note: note.unwrap_or_default(),
        });
    }

    if let Some(re) = &search_re {
        data.retain(|r| re.is_match(&r.category) || re.is_match(&r.note));
        if let Some(limit) = sub.get_one::<usize>("limit") {
            data.truncate(*limit);
        }
    }
    Ok(data)
}
