// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::utils::{parse_date, parse_frequency, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let tx_id = *sub.get_one::<i64>("tx").unwrap();
            let frequency = parse_frequency(sub.get_one::<String>("frequency").unwrap())?;
            let start_date = match sub.get_one::<String>("start-date") {
                Some(s) => parse_date(s)?,
                None => chrono::Utc::now().date_naive(),
            };
            let end_date = match sub.get_one::<String>("end-date") {
                Some(s) => Some(parse_date(s)?),
                None => None,
            };
            let rec = ledger::create_recurring(conn, tx_id, frequency, start_date, end_date)?;
            println!(
                "Attached {} schedule to transaction {} starting {}",
                rec.frequency.as_str(),
                rec.transaction_id,
                rec.start_date
            );
        }
        Some(("list", _)) => list(conn)?,
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare(
        "SELECT r.transaction_id, t.category, t.amount, r.frequency, r.start_date, r.end_date
         FROM recurring_transactions r
         LEFT JOIN transactions t ON r.transaction_id=t.id
         ORDER BY r.start_date, r.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, Option<String>>(1)?,
            r.get::<_, Option<String>>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, Option<String>>(5)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (tx_id, category, amount, freq, start, end) = row?;
        data.push(vec![
            tx_id.to_string(),
            category.unwrap_or_default(),
            amount.unwrap_or_default(),
            freq,
            start,
            end.unwrap_or_default(),
        ]);
    }
    println!(
        "{}",
        pretty_table(
            &["Tx", "Category", "Amount", "Frequency", "Start", "End"],
            data
        )
    );
    Ok(())
}
