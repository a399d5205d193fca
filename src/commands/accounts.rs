// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::utils::{parse_account_type, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let typ = parse_account_type(sub.get_one::<String>("type").unwrap())?;
            let balance = parse_decimal(sub.get_one::<String>("balance").unwrap())?;
            let is_default = sub.get_flag("default");
            let account = ledger::create_account(conn, name, typ, balance, is_default)?;
            println!(
                "Added account '{}' ({}, balance {})",
                account.name,
                account.r#type.as_str(),
                account.balance
            );
        }
        Some(("list", _)) => {
            let mut stmt = conn.prepare(
                "SELECT name, type, balance, is_default, created_at FROM accounts ORDER BY name",
            )?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, bool>(3)?,
                    r.get::<_, String>(4)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (n, t, b, d, cr) = row?;
                let default = if d { "yes".to_string() } else { String::new() };
                data.push(vec![n, t, b, default, cr]);
            }
            println!(
                "{}",
                pretty_table(&["Name", "Type", "Balance", "Default", "Created"], data)
            );
        }
        Some(("edit", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let new_name = sub.get_one::<String>("new-name").map(|s| s.as_str());
            let typ = match sub.get_one::<String>("type") {
                Some(t) => Some(parse_account_type(t)?),
                None => None,
            };
            let is_default = if sub.get_flag("default") {
                Some(true)
            } else if sub.get_flag("no-default") {
                Some(false)
            } else {
                None
            };
            ledger::update_account(conn, name, new_name, typ, is_default)?;
            println!("Updated account '{}'", name);
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            ledger::delete_account(conn, name)?;
            println!("Removed account '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
