// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            let category = ledger::create_category(conn, name)?;
            println!("Added category '{}'", category.name);
        }
        Some(("list", _)) => {
            let mut stmt =
                conn.prepare("SELECT name, created_at FROM categories ORDER BY name")?;
            let rows =
                stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)))?;
            let mut data = Vec::new();
            for row in rows {
                let (n, cr) = row?;
                data.push(vec![n, cr]);
            }
            println!("{}", pretty_table(&["Category", "Created"], data));
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap();
            ledger::delete_category(conn, name)?;
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}
