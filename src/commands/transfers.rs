// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::{self, TransferInput};
use crate::utils::{parse_date, parse_decimal};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let from = sub.get_one::<String>("from").unwrap().to_string();
    let to = sub.get_one::<String>("to").unwrap().to_string();
    let date = match sub.get_one::<String>("date") {
        Some(s) => parse_date(s)?,
        None => chrono::Utc::now().date_naive(),
    };
    let note = sub.get_one::<String>("note").map(|s| s.to_string());

    let input = TransferInput {
        date,
        from,
        to,
        amount,
        note,
    };
    let (withdrawal, deposit) = ledger::create_transfer(conn, &input)?;
    println!(
        "Transferred {} from '{}' to '{}' on {} (tx {} / {})",
        amount, input.from, input.to, input.date, withdrawal.id, deposit.id
    );
    Ok(())
}
