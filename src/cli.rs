// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn account_cmd() -> Command {
    Command::new("account")
        .about("Manage accounts")
        .subcommand(
            Command::new("add")
                .about("Add an account")
                .arg(Arg::new("name").long("name").required(true))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .required(true)
                        .value_parser(["checking", "savings", "credit", "cash", "investment"]),
                )
                .arg(
                    Arg::new("balance")
                        .long("balance")
                        .default_value("0")
                        .help("Opening balance"),
                )
                .arg(
                    Arg::new("default")
                        .long("default")
                        .action(ArgAction::SetTrue)
                        .help("Mark as the default account"),
                ),
        )
        .subcommand(Command::new("list").about("List accounts"))
        .subcommand(
            Command::new("edit")
                .about("Edit an account")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("new-name").long("new-name"))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .value_parser(["checking", "savings", "credit", "cash", "investment"]),
                )
                .arg(
                    Arg::new("default")
                        .long("default")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("no-default"),
                )
                .arg(
                    Arg::new("no-default")
                        .long("no-default")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("rm")
                .about("Remove an account and its transactions")
                .arg(Arg::new("name").long("name").required(true)),
        )
}

fn category_cmd() -> Command {
    Command::new("category")
        .about("Manage categories")
        .subcommand(
            Command::new("add")
                .about("Add a category")
                .arg(Arg::new("name").long("name").required(true)),
        )
        .subcommand(Command::new("list").about("List categories"))
        .subcommand(
            Command::new("rm")
                .about("Remove a category")
                .arg(Arg::new("name").long("name").required(true)),
        )
}

fn tx_cmd() -> Command {
    Command::new("tx")
        .about("Record and list transactions")
        .subcommand(
            Command::new("add")
                .about("Record a transaction")
                .arg(Arg::new("account").long("account").required(true))
                .arg(
                    Arg::new("amount")
                        .long("amount")
                        .required(true)
                        .help("Positive amount; sign follows --type"),
                )
                .arg(
                    Arg::new("type")
                        .long("type")
                        .required(true)
                        .value_parser(["expense", "income"]),
                )
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("date").long("date").help("YYYY-MM-DD, default today"))
                .arg(Arg::new("note").long("note"))
                .arg(
                    Arg::new("recurring")
                        .long("recurring")
                        .action(ArgAction::SetTrue)
                        .help("Also create a recurring schedule"),
                )
                .arg(
                    Arg::new("frequency")
                        .long("frequency")
                        .value_parser(["daily", "weekly", "monthly", "yearly"])
                        .requires("recurring"),
                )
                .arg(
                    Arg::new("start-date")
                        .long("start-date")
                        .requires("recurring"),
                )
                .arg(Arg::new("end-date").long("end-date").requires("recurring")),
        )
        .subcommand(json_flags(
            Command::new("list")
                .about("List transactions")
                .arg(Arg::new("month").long("month").help("YYYY-MM"))
                .arg(Arg::new("account").long("account"))
                .arg(Arg::new("category").long("category"))
                .arg(
                    Arg::new("type")
                        .long("type")
                        .value_parser(["expense", "income", "transfer"]),
                )
                .arg(
                    Arg::new("search")
                        .long("search")
                        .help("Case-insensitive pattern over category and note"),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(
            Command::new("rm")
                .about("Delete a transaction, reversing its balance effect")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .required(true)
                        .value_parser(value_parser!(i64)),
                ),
        )
}

fn transfer_cmd() -> Command {
    Command::new("transfer")
        .about("Move funds between two accounts")
        .arg(Arg::new("amount").long("amount").required(true))
        .arg(Arg::new("from").long("from").required(true))
        .arg(Arg::new("to").long("to").required(true))
        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, default today"))
        .arg(Arg::new("note").long("note"))
}

fn recurring_cmd() -> Command {
    Command::new("recurring")
        .about("Manage recurring schedules")
        .subcommand(
            Command::new("add")
                .about("Attach a schedule to an existing transaction")
                .arg(
                    Arg::new("tx")
                        .long("tx")
                        .required(true)
                        .value_parser(value_parser!(i64))
                        .help("Transaction id"),
                )
                .arg(
                    Arg::new("frequency")
                        .long("frequency")
                        .required(true)
                        .value_parser(["daily", "weekly", "monthly", "yearly"]),
                )
                .arg(
                    Arg::new("start-date")
                        .long("start-date")
                        .help("YYYY-MM-DD, default today"),
                )
                .arg(Arg::new("end-date").long("end-date")),
        )
        .subcommand(Command::new("list").about("List recurring schedules"))
}

fn budget_cmd() -> Command {
    Command::new("budget")
        .about("Manage budgets")
        .subcommand(
            Command::new("add")
                .about("Add a budget")
                .arg(Arg::new("category").long("category").required(true))
                .arg(Arg::new("limit").long("limit").required(true))
                .arg(
                    Arg::new("period")
                        .long("period")
                        .required(true)
                        .value_parser(["weekly", "monthly", "yearly"]),
                ),
        )
        .subcommand(json_flags(
            Command::new("list").about("List budgets with progress"),
        ))
}

fn report_cmd() -> Command {
    Command::new("report")
        .about("Reports")
        .subcommand(json_flags(
            Command::new("summary").about("Balance, monthly flow, top category"),
        ))
        .subcommand(json_flags(
            Command::new("cashflow")
                .about("Income and expenses per month")
                .arg(
                    Arg::new("months")
                        .long("months")
                        .value_parser(value_parser!(usize)),
                ),
        ))
        .subcommand(json_flags(
            Command::new("spend-by-category")
                .about("Expenses grouped by category")
                .arg(Arg::new("month").long("month").help("YYYY-MM")),
        ))
}

fn export_cmd() -> Command {
    Command::new("export").about("Export data").subcommand(
        Command::new("transactions")
            .about("Export transactions")
            .arg(Arg::new("format").long("format").required(true))
            .arg(Arg::new("out").long("out").required(true)),
    )
}

fn config_cmd() -> Command {
    Command::new("config")
        .about("Settings")
        .subcommand(Command::new("show").about("Show settings"))
        .subcommand(
            Command::new("set-currency")
                .about("Set the display currency symbol")
                .arg(Arg::new("symbol").long("symbol").required(true)),
        )
}

pub fn build_cli() -> Command {
    Command::new("moneyflow")
        .about("Personal finance ledger: accounts, transactions, budgets, recurring bookkeeping")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(account_cmd())
        .subcommand(category_cmd())
        .subcommand(tx_cmd())
        .subcommand(transfer_cmd())
        .subcommand(recurring_cmd())
        .subcommand(budget_cmd())
        .subcommand(report_cmd())
        .subcommand(export_cmd())
        .subcommand(config_cmd())
        .subcommand(Command::new("doctor").about("Run ledger integrity checks"))
}
