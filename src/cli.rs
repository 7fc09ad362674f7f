// Copyright (c) 2025 Tillbook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

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

fn date_range(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("from")
            .long("from")
            .help("Start date (YYYY-MM-DD), inclusive"),
    )
    .arg(
        Arg::new("to")
            .long("to")
            .help("End date (YYYY-MM-DD), inclusive"),
    )
}

pub fn build_cli() -> Command {
    Command::new("tillbook")
        .about("Invoicing, point-of-sale, and financial reporting for small shops")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("branch")
                .about("Branch/location context applied to new records")
                .subcommand(
                    Command::new("set")
                        .about("Set the branch context")
                        .arg(Arg::new("id").required(true).help("Branch identifier")),
                )
                .subcommand(Command::new("show").about("Show the current branch context"))
                .subcommand(Command::new("clear").about("Clear the branch context")),
        )
        .subcommand(
            Command::new("invoice")
                .about("Manage customer invoices")
                .subcommand(
                    Command::new("add")
                        .about("Create an unpaid invoice")
                        .arg(
                            Arg::new("number")
                                .long("number")
                                .required(true)
                                .help("Invoice number, e.g. INV-001"),
                        )
                        .arg(
                            Arg::new("customer")
                                .long("customer")
                                .required(true)
                                .help("Customer name"),
                        )
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .required(true)
                                .help("Invoice date (YYYY-MM-DD)"),
                        )
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true)
                                .help("Invoice amount"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list").about("List invoices with unpaid/paid totals"),
                ))
                .subcommand(
                    Command::new("show")
                        .about("Show one invoice with its linked records")
                        .arg(Arg::new("number").required(true)),
                )
                .subcommand(
                    Command::new("mark-paid")
                        .about("Mark an invoice as paid (idempotent)")
                        .arg(Arg::new("number").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Ledger transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a ledger transaction")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(
                            Arg::new("description")
                                .long("description")
                                .required(true),
                        )
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("direction")
                                .long("direction")
                                .required(true)
                                .help("debit (inflow) or credit (outflow)"),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("invoice")
                                .long("invoice")
                                .help("Invoice number this transaction belongs to"),
                        ),
                )
                .subcommand(json_flags(date_range(
                    Command::new("list").about("List transactions, newest first"),
                ))),
        )
        .subcommand(
            Command::new("catalog")
                .about("Product catalog (client-local)")
                .subcommand(
                    Command::new("add")
                        .about("Add a product")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("price").long("price").required(true))
                        .arg(
                            Arg::new("stock")
                                .long("stock")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        ),
                )
                .subcommand(json_flags(Command::new("list").about("List products")))
                .subcommand(
                    Command::new("rm")
                        .about("Remove a product by name")
                        .arg(Arg::new("name").required(true)),
                ),
        )
        .subcommand(
            Command::new("pos")
                .about("Point of sale: cart and checkout")
                .subcommand(
                    Command::new("add")
                        .about("Add one unit of a product to the cart")
                        .arg(Arg::new("product").long("product").required(true)),
                )
                .subcommand(
                    Command::new("qty")
                        .about("Adjust a cart line's quantity by a signed delta")
                        .arg(Arg::new("product").long("product").required(true))
                        .arg(
                            Arg::new("delta")
                                .long("delta")
                                .required(true)
                                .allow_hyphen_values(true)
                                .value_parser(value_parser!(i64)),
                        ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove a product's line from the cart")
                        .arg(Arg::new("product").long("product").required(true)),
                )
                .subcommand(json_flags(
                    Command::new("show").about("Show the pending cart and total"),
                ))
                .subcommand(Command::new("clear").about("Empty the cart"))
                .subcommand(
                    Command::new("checkout")
                        .about("Create a paid invoice from the cart and clear it")
                        .arg(
                            Arg::new("customer")
                                .long("customer")
                                .help("Customer name (required for checkout)"),
                        ),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Financial reports over the ledger")
                .subcommand(json_flags(date_range(
                    Command::new("summary").about("Total inflow, outflow, and net"),
                )))
                .subcommand(json_flags(
                    date_range(Command::new("monthly").about("Inflow/outflow per month")).arg(
                        Arg::new("months")
                            .long("months")
                            .value_parser(value_parser!(usize))
                            .default_value("3")
                            .help("Maximum number of month buckets"),
                    ),
                ))
                .subcommand(json_flags(date_range(
                    Command::new("category").about("Amounts per category with bar percentages"),
                ))),
        )
        .subcommand(
            Command::new("import")
                .about("Import data from spreadsheets")
                .subcommand(
                    Command::new("catalog")
                        .about("Import products from an .xlsx file (name/price/stock columns)")
                        .arg(Arg::new("path").long("path").required(true)),
                ),
        )
        .subcommand(
            Command::new("export")
                .about("Export data to files")
                .subcommand(
                    Command::new("report")
                        .about("Running-balance report for a date range")
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true))
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("xlsx")
                                .help("xlsx or csv"),
                        )
                        .arg(
                            Arg::new("out")
                                .long("out")
                                .help("Output path (default Report_<from>_<to>.<ext>)"),
                        ),
                ),
        )
}
