// Copyright (c) 2025 Tillbook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions;
use crate::report;
use crate::utils::{fmt_money, maybe_print_json, parse_date, pretty_table};
use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, sub)?,
        Some(("monthly", sub)) => monthly(conn, sub)?,
        Some(("category", sub)) => category(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn range(sub: &clap::ArgMatches) -> Result<(Option<NaiveDate>, Option<NaiveDate>)> {
    let from = sub
        .get_one::<String>("from")
        .map(|s| parse_date(s))
        .transpose()?;
    let to = sub
        .get_one::<String>("to")
        .map(|s| parse_date(s))
        .transpose()?;
    Ok((from, to))
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (from, to) = range(sub)?;
    let txs = transactions::fetch_range(conn, from, to)?;
    let s = report::cash_summary(&txs);
    if !maybe_print_json(json_flag, jsonl_flag, &s)? {
        let data = vec![
            vec!["Total inflow".to_string(), fmt_money(&s.inflow)],
            vec!["Total outflow".to_string(), fmt_money(&s.outflow)],
            vec!["Net".to_string(), fmt_money(&s.net)],
        ];
        println!("{}", pretty_table(&["Measure", "Amount"], data));
    }
    Ok(())
}

fn monthly(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&3);
    let (from, to) = range(sub)?;
    let txs = transactions::fetch_range(conn, from, to)?;
    let buckets = report::monthly_buckets(&txs, months);
    if !maybe_print_json(json_flag, jsonl_flag, &buckets)? {
        let data: Vec<Vec<String>> = buckets
            .iter()
            .map(|b| {
                vec![
                    b.label.clone(),
                    fmt_money(&b.inflow),
                    fmt_money(&b.outflow),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Month", "Inflow", "Outflow"], data));
    }
    Ok(())
}

fn category(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let (from, to) = range(sub)?;
    let txs = transactions::fetch_range(conn, from, to)?;
    let buckets = report::category_breakdown(&txs);
    if !maybe_print_json(json_flag, jsonl_flag, &buckets)? {
        let data: Vec<Vec<String>> = buckets
            .iter()
            .map(|b| {
                vec![
                    b.category.clone(),
                    fmt_money(&b.total),
                    format!("{:.0}%", b.percent),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Total", "Share"], data));
    }
    Ok(())
}
