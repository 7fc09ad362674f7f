// Copyright (c) 2025 Tillbook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Direction, Transaction};
use crate::utils::{fmt_money, get_branch, maybe_print_json, parse_amount, parse_date, pretty_table};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let description = sub.get_one::<String>("description").unwrap();
    let category = sub.get_one::<String>("category").unwrap();
    let direction: Direction = sub.get_one::<String>("direction").unwrap().parse()?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let invoice_id = match sub.get_one::<String>("invoice") {
        Some(number) => Some(
            conn.query_row(
                "SELECT id FROM invoices WHERE number=?1",
                params![number],
                |r| r.get::<_, i64>(0),
            )
            .with_context(|| format!("Invoice '{}' not found", number))?,
        ),
        None => None,
    };
    let branch = get_branch(conn)?;

    conn.execute(
        "INSERT INTO transactions(date, description, category, direction, amount, invoice_id, branch_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            date.to_string(),
            description,
            category,
            direction.to_string(),
            amount.to_string(),
            invoice_id,
            branch
        ],
    )?;
    println!(
        "Recorded {} {} on {} ({})",
        direction,
        fmt_money(&amount),
        date,
        category
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let from = sub
        .get_one::<String>("from")
        .map(|s| parse_date(s))
        .transpose()?;
    let to = sub
        .get_one::<String>("to")
        .map(|s| parse_date(s))
        .transpose()?;
    let data = fetch_range(conn, from, to)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.date.to_string(),
                    t.description.clone(),
                    t.category.clone(),
                    t.direction.to_string(),
                    fmt_money(&t.amount),
                    t.invoice_id.map(|id| format!("#{}", id)).unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Date", "Description", "Category", "Direction", "Amount", "Invoice"],
                rows,
            )
        );
    }
    Ok(())
}

/// Transactions in the inclusive date range, newest first. Filtering and
/// ordering are delegated to the store; aggregation downstream works on
/// whatever order the store returned.
pub fn fetch_range(
    conn: &Connection,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<Vec<Transaction>> {
    let mut sql = String::from(
        "SELECT id, date, description, category, direction, amount, invoice_id, branch_id
         FROM transactions WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(f) = from {
        sql.push_str(" AND date>=?");
        params_vec.push(f.to_string());
    }
    if let Some(t) = to {
        sql.push_str(" AND date<=?");
        params_vec.push(t.to_string());
    }
    sql.push_str(" ORDER BY date DESC, id DESC");

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
        data.push(tx_from_row(r)?);
    }
    Ok(data)
}

pub fn fetch_for_invoice(conn: &Connection, invoice_id: i64) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(
        "SELECT id, date, description, category, direction, amount, invoice_id, branch_id
         FROM transactions WHERE invoice_id=?1 ORDER BY created_at DESC, id DESC",
    )?;
    let mut rows = stmt.query(params![invoice_id])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(tx_from_row(r)?);
    }
    Ok(data)
}

fn tx_from_row(r: &rusqlite::Row) -> Result<Transaction> {
    let date_raw: String = r.get(1)?;
    let direction_raw: String = r.get(4)?;
    let amount_raw: String = r.get(5)?;
    Ok(Transaction {
        id: r.get(0)?,
        date: parse_date(&date_raw)?,
        description: r.get(2)?,
        category: r.get(3)?,
        direction: direction_raw.parse()?,
        amount: crate::utils::parse_decimal(&amount_raw)?,
        invoice_id: r.get(6)?,
        branch_id: r.get(7)?,
    })
}
