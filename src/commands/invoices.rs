// Copyright (c) 2025 Tillbook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions;
use crate::models::{CartLine, Invoice, InvoiceStatus};
use crate::report;
use crate::utils::{fmt_money, get_branch, maybe_print_json, parse_amount, parse_date, pretty_table};
use anyhow::{Result, bail};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("mark-paid", sub)) => mark_paid(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let number = sub.get_one::<String>("number").unwrap().trim();
    let customer = sub.get_one::<String>("customer").unwrap().trim();
    if number.is_empty() || customer.is_empty() {
        bail!("Invoice number and customer must not be empty");
    }
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let branch = get_branch(conn)?;

    conn.execute(
        "INSERT INTO invoices(number, customer, date, amount, status, branch_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            number,
            customer,
            date.to_string(),
            amount.to_string(),
            InvoiceStatus::Unpaid.to_string(),
            branch
        ],
    )?;
    println!(
        "Created invoice {} for {} ({})",
        number,
        customer,
        fmt_money(&amount)
    );
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let invoices = fetch_invoices(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &invoices)? {
        let totals = report::status_totals(&invoices);
        println!(
            "Unpaid: {}   Paid: {}",
            fmt_money(&totals.unpaid),
            fmt_money(&totals.paid)
        );
        let rows: Vec<Vec<String>> = invoices
            .iter()
            .map(|inv| {
                vec![
                    inv.number.clone(),
                    inv.customer.clone(),
                    inv.date.to_string(),
                    fmt_money(&inv.amount),
                    inv.status.to_string(),
                    inv.branch_id.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["Number", "Customer", "Date", "Amount", "Status", "Branch"],
                rows,
            )
        );
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let number = sub.get_one::<String>("number").unwrap();
    let inv = fetch_by_number(conn, number)?;

    println!("Invoice {} [{}]", inv.number, inv.status);
    println!("Customer: {}", inv.customer);
    println!("Date:     {}", inv.date);
    println!("Amount:   {}", fmt_money(&inv.amount));
    if let Some(branch) = &inv.branch_id {
        println!("Branch:   {}", branch);
    }
    println!("Created:  {}", inv.created_at);
    println!("Updated:  {}", inv.updated_at);

    let items = fetch_pos_items(conn, inv.id)?;
    if !items.is_empty() {
        println!("\nItems:");
        for line in &items {
            println!(
                "  {} x {} @ {} = {}",
                line.quantity,
                line.name,
                fmt_money(&line.price),
                fmt_money(&(line.price * rust_decimal::Decimal::from(line.quantity)))
            );
        }
    }

    let txs = transactions::fetch_for_invoice(conn, inv.id)?;
    if !txs.is_empty() {
        println!("\nLinked transactions:");
        for t in &txs {
            println!(
                "  {} {} {} ({}) - {}",
                t.date,
                t.direction,
                fmt_money(&t.amount),
                t.category,
                t.description
            );
        }
    }
    Ok(())
}

fn mark_paid(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let number = sub.get_one::<String>("number").unwrap();
    let updated = conn.execute(
        "UPDATE invoices SET status=?1, updated_at=datetime('now') WHERE number=?2",
        params![InvoiceStatus::Paid.to_string(), number],
    )?;
    if updated == 0 {
        bail!("Invoice '{}' not found", number);
    }
    println!("Invoice {} marked as Paid", number);
    Ok(())
}

/// All invoices, newest first. Ordering is done by the store, as the rest
/// of the tool expects.
pub fn fetch_invoices(conn: &Connection) -> Result<Vec<Invoice>> {
    let mut stmt = conn.prepare(
        "SELECT id, number, customer, date, amount, status, branch_id, created_at, updated_at
         FROM invoices ORDER BY date DESC, id DESC",
    )?;
    let mut rows = stmt.query([])?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(invoice_from_row(r)?);
    }
    Ok(data)
}

pub fn fetch_by_number(conn: &Connection, number: &str) -> Result<Invoice> {
    let mut stmt = conn.prepare(
        "SELECT id, number, customer, date, amount, status, branch_id, created_at, updated_at
         FROM invoices WHERE number=?1",
    )?;
    let mut rows = stmt.query(params![number])?;
    match rows.next()? {
        Some(r) => invoice_from_row(r),
        None => bail!("Invoice '{}' not found", number),
    }
}

// Decodes a fetched row into the typed record; a row that does not fit the
// declared shape fails the whole operation instead of flowing onward.
fn invoice_from_row(r: &rusqlite::Row) -> Result<Invoice> {
    let date_raw: String = r.get(3)?;
    let amount_raw: String = r.get(4)?;
    let status_raw: String = r.get(5)?;
    Ok(Invoice {
        id: r.get(0)?,
        number: r.get(1)?,
        customer: r.get(2)?,
        date: parse_date(&date_raw)?,
        amount: crate::utils::parse_decimal(&amount_raw)?,
        status: status_raw.parse()?,
        branch_id: r.get(6)?,
        created_at: r.get(7)?,
        updated_at: r.get(8)?,
    })
}

fn fetch_pos_items(conn: &Connection, invoice_id: i64) -> Result<Vec<CartLine>> {
    let mut stmt = conn.prepare(
        "SELECT items FROM pos_records WHERE invoice_id=?1 ORDER BY created_at, id",
    )?;
    let mut rows = stmt.query(params![invoice_id])?;
    let mut items = Vec::new();
    while let Some(r) = rows.next()? {
        let raw: String = r.get(0)?;
        let mut lines: Vec<CartLine> =
            serde_json::from_str(&raw).map_err(|e| anyhow::anyhow!("Corrupt POS items: {}", e))?;
        items.append(&mut lines);
    }
    Ok(items)
}
