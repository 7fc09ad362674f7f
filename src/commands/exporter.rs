// Copyright (c) 2025 Tillbook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions;
use crate::report::{self, ExportRow};
use anyhow::{Context, Result, bail};
use rusqlite::Connection;
use rust_decimal::prelude::ToPrimitive;
use std::path::{Path, PathBuf};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("report", sub)) => export_report(conn, sub),
        _ => Ok(()),
    }
}

fn export_report(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let from = crate::utils::parse_date(sub.get_one::<String>("from").unwrap())?;
    let to = crate::utils::parse_date(sub.get_one::<String>("to").unwrap())?;
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();

    let txs = transactions::fetch_range(conn, Some(from), Some(to))?;
    if txs.is_empty() {
        bail!("No transactions between {} and {}", from, to);
    }
    let rows = report::build_export(&txs);

    let out = match sub.get_one::<String>("out") {
        Some(o) => PathBuf::from(o),
        None => PathBuf::from(format!("Report_{}_{}.{}", from, to, fmt)),
    };

    match fmt.as_str() {
        "xlsx" => write_xlsx(&rows, &out)?,
        "csv" => write_csv(&rows, &out)?,
        _ => bail!("Unknown format: {} (use xlsx|csv)", fmt),
    }
    println!("Exported report to {}", out.display());
    Ok(())
}

fn write_xlsx(rows: &[ExportRow], out: &Path) -> Result<()> {
    use rust_xlsxwriter::Workbook;

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Report")?;
    for (col, header) in report::EXPORT_HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header)?;
    }
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        if let Some(no) = row.no {
            sheet.write_number(r, 0, no as f64)?;
        }
        if !row.label.is_empty() {
            sheet.write_string(r, 1, &row.label)?;
        }
        if !row.description.is_empty() {
            sheet.write_string(r, 2, &row.description)?;
        }
        if let Some(d) = row.debit {
            sheet.write_number(r, 3, to_cell(&d)?)?;
        }
        if let Some(c) = row.credit {
            sheet.write_number(r, 4, to_cell(&c)?)?;
        }
        if let Some(b) = row.balance {
            sheet.write_number(r, 5, to_cell(&b)?)?;
        }
    }
    workbook
        .save(out)
        .with_context(|| format!("Write {}", out.display()))?;
    Ok(())
}

fn to_cell(d: &rust_decimal::Decimal) -> Result<f64> {
    d.to_f64()
        .with_context(|| format!("Amount {} not representable in a sheet cell", d))
}

fn write_csv(rows: &[ExportRow], out: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(out)?;
    wtr.write_record(report::EXPORT_HEADERS)?;
    for row in rows {
        wtr.write_record([
            row.no.map(|n| n.to_string()).unwrap_or_default(),
            row.label.clone(),
            row.description.clone(),
            row.debit.map(|d| d.to_string()).unwrap_or_default(),
            row.credit.map(|c| c.to_string()).unwrap_or_default(),
            row.balance.map(|b| b.to_string()).unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
