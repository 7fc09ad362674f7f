// Copyright (c) 2025 Tillbook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::catalog::next_id;
use crate::models::Product;
use crate::utils::{load_catalog, parse_amount, save_catalog};
use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, open_workbook_auto};
use rusqlite::Connection;
use rust_decimal::Decimal;

// Accepted spreadsheet header spellings per canonical column, matched
// case-insensitively. The first matching header wins.
const HEADER_ALIASES: [(&str, &[&str]); 3] = [
    ("name", &["name", "nama"]),
    ("price", &["price", "harga"]),
    ("stock", &["stock", "stok"]),
];

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("catalog", sub)) => import_catalog(conn, sub),
        _ => Ok(()),
    }
}

fn import_catalog(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let mut wb =
        open_workbook_auto(path).with_context(|| format!("Open spreadsheet {}", path))?;
    let range = wb
        .worksheet_range_at(0)
        .context("Spreadsheet has no sheets")?
        .with_context(|| format!("Read first sheet of {}", path))?;

    let mut rows = range.rows();
    let header = rows.next().context("Spreadsheet is empty")?;
    let mut name_col = None;
    let mut price_col = None;
    let mut stock_col = None;
    for (idx, cell) in header.iter().enumerate() {
        let text = cell.to_string().trim().to_lowercase();
        for (canonical, aliases) in HEADER_ALIASES {
            if aliases.contains(&text.as_str()) {
                let slot = match canonical {
                    "name" => &mut name_col,
                    "price" => &mut price_col,
                    _ => &mut stock_col,
                };
                if slot.is_none() {
                    *slot = Some(idx);
                }
            }
        }
    }

    let mut catalog = load_catalog(conn)?;
    let mut next = next_id(&catalog);
    let mut imported: Vec<Product> = Vec::new();
    for row in rows {
        if row.iter().all(is_blank) {
            continue;
        }
        let name = cell_text(row, name_col);
        let price = match cell_text(row, price_col) {
            s if s.is_empty() => Decimal::ZERO,
            s => parse_amount(&s).with_context(|| format!("Bad price for '{}'", name))?,
        };
        let stock = match cell_text(row, stock_col) {
            s if s.is_empty() => 0,
            s => s
                .parse::<i64>()
                .with_context(|| format!("Bad stock for '{}'", name))?,
        };
        if stock < 0 {
            bail!("Negative stock for '{}'", name);
        }
        if !name.is_empty() && catalog.iter().chain(imported.iter()).any(|p| p.name == name) {
            bail!("Product '{}' already exists in the catalog", name);
        }
        imported.push(Product {
            id: next,
            name,
            price,
            stock,
        });
        next += 1;
    }

    // Nothing is written until every row decoded cleanly; a malformed file
    // leaves the catalog as it was.
    let count = imported.len();
    catalog.extend(imported);
    save_catalog(conn, &catalog)?;
    println!("Imported {} products from {}", count, path);
    Ok(())
}

fn is_blank(cell: &Data) -> bool {
    matches!(cell, Data::Empty) || cell.to_string().trim().is_empty()
}

fn cell_text(row: &[Data], col: Option<usize>) -> String {
    match col {
        Some(idx) => row
            .get(idx)
            .map(|c| c.to_string().trim().to_string())
            .unwrap_or_default(),
        None => String::new(),
    }
}
