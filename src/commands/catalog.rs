// Copyright (c) 2025 Tillbook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Product;
use crate::utils::{fmt_money, load_catalog, maybe_print_json, parse_amount, pretty_table, save_catalog};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim();
    if name.is_empty() {
        bail!("Product name must not be empty");
    }
    let price = parse_amount(sub.get_one::<String>("price").unwrap())?;
    let stock = *sub.get_one::<i64>("stock").unwrap();
    if stock < 0 {
        bail!("Stock must not be negative");
    }

    let mut catalog = load_catalog(conn)?;
    if catalog.iter().any(|p| p.name == name) {
        bail!("Product '{}' already exists in the catalog", name);
    }
    let id = next_id(&catalog);
    catalog.push(Product {
        id,
        name: name.to_string(),
        price,
        stock,
    });
    save_catalog(conn, &catalog)?;
    println!("Added '{}' ({}, stock {})", name, fmt_money(&price), stock);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let catalog = load_catalog(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &catalog)? {
        let rows: Vec<Vec<String>> = catalog
            .iter()
            .map(|p| vec![p.name.clone(), fmt_money(&p.price), p.stock.to_string()])
            .collect();
        println!("{}", pretty_table(&["Name", "Price", "Stock"], rows));
    }
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let mut catalog = load_catalog(conn)?;
    let before = catalog.len();
    catalog.retain(|p| p.name != *name);
    if catalog.len() == before {
        bail!("Product '{}' not found in the catalog", name);
    }
    save_catalog(conn, &catalog)?;
    println!("Removed '{}' from the catalog", name);
    Ok(())
}

pub fn next_id(catalog: &[Product]) -> i64 {
    catalog.iter().map(|p| p.id).max().unwrap_or(0) + 1
}
