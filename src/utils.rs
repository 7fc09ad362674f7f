// Copyright (c) 2025 Tillbook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cart::Cart;
use crate::models::Product;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

// Fixed keys in the settings table. The catalog and the pending cart are
// client-local state, mirrored back on every change.
pub const BRANCH_KEY: &str = "branch_id";
pub const CATALOG_KEY: &str = "catalog";
pub const CART_KEY: &str = "cart";

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Monetary amounts are non-negative everywhere in this model; direction is
/// carried separately on transactions.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d.is_sign_negative() {
        anyhow::bail!("Amount '{}' must not be negative", s);
    }
    Ok(d)
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("Rp {}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn clear_setting(conn: &Connection, key: &str) -> Result<()> {
    conn.execute("DELETE FROM settings WHERE key=?1", params![key])?;
    Ok(())
}

/// Optional branch/location context. When unset, checkout still creates the
/// invoice but skips the POS record and ledger entry.
pub fn get_branch(conn: &Connection) -> Result<Option<String>> {
    get_setting(conn, BRANCH_KEY)
}

pub fn set_branch(conn: &Connection, id: &str) -> Result<()> {
    set_setting(conn, BRANCH_KEY, id)
}

pub fn clear_branch(conn: &Connection) -> Result<()> {
    clear_setting(conn, BRANCH_KEY)
}

pub fn load_catalog(conn: &Connection) -> Result<Vec<Product>> {
    match get_setting(conn, CATALOG_KEY)? {
        Some(raw) => serde_json::from_str(&raw).context("Corrupt catalog data"),
        None => Ok(Vec::new()),
    }
}

pub fn save_catalog(conn: &Connection, products: &[Product]) -> Result<()> {
    set_setting(conn, CATALOG_KEY, &serde_json::to_string(products)?)
}

pub fn load_cart(conn: &Connection) -> Result<Cart> {
    match get_setting(conn, CART_KEY)? {
        Some(raw) => serde_json::from_str(&raw).context("Corrupt cart data"),
        None => Ok(Cart::default()),
    }
}

pub fn save_cart(conn: &Connection, cart: &Cart) -> Result<()> {
    set_setting(conn, CART_KEY, &serde_json::to_string(cart)?)
}
