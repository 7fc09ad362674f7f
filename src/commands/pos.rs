// Copyright (c) 2025 Tillbook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::cart::Cart;
use crate::models::{Direction, InvoiceStatus, Product};
use crate::utils::{
    fmt_money, get_branch, load_cart, load_catalog, maybe_print_json, pretty_table, save_cart,
    save_catalog,
};
use anyhow::Result;
use rusqlite::{Connection, params};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("qty", sub)) => qty(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("clear", _)) => clear(conn)?,
        Some(("checkout", sub)) => checkout(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn find_product<'a>(catalog: &'a [Product], name: &str) -> Result<&'a Product> {
    catalog
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| anyhow::anyhow!("Product '{}' not in the catalog", name))
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("product").unwrap();
    let catalog = load_catalog(conn)?;
    let product = find_product(&catalog, name)?;
    let mut cart = load_cart(conn)?;
    cart.add(product)?;
    save_cart(conn, &cart)?;
    println!(
        "Added '{}' to the cart (qty {})",
        product.name,
        cart.quantity_of(product.id)
    );
    Ok(())
}

fn qty(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("product").unwrap();
    let delta = *sub.get_one::<i64>("delta").unwrap();
    let catalog = load_catalog(conn)?;
    let product = find_product(&catalog, name)?;
    let mut cart = load_cart(conn)?;
    cart.adjust(product, delta)?;
    save_cart(conn, &cart)?;
    println!("'{}' now at qty {}", product.name, cart.quantity_of(product.id));
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("product").unwrap();
    let mut cart = load_cart(conn)?;
    // Removal goes by the cart line itself so a product already deleted from
    // the catalog can still be dropped.
    match cart.lines.iter().find(|l| l.name == *name) {
        Some(line) => {
            let product_id = line.product_id;
            cart.remove(product_id);
            save_cart(conn, &cart)?;
            println!("Removed '{}' from the cart", name);
        }
        None => println!("'{}' was not in the cart", name),
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let cart = load_cart(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &cart)? {
        let rows: Vec<Vec<String>> = cart
            .lines
            .iter()
            .map(|l| {
                vec![
                    l.name.clone(),
                    fmt_money(&l.price),
                    l.quantity.to_string(),
                    fmt_money(&(l.price * rust_decimal::Decimal::from(l.quantity))),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Product", "Price", "Qty", "Subtotal"], rows));
        println!("Total: {}", fmt_money(&cart.total()));
    }
    Ok(())
}

fn clear(conn: &Connection) -> Result<()> {
    save_cart(conn, &Cart::default())?;
    println!("Cart cleared");
    Ok(())
}

/// Turns the pending cart into a paid invoice. With a branch context set it
/// also writes the POS record and the Debit ledger entry; without one only
/// the invoice is created and the monetary effect stays out of the ledger.
fn checkout(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let customer = sub
        .get_one::<String>("customer")
        .map(|s| s.as_str())
        .unwrap_or("");
    let mut catalog = load_catalog(conn)?;
    let cart = load_cart(conn)?;
    let order = cart.checkout(customer)?;
    let branch = get_branch(conn)?;

    let today = chrono::Utc::now().date_naive();
    let millis = chrono::Utc::now().timestamp_millis();
    let number = format!("INV-{}", millis);
    let code = format!("POS-{}", millis);

    // The stock ceiling was enforced on every cart mutation; the catalog is
    // not re-validated here (single active session assumed).
    for p in catalog.iter_mut() {
        if let Some(line) = order.lines.iter().find(|l| l.product_id == p.id) {
            p.stock -= line.quantity;
        }
    }

    let tx = conn.transaction()?;
    tx.execute(
        "INSERT INTO invoices(number, customer, date, amount, status, branch_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            number,
            order.customer,
            today.to_string(),
            order.total.to_string(),
            InvoiceStatus::Paid.to_string(),
            branch
        ],
    )?;
    let invoice_id = tx.last_insert_rowid();

    if let Some(branch_id) = &branch {
        let items = serde_json::to_string(&order.lines)?;
        tx.execute(
            "INSERT INTO pos_records(code, date, total, items, invoice_id, branch_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                code,
                today.to_string(),
                order.total.to_string(),
                items,
                invoice_id,
                branch_id
            ],
        )?;
        tx.execute(
            "INSERT INTO transactions(date, description, category, direction, amount, invoice_id, branch_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                today.to_string(),
                format!("POS sale - {}", code),
                "Sales",
                Direction::Debit.to_string(),
                order.total.to_string(),
                invoice_id,
                branch_id
            ],
        )?;
    }

    save_catalog(&tx, &catalog)?;
    save_cart(&tx, &Cart::default())?;
    tx.commit()?;

    println!(
        "Invoice {} created for {} - total {}",
        number,
        order.customer,
        fmt_money(&order.total)
    );
    if branch.is_none() {
        println!("No branch context set; POS record and ledger entry skipped");
    }
    Ok(())
}
