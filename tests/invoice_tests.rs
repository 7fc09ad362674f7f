// Copyright (c) 2025 Tillbook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use tillbook::{cli, commands::invoices, utils};

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE settings(key TEXT PRIMARY KEY, value TEXT NOT NULL);
        CREATE TABLE invoices(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            number TEXT NOT NULL UNIQUE,
            customer TEXT NOT NULL,
            date TEXT NOT NULL,
            amount TEXT NOT NULL,
            status TEXT NOT NULL,
            branch_id TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE TABLE transactions(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            description TEXT NOT NULL,
            category TEXT NOT NULL,
            direction TEXT NOT NULL,
            amount TEXT NOT NULL,
            invoice_id INTEGER,
            branch_id TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        CREATE TABLE pos_records(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL UNIQUE,
            date TEXT NOT NULL,
            total TEXT NOT NULL,
            items TEXT NOT NULL,
            invoice_id INTEGER,
            branch_id TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )
    .unwrap();
    conn
}

fn run_invoice(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut full = vec!["tillbook", "invoice"];
    full.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(full);
    if let Some(("invoice", sub)) = matches.subcommand() {
        invoices::handle(conn, sub)
    } else {
        panic!("no invoice subcommand");
    }
}

#[test]
fn add_creates_unpaid_invoice_without_branch() {
    let conn = base_conn();
    run_invoice(
        &conn,
        &[
            "add",
            "--number",
            "INV-001",
            "--customer",
            "PT Example",
            "--date",
            "2025-03-01",
            "--amount",
            "125000",
        ],
    )
    .unwrap();

    let (status, branch): (String, Option<String>) = conn
        .query_row(
            "SELECT status, branch_id FROM invoices WHERE number='INV-001'",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(status, "Unpaid");
    assert_eq!(branch, None);
}

#[test]
fn add_stamps_current_branch_context() {
    let conn = base_conn();
    utils::set_branch(&conn, "branch-7").unwrap();
    run_invoice(
        &conn,
        &[
            "add",
            "--number",
            "INV-002",
            "--customer",
            "Alice",
            "--date",
            "2025-03-02",
            "--amount",
            "5000",
        ],
    )
    .unwrap();

    let branch: Option<String> = conn
        .query_row(
            "SELECT branch_id FROM invoices WHERE number='INV-002'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(branch.as_deref(), Some("branch-7"));
}

#[test]
fn add_rejects_negative_amount() {
    let conn = base_conn();
    let res = run_invoice(
        &conn,
        &[
            "add",
            "--number",
            "INV-003",
            "--customer",
            "Bob",
            "--date",
            "2025-03-03",
            "--amount",
            "-10",
        ],
    );
    assert!(res.is_err());
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM invoices", [], |r| r.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn add_rejects_blank_customer() {
    let conn = base_conn();
    let res = run_invoice(
        &conn,
        &[
            "add",
            "--number",
            "INV-004",
            "--customer",
            "   ",
            "--date",
            "2025-03-04",
            "--amount",
            "10",
        ],
    );
    assert!(res.is_err());
}

#[test]
fn duplicate_invoice_number_is_rejected_by_the_store() {
    let conn = base_conn();
    let args = [
        "add",
        "--number",
        "INV-005",
        "--customer",
        "Carol",
        "--date",
        "2025-03-05",
        "--amount",
        "10",
    ];
    run_invoice(&conn, &args).unwrap();
    assert!(run_invoice(&conn, &args).is_err());
}

#[test]
fn mark_paid_is_idempotent() {
    let conn = base_conn();
    run_invoice(
        &conn,
        &[
            "add",
            "--number",
            "INV-006",
            "--customer",
            "Dave",
            "--date",
            "2025-03-06",
            "--amount",
            "99",
        ],
    )
    .unwrap();

    run_invoice(&conn, &["mark-paid", "INV-006"]).unwrap();
    run_invoice(&conn, &["mark-paid", "INV-006"]).unwrap();

    let status: String = conn
        .query_row(
            "SELECT status FROM invoices WHERE number='INV-006'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(status, "Paid");
}

#[test]
fn mark_paid_unknown_number_errors() {
    let conn = base_conn();
    assert!(run_invoice(&conn, &["mark-paid", "INV-404"]).is_err());
}

#[test]
fn fetch_invoices_orders_newest_first() {
    let conn = base_conn();
    for (number, date) in [("A", "2025-01-01"), ("B", "2025-03-01"), ("C", "2025-02-01")] {
        conn.execute(
            "INSERT INTO invoices(number, customer, date, amount, status) VALUES (?1,'X',?2,'10','Unpaid')",
            rusqlite::params![number, date],
        )
        .unwrap();
    }
    let invoices = invoices::fetch_invoices(&conn).unwrap();
    let numbers: Vec<&str> = invoices.iter().map(|i| i.number.as_str()).collect();
    assert_eq!(numbers, vec!["B", "C", "A"]);
}

#[test]
fn fetch_rejects_unknown_status_value() {
    let conn = base_conn();
    conn.execute(
        "INSERT INTO invoices(number, customer, date, amount, status) VALUES ('INV-X','X','2025-01-01','10','Pending')",
        [],
    )
    .unwrap();
    assert!(invoices::fetch_invoices(&conn).is_err());
}
