// Copyright (c) 2025 Tillbook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use calamine::{Reader, open_workbook_auto};
use rusqlite::Connection;
use std::path::Path;
use tillbook::{cli, commands::exporter};

fn base_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        r#"
        CREATE TABLE settings(key TEXT PRIMARY KEY, value TEXT NOT NULL);
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
        "#,
    )
    .unwrap();
    conn
}

fn seed_tx(conn: &Connection, date: &str, direction: &str, amount: &str) {
    conn.execute(
        "INSERT INTO transactions(date, description, category, direction, amount)
         VALUES (?1, ?2, 'General', ?3, ?4)",
        rusqlite::params![date, format!("{} {}", direction, amount), direction, amount],
    )
    .unwrap();
}

fn run_export(conn: &Connection, from: &str, to: &str, fmt: &str, out: &Path) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from([
        "tillbook",
        "export",
        "report",
        "--from",
        from,
        "--to",
        to,
        "--format",
        fmt,
        "--out",
        out.to_str().unwrap(),
    ]);
    if let Some(("export", sub)) = matches.subcommand() {
        exporter::handle(conn, sub)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn csv_export_carries_running_balance_and_summary() {
    let conn = base_conn();
    seed_tx(&conn, "2025-01-05", "Debit", "100");
    seed_tx(&conn, "2025-01-10", "Credit", "40");

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.csv");
    run_export(&conn, "2025-01-01", "2025-01-31", "csv", &out).unwrap();

    let content = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines[0], "No,Invoice/Date,Description,Debit,Credit,Balance");
    assert_eq!(lines[1], "1,2025-01-05,Debit 100,100,,100");
    assert_eq!(lines[2], "2,2025-01-10,Credit 40,,40,60");
    assert_eq!(lines[3], ",,,,,");
    assert_eq!(lines[4], ",SUMMARY,,,,");
    assert!(lines[5].contains("Total inflow"));
    assert!(lines[5].ends_with(",100,,"));
    assert!(lines[6].contains("Total outflow"));
    assert!(lines[7].contains("Final balance"));
    assert!(lines[7].ends_with(",60"));
}

#[test]
fn csv_export_respects_the_date_range() {
    let conn = base_conn();
    seed_tx(&conn, "2024-12-31", "Debit", "999");
    seed_tx(&conn, "2025-01-05", "Debit", "100");
    seed_tx(&conn, "2025-02-01", "Credit", "999");

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("january.csv");
    run_export(&conn, "2025-01-01", "2025-01-31", "csv", &out).unwrap();

    let content = std::fs::read_to_string(&out).unwrap();
    assert!(!content.contains("999"));
    assert!(content.contains("Debit 100"));
}

#[test]
fn xlsx_export_writes_a_report_sheet() {
    let conn = base_conn();
    seed_tx(&conn, "2025-01-05", "Debit", "100");
    seed_tx(&conn, "2025-01-10", "Credit", "40");

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.xlsx");
    run_export(&conn, "2025-01-01", "2025-01-31", "xlsx", &out).unwrap();

    let mut wb = open_workbook_auto(&out).unwrap();
    assert_eq!(wb.sheet_names(), vec!["Report".to_string()]);
    let range = wb.worksheet_range("Report").unwrap();
    let header: Vec<String> = range
        .rows()
        .next()
        .unwrap()
        .iter()
        .map(|c| c.to_string())
        .collect();
    assert_eq!(
        header,
        vec!["No", "Invoice/Date", "Description", "Debit", "Credit", "Balance"]
    );
    // 2 detail rows + blank + SUMMARY + 3 summary rows after the header
    assert_eq!(range.height(), 8);
}

#[test]
fn empty_range_is_an_error_and_writes_nothing() {
    let conn = base_conn();
    seed_tx(&conn, "2025-06-01", "Debit", "10");

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("empty.csv");
    assert!(run_export(&conn, "2025-01-01", "2025-01-31", "csv", &out).is_err());
    assert!(!out.exists());
}

#[test]
fn unknown_format_is_rejected_before_any_file_is_created() {
    let conn = base_conn();
    seed_tx(&conn, "2025-01-05", "Debit", "100");

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.pdf");
    assert!(run_export(&conn, "2025-01-01", "2025-01-31", "pdf", &out).is_err());
    assert!(!out.exists());
}

#[test]
fn bad_date_flag_is_rejected() {
    let conn = base_conn();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("x.csv");
    assert!(run_export(&conn, "01-01-2025", "2025-01-31", "csv", &out).is_err());
}
