// Copyright (c) 2025 Tillbook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Direction, Invoice, InvoiceStatus, Transaction};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

/// Invoice amounts partitioned by payment status.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusTotals {
    pub unpaid: Decimal,
    pub paid: Decimal,
}

pub fn status_totals(invoices: &[Invoice]) -> StatusTotals {
    let mut totals = StatusTotals::default();
    for inv in invoices {
        match inv.status {
            InvoiceStatus::Unpaid => totals.unpaid += inv.amount,
            InvoiceStatus::Paid => totals.paid += inv.amount,
        }
    }
    totals
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyBucket {
    pub label: String,
    pub inflow: Decimal,
    pub outflow: Decimal,
}

/// Groups transactions by abbreviated month label, keeping bucket order by
/// first encounter in the input (not necessarily chronological). All input
/// rows accumulate before the list is cut down to `limit` buckets, so a late
/// row for an early month still counts.
pub fn monthly_buckets(txs: &[Transaction], limit: usize) -> Vec<MonthlyBucket> {
    let mut buckets: Vec<MonthlyBucket> = Vec::new();
    for t in txs {
        let label = t.date.format("%b").to_string();
        let idx = match buckets.iter().position(|b| b.label == label) {
            Some(idx) => idx,
            None => {
                buckets.push(MonthlyBucket {
                    label,
                    inflow: Decimal::ZERO,
                    outflow: Decimal::ZERO,
                });
                buckets.len() - 1
            }
        };
        match t.direction {
            Direction::Debit => buckets[idx].inflow += t.amount,
            Direction::Credit => buckets[idx].outflow += t.amount,
        }
    }
    buckets.truncate(limit);
    buckets
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBucket {
    pub category: String,
    pub total: Decimal,
    /// Share of the largest bucket, in [0, 100]. Used for proportional bar
    /// rendering, not as a share of the grand total.
    pub percent: f64,
}

/// Groups transactions by category label (first-encountered order), summing
/// amounts regardless of direction. The divisor is floored at 1 so an
/// all-zero input cannot divide by zero.
pub fn category_breakdown(txs: &[Transaction]) -> Vec<CategoryBucket> {
    let mut groups: Vec<(String, Decimal)> = Vec::new();
    for t in txs {
        match groups.iter_mut().find(|(c, _)| *c == t.category) {
            Some((_, sum)) => *sum += t.amount,
            None => groups.push((t.category.clone(), t.amount)),
        }
    }
    let max = groups
        .iter()
        .map(|(_, sum)| *sum)
        .max()
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ONE);
    groups
        .into_iter()
        .map(|(category, total)| CategoryBucket {
            category,
            percent: (total / max * Decimal::from(100)).to_f64().unwrap_or(0.0),
            total,
        })
        .collect()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CashSummary {
    pub inflow: Decimal,
    pub outflow: Decimal,
    pub net: Decimal,
}

pub fn cash_summary(txs: &[Transaction]) -> CashSummary {
    let mut summary = CashSummary::default();
    for t in txs {
        match t.direction {
            Direction::Debit => summary.inflow += t.amount,
            Direction::Credit => summary.outflow += t.amount,
        }
    }
    summary.net = summary.inflow - summary.outflow;
    summary
}

pub const EXPORT_HEADERS: [&str; 6] = [
    "No",
    "Invoice/Date",
    "Description",
    "Debit",
    "Credit",
    "Balance",
];

/// One spreadsheet row. `None` fields render as blank cells.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub no: Option<usize>,
    pub label: String,
    pub description: String,
    pub debit: Option<Decimal>,
    pub credit: Option<Decimal>,
    pub balance: Option<Decimal>,
}

/// Builds the running-balance report: transactions stable-sorted ascending
/// by date, each row carrying balance = previous + debit - credit, followed
/// by a blank row, a SUMMARY marker, and total inflow / total outflow /
/// final balance rows. Row order must be preserved by writers as-is.
pub fn build_export(txs: &[Transaction]) -> Vec<ExportRow> {
    let mut sorted = txs.to_vec();
    sorted.sort_by_key(|t| t.date);

    let summary = cash_summary(&sorted);
    let mut rows = Vec::with_capacity(sorted.len() + 5);
    let mut balance = Decimal::ZERO;
    for (i, t) in sorted.iter().enumerate() {
        let (debit, credit) = match t.direction {
            Direction::Debit => (Some(t.amount), None),
            Direction::Credit => (None, Some(t.amount)),
        };
        balance += debit.unwrap_or_default() - credit.unwrap_or_default();
        let label = match t.invoice_id {
            Some(invoice_id) => format!("#{} / {}", invoice_id, t.date),
            None => t.date.to_string(),
        };
        rows.push(ExportRow {
            no: Some(i + 1),
            label,
            description: t.description.clone(),
            debit,
            credit,
            balance: Some(balance),
        });
    }

    rows.push(ExportRow::default());
    rows.push(ExportRow {
        label: "SUMMARY".to_string(),
        ..ExportRow::default()
    });
    rows.push(ExportRow {
        description: "Total inflow".to_string(),
        debit: Some(summary.inflow),
        ..ExportRow::default()
    });
    rows.push(ExportRow {
        description: "Total outflow".to_string(),
        credit: Some(summary.outflow),
        ..ExportRow::default()
    });
    rows.push(ExportRow {
        description: "Final balance".to_string(),
        balance: Some(summary.net),
        ..ExportRow::default()
    });
    rows
}
