// Copyright (c) 2025 Tillbook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Unpaid,
    Paid,
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceStatus::Unpaid => write!(f, "Unpaid"),
            InvoiceStatus::Paid => write!(f, "Paid"),
        }
    }
}

impl FromStr for InvoiceStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unpaid" => Ok(InvoiceStatus::Unpaid),
            "paid" => Ok(InvoiceStatus::Paid),
            other => Err(anyhow::anyhow!(
                "Unknown invoice status '{}', expected unpaid|paid",
                other
            )),
        }
    }
}

/// Inflow/outflow marker on a ledger transaction. `Debit` is money in,
/// `Credit` is money out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Debit,
    Credit,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Debit => write!(f, "Debit"),
            Direction::Credit => write!(f, "Credit"),
        }
    }
}

impl FromStr for Direction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debit" => Ok(Direction::Debit),
            "credit" => Ok(Direction::Credit),
            other => Err(anyhow::anyhow!(
                "Unknown direction '{}', expected debit|credit",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub number: String,
    pub customer: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub status: InvoiceStatus,
    pub branch_id: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub direction: Direction,
    pub amount: Decimal,
    pub invoice_id: Option<i64>,
    pub branch_id: Option<String>,
}

/// Catalog entry. The catalog is client-local state kept as JSON in the
/// settings table, not a store collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub stock: i64,
}

/// One cart line. Price is copied from the product at add time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: i64,
    pub name: String,
    pub price: Decimal,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PosRecord {
    pub id: i64,
    pub code: String,
    pub date: NaiveDate,
    pub total: Decimal,
    pub items: String,
    pub invoice_id: Option<i64>,
    pub branch_id: String,
}
