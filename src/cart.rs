// Copyright (c) 2025 Tillbook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{CartLine, Product};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Conditions the cart reports and rejects without changing state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("'{name}' is out of stock")]
    OutOfStock { name: String },
    #[error("Only {stock} of '{name}' in stock")]
    StockCeiling { name: String, stock: i64 },
    #[error("Cart is empty")]
    EmptyCart,
    #[error("Customer name is required")]
    MissingCustomer,
}

/// In-memory shopping cart. Every mutation checks the requested quantity
/// against the product's current catalog stock; a rejected operation leaves
/// the cart exactly as it was.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

/// Snapshot produced by a successful checkout. Store writes and stock
/// decrements happen in the command layer; the cart itself stays pure.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub customer: String,
    pub lines: Vec<CartLine>,
    pub total: Decimal,
}

impl Cart {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn quantity_of(&self, product_id: i64) -> i64 {
        self.lines
            .iter()
            .find(|l| l.product_id == product_id)
            .map(|l| l.quantity)
            .unwrap_or(0)
    }

    /// Adds one unit of `product`. A product not yet in the cart starts at
    /// quantity 1 and requires stock of at least 1; an existing line is
    /// incremented only while it stays within stock.
    pub fn add(&mut self, product: &Product) -> Result<(), CartError> {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            if line.quantity + 1 > product.stock {
                return Err(CartError::StockCeiling {
                    name: product.name.clone(),
                    stock: product.stock,
                });
            }
            line.quantity += 1;
        } else {
            if product.stock < 1 {
                return Err(CartError::OutOfStock {
                    name: product.name.clone(),
                });
            }
            self.lines.push(CartLine {
                product_id: product.id,
                name: product.name.clone(),
                price: product.price,
                quantity: 1,
            });
        }
        Ok(())
    }

    /// Applies a signed quantity delta. A result above stock is rejected; a
    /// result of zero or below leaves the line unchanged (use `remove` to
    /// drop a line). A product without a line in the cart is a no-op.
    pub fn adjust(&mut self, product: &Product, delta: i64) -> Result<(), CartError> {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            let next = line.quantity + delta;
            if next > product.stock {
                return Err(CartError::StockCeiling {
                    name: product.name.clone(),
                    stock: product.stock,
                });
            }
            if next > 0 {
                line.quantity = next;
            }
        }
        Ok(())
    }

    /// Unconditional removal by product identifier.
    pub fn remove(&mut self, product_id: i64) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .map(|l| l.price * Decimal::from(l.quantity))
            .sum()
    }

    /// Validates the cart and customer name and snapshots them into an
    /// `Order`. The cart is not cleared here; the caller clears it after the
    /// store writes succeed.
    pub fn checkout(&self, customer: &str) -> Result<Order, CartError> {
        if self.lines.is_empty() {
            return Err(CartError::EmptyCart);
        }
        let customer = customer.trim();
        if customer.is_empty() {
            return Err(CartError::MissingCustomer);
        }
        Ok(Order {
            customer: customer.to_string(),
            lines: self.lines.clone(),
            total: self.total(),
        })
    }
}
