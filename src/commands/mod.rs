// Copyright (c) 2025 Tillbook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod branch;
pub mod catalog;
pub mod exporter;
pub mod importer;
pub mod invoices;
pub mod pos;
pub mod reports;
pub mod transactions;
