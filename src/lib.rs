// Copyright (c) 2025 Tillbook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod cart;
pub mod cli;
pub mod commands;
pub mod db;
pub mod models;
pub mod report;
pub mod utils;
