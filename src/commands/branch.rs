// Copyright (c) 2025 Tillbook Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{clear_branch, get_branch, set_branch};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            if id.is_empty() {
                bail!("Branch id must not be empty");
            }
            set_branch(conn, id)?;
            println!("Branch context set to '{}'", id);
        }
        Some(("show", _)) => match get_branch(conn)? {
            Some(id) => println!("{}", id),
            None => println!("No branch context set"),
        },
        Some(("clear", _)) => {
            clear_branch(conn)?;
            println!("Branch context cleared");
        }
        _ => {}
    }
    Ok(())
}
