// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::tracker::ArchiveScope;
use crate::utils::{get_archive_scope, set_archive_scope};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", _)) => {
            println!("archive-scope = {}", get_archive_scope(conn)?);
        }
        Some(("set", sub)) => {
            let value = sub
                .get_one::<String>("value")
                .context("value is required")?;
            let scope = value.parse::<ArchiveScope>()?;
            set_archive_scope(conn, scope)?;
            println!("archive-scope set to {}", scope);
        }
        _ => {}
    }
    Ok(())
}
