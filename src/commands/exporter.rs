// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::io::Write;

use crate::db::KeyValueStore;
use crate::models::{MonthlySummary, Transaction};
use crate::tracker::Tracker;
use anyhow::{bail, Context, Result};

pub fn handle<S: KeyValueStore>(tracker: &Tracker<S>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let (fmt, out) = format_and_out(sub)?;
            let items = if sub.get_flag("archived") {
                tracker.transactions().to_vec()
            } else {
                tracker.list_active()
            };
            let file = std::fs::File::create(out).with_context(|| format!("Create {}", out))?;
            write_transactions(file, &fmt, &items)?;
            println!("Exported {} transactions to {}", items.len(), out);
        }
        Some(("history", sub)) => {
            let (fmt, out) = format_and_out(sub)?;
            let file = std::fs::File::create(out).with_context(|| format!("Create {}", out))?;
            write_history(file, &fmt, tracker.history())?;
            println!("Exported {} months to {}", tracker.history().len(), out);
        }
        _ => {}
    }
    Ok(())
}

fn format_and_out(sub: &clap::ArgMatches) -> Result<(String, &String)> {
    let fmt = sub
        .get_one::<String>("format")
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| "csv".to_string());
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }
    let out = sub.get_one::<String>("out").context("--out is required")?;
    Ok((fmt, out))
}

pub fn write_transactions<W: Write>(w: W, fmt: &str, items: &[Transaction]) -> Result<()> {
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_writer(w);
            wtr.write_record(["id", "date", "type", "category", "amount", "archived"])?;
            for t in items {
                wtr.write_record([
                    t.id().to_string(),
                    t.timestamp().to_rfc3339(),
                    t.kind().to_string(),
                    t.category().map(|c| c.to_string()).unwrap_or_default(),
                    t.amount().to_string(),
                    t.is_archived().to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => serde_json::to_writer_pretty(w, items)?,
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(())
}

pub fn write_history<W: Write>(w: W, fmt: &str, items: &[MonthlySummary]) -> Result<()> {
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_writer(w);
            wtr.write_record(["month", "income", "expense", "balance", "closed_at"])?;
            for h in items {
                wtr.write_record([
                    h.month().to_string(),
                    h.income().to_string(),
                    h.expense().to_string(),
                    h.balance().to_string(),
                    h.closed_at().to_rfc3339(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => serde_json::to_writer_pretty(w, items)?,
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(())
}
