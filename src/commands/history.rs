// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::KeyValueStore;
use crate::tracker::Tracker;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use chrono::Local;

pub fn handle<S: KeyValueStore>(tracker: &Tracker<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let history = tracker.history();
    if maybe_print_json(json_flag, jsonl_flag, &history)? {
        return Ok(());
    }
    if history.is_empty() {
        println!("No closed months yet");
        return Ok(());
    }
    let rows: Vec<Vec<String>> = history
        .iter()
        .map(|h| {
            vec![
                h.month().to_string(),
                h.closed_at()
                    .with_timezone(&Local)
                    .format("%Y-%m-%d")
                    .to_string(),
                fmt_money(h.income()),
                fmt_money(h.expense()),
                fmt_money(h.balance()),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Closed", "Income", "Expenses", "Balance"], rows)
    );
    Ok(())
}
