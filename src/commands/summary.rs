// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::MonthSnapshot;
use crate::db::KeyValueStore;
use crate::tracker::Tracker;
use crate::utils::{fmt_money, maybe_print_json, parse_month, pretty_table};
use anyhow::Result;
use chrono::Local;

pub fn handle<S: KeyValueStore>(tracker: &Tracker<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let snapshot = snapshot(tracker, sub)?.rounded();
    if !maybe_print_json(json_flag, jsonl_flag, &snapshot)? {
        print_snapshot(&snapshot);
    }
    Ok(())
}

pub fn snapshot<S: KeyValueStore>(
    tracker: &Tracker<S>,
    sub: &clap::ArgMatches,
) -> Result<MonthSnapshot> {
    Ok(match sub.get_one::<String>("month") {
        Some(m) => tracker.snapshot_of(parse_month(m)?, &Local),
        None => tracker.current_snapshot(),
    })
}

fn print_snapshot(s: &MonthSnapshot) {
    println!("Monthly overview for {}", s.month);
    println!(
        "{}",
        pretty_table(
            &["Income", "Expenses", "Balance"],
            vec![vec![
                fmt_money(s.income),
                fmt_money(s.expense),
                fmt_money(s.balance),
            ]],
        )
    );

    let rows: Vec<Vec<String>> = s
        .by_category
        .iter()
        .zip(s.category_shares())
        .map(|(c, (_, share))| {
            vec![
                c.category.to_string(),
                fmt_money(c.amount),
                format!("{:.1}%", share),
            ]
        })
        .collect();
    println!("{}", pretty_table(&["Category", "Spent", "Share"], rows));
}
