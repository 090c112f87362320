// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::KeyValueStore;
use crate::models::{Category, Transaction, TransactionKind};
use crate::tracker::Tracker;
use crate::utils::{fmt_signed, maybe_print_json, parse_amount, pretty_table};
use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;

pub fn add<S: KeyValueStore>(
    tracker: &mut Tracker<S>,
    kind: TransactionKind,
    sub: &clap::ArgMatches,
) -> Result<Transaction> {
    let raw = sub
        .get_one::<String>("amount")
        .context("amount is required")?;
    let amount = parse_amount(raw)?;
    // only the expense subcommand defines --category
    let category = match kind {
        TransactionKind::Expense => sub
            .get_one::<String>("category")
            .map(|c| c.parse::<Category>())
            .transpose()?,
        TransactionKind::Income => None,
    };
    let tx = tracker.add(kind, amount, category)?;
    match tx.category() {
        Some(cat) => println!("Recorded {} {} ({})", kind, fmt_signed(amount, true), cat),
        None => println!("Recorded {} {}", kind, fmt_signed(amount, false)),
    }
    Ok(tx)
}

pub fn list<S: KeyValueStore>(tracker: &Tracker<S>, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(tracker, sub);
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        if data.is_empty() {
            println!("No transactions yet");
            return Ok(());
        }
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.date.clone(),
                    r.label.clone(),
                    fmt_signed(r.amount, r.kind == TransactionKind::Expense),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Date", "Type", "Amount"], rows));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub kind: TransactionKind,
    /// "Income", or the expense category.
    pub label: String,
    pub amount: rust_decimal::Decimal,
}

impl TransactionRow {
    fn from_transaction(t: &Transaction) -> Self {
        Self {
            id: t.id().to_string(),
            date: t
                .timestamp()
                .with_timezone(&Local)
                .format("%Y-%m-%d")
                .to_string(),
            kind: t.kind(),
            label: match t.category() {
                Some(c) => c.to_string(),
                None => "Income".to_string(),
            },
            amount: t.amount(),
        }
    }
}

/// Active transactions, most recent first, honouring `--limit`.
pub fn query_rows<S: KeyValueStore>(
    tracker: &Tracker<S>,
    sub: &clap::ArgMatches,
) -> Vec<TransactionRow> {
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);
    tracker
        .list_active()
        .iter()
        .take(limit)
        .map(TransactionRow::from_transaction)
        .collect()
}
