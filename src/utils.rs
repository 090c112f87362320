// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::io::{self, Write};

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

use crate::aggregate::round_cents;
use crate::error::Error;
use crate::models::MonthKey;
use crate::tracker::ArchiveScope;

/// Parse a user-entered amount. Plain and scientific notation are accepted.
pub fn parse_amount(s: &str) -> Result<Decimal, Error> {
    let s = s.trim();
    s.parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|_| Error::Validation(format!("'{}' is not a number", s)))
}

pub fn parse_month(s: &str) -> Result<MonthKey> {
    s.parse::<MonthKey>()
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s.trim()))
}

pub fn fmt_money(d: Decimal) -> String {
    format!("${:.2}", round_cents(d))
}

/// Signed display used in transaction lists: `+$10.00` / `-$4.50`.
pub fn fmt_signed(d: Decimal, negative: bool) -> String {
    if negative {
        format!("-{}", fmt_money(d))
    } else {
        format!("+{}", fmt_money(d))
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

/// Machine-readable output requested by `--json` / `--jsonl`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonMode {
    Pretty,
    /// One compact document per line; a sequence yields one line per element.
    Lines,
}

impl JsonMode {
    pub fn from_flags(json: bool, jsonl: bool) -> Option<JsonMode> {
        match (json, jsonl) {
            (true, _) => Some(JsonMode::Pretty),
            (false, true) => Some(JsonMode::Lines),
            (false, false) => None,
        }
    }
}

pub fn write_json<W: Write, T: serde::Serialize>(out: &mut W, mode: JsonMode, v: &T) -> Result<()> {
    match mode {
        JsonMode::Pretty => writeln!(out, "{}", serde_json::to_string_pretty(v)?)?,
        JsonMode::Lines => match serde_json::to_value(v)? {
            serde_json::Value::Array(items) => {
                for item in &items {
                    writeln!(out, "{}", serde_json::to_string(item)?)?;
                }
            }
            other => writeln!(out, "{}", serde_json::to_string(&other)?)?,
        },
    }
    Ok(())
}

/// Print `v` to stdout if either flag is set. Returns whether it printed.
pub fn maybe_print_json<T: serde::Serialize>(json: bool, jsonl: bool, v: &T) -> Result<bool> {
    let Some(mode) = JsonMode::from_flags(json, jsonl) else {
        return Ok(false);
    };
    write_json(&mut io::stdout().lock(), mode, v)?;
    Ok(true)
}

// Settings

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub const ARCHIVE_SCOPE_KEY: &str = "archive_scope";

pub fn get_archive_scope(conn: &Connection) -> Result<ArchiveScope> {
    match get_setting(conn, ARCHIVE_SCOPE_KEY)? {
        Some(v) => v
            .parse::<ArchiveScope>()
            .with_context(|| format!("Invalid stored archive scope '{}'", v)),
        None => Ok(ArchiveScope::default()),
    }
}

pub fn set_archive_scope(conn: &Connection, scope: ArchiveScope) -> Result<()> {
    set_setting(conn, ARCHIVE_SCOPE_KEY, scope.as_str())
}
