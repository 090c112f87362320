// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::KeyValueStore;
use crate::tracker::{ResetOutcome, Tracker};
use crate::utils::fmt_money;
use anyhow::{bail, Result};
use chrono::{DateTime, TimeZone};

pub fn handle<S: KeyValueStore>(tracker: &mut Tracker<S>, sub: &clap::ArgMatches) -> Result<()> {
    let force = sub.get_flag("force");
    let outcome = reset_at(tracker, &chrono::Local::now(), force)?;
    let s = &outcome.summary;
    println!(
        "Closed {}: income {}, expenses {}, balance {} ({} transactions archived)",
        s.month(),
        fmt_money(s.income()),
        fmt_money(s.expense()),
        fmt_money(s.balance()),
        outcome.archived
    );
    Ok(())
}

/// Refuses to close a month without active transactions unless `force`.
pub fn reset_at<S: KeyValueStore, Tz: TimeZone>(
    tracker: &mut Tracker<S>,
    now: &DateTime<Tz>,
    force: bool,
) -> Result<ResetOutcome> {
    if !force && tracker.active_in_month(now) == 0 {
        bail!(
            "No active transactions this month; nothing to close (use --force to record an empty month)"
        );
    }
    Ok(tracker.reset_at(now))
}
