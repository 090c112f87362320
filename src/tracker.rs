// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Application state: the transaction store, the month history and the
//! storage collaborator they are written through to.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregate::{aggregate, aggregate_month, MonthSnapshot};
use crate::db::KeyValueStore;
use crate::error::{Error, Result};
use crate::models::{Category, MonthKey, MonthlySummary, Transaction, TransactionKind};
use crate::store::{
    decode_collection, encode_collection, MonthlyHistory, TransactionStore, HISTORY_KEY,
    TRANSACTIONS_KEY,
};

/// Which transactions a reset archives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArchiveScope {
    /// Every active transaction, whatever month it falls in.
    #[default]
    All,
    /// Only transactions of the month being closed.
    CurrentMonth,
}

impl ArchiveScope {
    pub fn as_str(self) -> &'static str {
        match self {
            ArchiveScope::All => "all",
            ArchiveScope::CurrentMonth => "month",
        }
    }
}

impl fmt::Display for ArchiveScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArchiveScope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(ArchiveScope::All),
            "month" | "current-month" => Ok(ArchiveScope::CurrentMonth),
            other => Err(Error::Validation(format!(
                "unknown archive scope '{}', expected 'all' or 'month'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResetOutcome {
    pub summary: MonthlySummary,
    /// Transactions whose flag flipped to archived.
    pub archived: usize,
    /// No active transaction fell in the closed month.
    pub month_was_empty: bool,
}

pub struct Tracker<S> {
    backend: S,
    transactions: TransactionStore,
    history: MonthlyHistory,
    scope: ArchiveScope,
    dirty: bool,
    load_warnings: Vec<Error>,
}

impl<S: KeyValueStore> Tracker<S> {
    /// Load both collections from `backend`.
    ///
    /// A missing, unreadable or malformed value starts that collection empty;
    /// the reason is logged and kept in [`Tracker::load_warnings`].
    pub fn open(backend: S) -> Self {
        let mut load_warnings = Vec::new();
        let transactions = load_or_empty(&backend, TRANSACTIONS_KEY, &mut load_warnings);
        let history = load_or_empty(&backend, HISTORY_KEY, &mut load_warnings);
        tracing::debug!(
            transactions = transactions.len(),
            history = history.len(),
            "loaded tracker state"
        );
        Self {
            backend,
            transactions: TransactionStore::from_records(transactions),
            history: MonthlyHistory::from_records(history),
            scope: ArchiveScope::default(),
            dirty: false,
            load_warnings,
        }
    }

    pub fn with_scope(mut self, scope: ArchiveScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn scope(&self) -> ArchiveScope {
        self.scope
    }

    pub fn load_warnings(&self) -> &[Error] {
        &self.load_warnings
    }

    /// True while the last persist attempt failed and has not been retried
    /// successfully.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    pub fn into_backend(self) -> S {
        self.backend
    }

    /// Record a new transaction stamped with the current time.
    pub fn add(
        &mut self,
        kind: TransactionKind,
        amount: Decimal,
        category: Option<Category>,
    ) -> Result<Transaction> {
        self.add_at(kind, amount, category, Utc::now())
    }

    /// Record a new transaction stamped `at`.
    ///
    /// # Errors
    ///
    /// Only [`Error::Validation`]. A failed write leaves the transaction in
    /// memory and marks the tracker dirty instead.
    pub fn add_at(
        &mut self,
        kind: TransactionKind,
        amount: Decimal,
        category: Option<Category>,
        at: DateTime<Utc>,
    ) -> Result<Transaction> {
        let id = self.transactions.next_id(at);
        let tx = Transaction::new(id, kind, amount, category, at)?;
        self.transactions.prepend(tx.clone());
        tracing::info!(id = %tx.id(), kind = %kind, amount = %amount, "recorded transaction");
        self.persist();
        Ok(tx)
    }

    /// Non-archived transactions, most recent first.
    pub fn list_active(&self) -> Vec<Transaction> {
        self.transactions.active()
    }

    /// Every stored transaction, archived ones included.
    pub fn transactions(&self) -> &[Transaction] {
        self.transactions.records()
    }

    pub fn history(&self) -> &[MonthlySummary] {
        self.history.records()
    }

    /// Archive every transaction. Idempotent; returns how many changed.
    pub fn archive_all(&mut self) -> usize {
        let changed = self.transactions.archive_all();
        self.persist();
        changed
    }

    /// Snapshot of the current local month over the active transactions.
    pub fn current_snapshot(&self) -> MonthSnapshot {
        self.snapshot_at(&Local::now())
    }

    pub fn snapshot_at<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> MonthSnapshot {
        aggregate(&self.transactions.active(), at)
    }

    pub fn snapshot_of<Tz: TimeZone>(&self, month: MonthKey, tz: &Tz) -> MonthSnapshot {
        aggregate_month(&self.transactions.active(), month, tz)
    }

    /// Active transactions in the month containing `at`.
    pub fn active_in_month<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> usize {
        let month = MonthKey::of(at);
        let tz = at.timezone();
        self.transactions
            .records()
            .iter()
            .filter(|t| !t.is_archived() && t.month_key(&tz) == month)
            .count()
    }

    /// Close the current local month.
    pub fn reset(&mut self) -> ResetOutcome {
        self.reset_at(&Local::now())
    }

    /// Close the month containing `now`: append its summary to the history,
    /// archive transactions per the configured [`ArchiveScope`], then persist
    /// both collections in one write.
    ///
    /// The summary is taken before anything is archived. Repeated resets are
    /// not deduplicated; check [`ResetOutcome::month_was_empty`] or
    /// [`Tracker::active_in_month`] to guard against them. A failed write
    /// marks the tracker dirty rather than undoing the close.
    pub fn reset_at<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> ResetOutcome {
        let month_was_empty = self.active_in_month(now) == 0;
        let snapshot = self.snapshot_at(now);
        let summary = MonthlySummary::new(
            snapshot.month,
            snapshot.income,
            snapshot.expense,
            now.with_timezone(&Utc),
        );
        self.history.append(summary.clone());

        let archived = match self.scope {
            ArchiveScope::All => self.transactions.archive_all(),
            ArchiveScope::CurrentMonth => self
                .transactions
                .archive_month(snapshot.month, &now.timezone()),
        };

        self.persist();

        tracing::info!(
            month = %summary.month(),
            income = %summary.income(),
            expense = %summary.expense(),
            archived,
            "closed month"
        );
        if month_was_empty {
            tracing::warn!(month = %summary.month(), "closed a month with no active transactions");
        }

        ResetOutcome {
            summary,
            archived,
            month_was_empty,
        }
    }

    /// Write both collections out now, clearing the dirty flag on success.
    pub fn flush(&mut self) -> Result<()> {
        let entries = [
            (
                TRANSACTIONS_KEY,
                encode_collection(TRANSACTIONS_KEY, self.transactions.records())?,
            ),
            (
                HISTORY_KEY,
                encode_collection(HISTORY_KEY, self.history.records())?,
            ),
        ];
        match self.backend.save_all(&entries) {
            Ok(()) => {
                self.dirty = false;
                tracing::debug!("persisted tracker state");
                Ok(())
            }
            Err(e) => {
                self.dirty = true;
                Err(e)
            }
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.flush() {
            self.dirty = true;
            tracing::warn!(error = %e, "could not persist changes, will retry on next change");
        }
    }
}

fn load_or_empty<S, T>(backend: &S, key: &str, warnings: &mut Vec<Error>) -> Vec<T>
where
    S: KeyValueStore,
    T: serde::de::DeserializeOwned,
{
    let raw = match backend.load(key) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(key, error = %e, "could not read stored value, starting empty");
            warnings.push(e);
            return Vec::new();
        }
    };
    match decode_collection(key, raw.as_deref()) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(key, error = %e, "ignoring malformed stored value");
            warnings.push(e);
            Vec::new()
        }
    }
}
