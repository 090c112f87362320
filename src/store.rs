// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashSet;

use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};
use crate::models::{MonthKey, MonthlySummary, Transaction, TransactionId};

/// Storage key of the serialized transaction list.
pub const TRANSACTIONS_KEY: &str = "transactions";
/// Storage key of the serialized month history.
pub const HISTORY_KEY: &str = "monthlyTotals";

/// Transactions, most recent first.
#[derive(Debug, Clone, Default)]
pub struct TransactionStore {
    records: Vec<Transaction>,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Transaction>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// An id not used by any record in the store.
    ///
    /// Starts from the epoch milliseconds of `at`; bumped past the largest
    /// numeric id already present. If that id is `i64::MAX`, a suffixed
    /// non-numeric id is issued instead.
    pub fn next_id(&self, at: DateTime<Utc>) -> TransactionId {
        let candidate = at.timestamp_millis();
        let highest = self.records.iter().filter_map(|t| t.id().as_number()).max();
        match highest {
            Some(h) if candidate <= h => match h.checked_add(1) {
                Some(next) => TransactionId::new(next.to_string()),
                None => self.suffixed_id(h),
            },
            _ => TransactionId::new(candidate.to_string()),
        }
    }

    fn suffixed_id(&self, base: i64) -> TransactionId {
        let taken: HashSet<&str> = self.records.iter().map(|t| t.id().as_str()).collect();
        (1..)
            .map(|n: u64| format!("{}-{}", base, n))
            .find(|id| !taken.contains(id.as_str()))
            .map(TransactionId::new)
            .unwrap_or_else(|| TransactionId::new(base.to_string()))
    }

    pub(crate) fn prepend(&mut self, tx: Transaction) {
        self.records.insert(0, tx);
    }

    /// Snapshot of the non-archived records, most recent first.
    pub fn active(&self) -> Vec<Transaction> {
        self.records
            .iter()
            .filter(|t| !t.is_archived())
            .cloned()
            .collect()
    }

    /// Archive every record. Returns how many changed state.
    pub fn archive_all(&mut self) -> usize {
        self.records
            .iter_mut()
            .map(Transaction::mark_archived)
            .filter(|changed| *changed)
            .count()
    }

    /// Archive the records of one month, bucketed in `tz`.
    pub fn archive_month<Tz: TimeZone>(&mut self, month: MonthKey, tz: &Tz) -> usize {
        self.records
            .iter_mut()
            .filter(|t| t.month_key(tz) == month)
            .map(Transaction::mark_archived)
            .filter(|changed| *changed)
            .count()
    }
}

/// Append-only list of closed months, oldest first.
#[derive(Debug, Clone, Default)]
pub struct MonthlyHistory {
    records: Vec<MonthlySummary>,
}

impl MonthlyHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<MonthlySummary>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[MonthlySummary] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&MonthlySummary> {
        self.records.last()
    }

    pub(crate) fn append(&mut self, summary: MonthlySummary) {
        self.records.push(summary);
    }
}

/// Parse a stored collection. An absent value is an empty collection.
pub fn decode_collection<T: DeserializeOwned>(key: &str, raw: Option<&str>) -> Result<Vec<T>> {
    match raw {
        None => Ok(Vec::new()),
        Some(s) => serde_json::from_str(s).map_err(|e| Error::MalformedStoredData {
            key: key.to_string(),
            reason: e.to_string(),
        }),
    }
}

pub fn encode_collection<T: serde::Serialize>(key: &str, items: &[T]) -> Result<String> {
    serde_json::to_string(items)
        .map_err(|e| Error::Persistence(format!("could not serialize '{}': {}", key, e)))
}
