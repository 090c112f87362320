// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashSet;

use chrono::{DateTime, TimeZone, Utc};
use monthbook::db::MemoryStore;
use monthbook::models::{Category, TransactionKind, MAX_AMOUNT};
use monthbook::store::{HISTORY_KEY, TRANSACTIONS_KEY};
use monthbook::tracker::{ArchiveScope, Tracker};
use monthbook::Error;
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn at(y: i32, m: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, day, 12, 0, 0).unwrap()
}

fn tracker() -> Tracker<MemoryStore> {
    Tracker::open(MemoryStore::new())
}

#[test]
fn ids_are_unique_even_within_one_millisecond() {
    let mut t = tracker();
    let when = at(2024, 3, 5);
    let mut seen = HashSet::new();
    for _ in 0..5 {
        let tx = t
            .add_at(TransactionKind::Income, d("1"), None, when)
            .unwrap();
        assert!(seen.insert(tx.id().clone()));
    }
    assert_eq!(seen.len(), 5);
    assert_eq!(t.transactions()[4].id().as_str(), "1709640000000");
}

#[test]
fn ids_stay_unique_after_clock_moves_back() {
    let mut t = tracker();
    let first = t
        .add_at(TransactionKind::Income, d("1"), None, at(2024, 3, 5))
        .unwrap();
    let second = t
        .add_at(TransactionKind::Income, d("1"), None, at(2024, 3, 1))
        .unwrap();
    assert_ne!(first.id(), second.id());
    assert!(second.id().as_number().unwrap() > first.id().as_number().unwrap());
}

#[test]
fn invalid_input_creates_nothing() {
    let mut t = tracker();
    let cases = [
        (TransactionKind::Income, d("0"), None),
        (TransactionKind::Income, d("-5"), None),
        (TransactionKind::Expense, d("10"), None),
        (TransactionKind::Income, d("10"), Some(Category::Gift)),
        (TransactionKind::Expense, d("-1"), Some(Category::Food)),
        (TransactionKind::Income, d("50000000000000000000000000000"), None),
        (TransactionKind::Expense, MAX_AMOUNT + d("0.01"), Some(Category::Food)),
    ];
    for (kind, amount, category) in cases {
        let err = t.add_at(kind, amount, category, at(2024, 3, 5)).unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "{:?}", err);
    }
    assert!(t.transactions().is_empty());
    assert_eq!(t.backend().writes(), 0);
}

#[test]
fn active_list_is_most_recent_first_snapshot() {
    let mut t = tracker();
    t.add_at(TransactionKind::Income, d("100"), None, at(2024, 3, 1))
        .unwrap();
    t.add_at(TransactionKind::Expense, d("5"), Some(Category::Pet), at(2024, 3, 2))
        .unwrap();
    let list = t.list_active();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].category(), Some(Category::Pet));
    assert_eq!(list[1].kind(), TransactionKind::Income);

    t.archive_all();
    // earlier snapshot is unaffected
    assert!(!list[0].is_archived());
    assert!(t.list_active().is_empty());
}

#[test]
fn every_mutation_writes_through() {
    let mut t = tracker();
    t.add_at(TransactionKind::Income, d("0.1"), None, at(2024, 3, 1))
        .unwrap();
    assert_eq!(t.backend().writes(), 1);
    let stored = t.backend().get(TRANSACTIONS_KEY).unwrap();
    let v: serde_json::Value = serde_json::from_str(stored).unwrap();
    assert_eq!(v.as_array().unwrap().len(), 1);
    assert_eq!(v[0]["type"], "income");
    assert_eq!(v[0]["amount"], "0.1");
    assert_eq!(v[0]["archived"], false);
    assert!(v[0].get("category").is_none());

    t.archive_all();
    assert_eq!(t.backend().writes(), 2);
    let v: serde_json::Value =
        serde_json::from_str(t.backend().get(TRANSACTIONS_KEY).unwrap()).unwrap();
    assert_eq!(v[0]["archived"], true);
}

#[test]
fn archive_all_is_idempotent() {
    let mut t = tracker();
    t.add_at(TransactionKind::Income, d("1"), None, at(2024, 3, 1))
        .unwrap();
    t.add_at(TransactionKind::Income, d("2"), None, at(2024, 3, 2))
        .unwrap();
    assert_eq!(t.archive_all(), 2);
    assert_eq!(t.archive_all(), 0);
    assert!(t.transactions().iter().all(|x| x.is_archived()));
}

#[test]
fn reset_closes_month_and_archives_everything() {
    let mut t = tracker();
    t.add_at(TransactionKind::Income, d("200"), None, at(2024, 6, 3))
        .unwrap();
    t.add_at(TransactionKind::Expense, d("75"), Some(Category::Food), at(2024, 6, 4))
        .unwrap();
    let before = t.snapshot_at(&at(2024, 6, 30));

    let outcome = t.reset_at(&at(2024, 6, 30));
    assert_eq!(t.history().len(), 1);
    let h = &t.history()[0];
    assert_eq!(h.month().to_string(), "2024-06");
    assert_eq!(h.income(), d("200"));
    assert_eq!(h.expense(), d("75"));
    assert_eq!(h.balance(), d("125"));
    assert_eq!(h.income(), before.income);
    assert_eq!(h.expense(), before.expense);
    assert_eq!(h.closed_at(), at(2024, 6, 30));
    assert_eq!(outcome.archived, 2);
    assert!(!outcome.month_was_empty);
    assert!(t.list_active().is_empty());

    let stored = t.backend().get(HISTORY_KEY).unwrap();
    let v: serde_json::Value = serde_json::from_str(stored).unwrap();
    assert_eq!(v[0]["month"], "2024-06");
    assert_eq!(v[0]["balance"], "125");
}

#[test]
fn default_scope_archives_other_months_too() {
    let mut t = tracker();
    t.add_at(TransactionKind::Income, d("10"), None, at(2024, 5, 20))
        .unwrap();
    t.add_at(TransactionKind::Income, d("20"), None, at(2024, 6, 2))
        .unwrap();
    let outcome = t.reset_at(&at(2024, 6, 10));
    assert_eq!(outcome.summary.income(), d("20"));
    assert_eq!(outcome.archived, 2);
    assert!(t.list_active().is_empty());
}

#[test]
fn month_scope_only_archives_closed_month() {
    let mut t = tracker().with_scope(ArchiveScope::CurrentMonth);
    t.add_at(TransactionKind::Income, d("10"), None, at(2024, 5, 20))
        .unwrap();
    t.add_at(TransactionKind::Income, d("20"), None, at(2024, 6, 2))
        .unwrap();
    let outcome = t.reset_at(&at(2024, 6, 10));
    assert_eq!(outcome.archived, 1);
    let active = t.list_active();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].amount(), d("10"));
}

#[test]
fn repeated_reset_appends_zero_summary() {
    let mut t = tracker();
    t.add_at(TransactionKind::Income, d("50"), None, at(2024, 6, 2))
        .unwrap();
    t.reset_at(&at(2024, 6, 10));
    let again = t.reset_at(&at(2024, 6, 11));
    assert!(again.month_was_empty);
    assert_eq!(again.archived, 0);
    assert_eq!(t.history().len(), 2);
    assert_eq!(t.history()[1].balance(), Decimal::ZERO);
    assert_eq!(t.history()[0].income(), d("50"));
}

#[test]
fn failed_write_keeps_memory_state_and_retries() {
    let mut t = tracker();
    t.backend_mut().set_fail_writes(true);
    let tx = t
        .add_at(TransactionKind::Income, d("15"), None, at(2024, 4, 1))
        .unwrap();
    assert!(t.is_dirty());
    assert_eq!(t.list_active().len(), 1);
    assert!(t.backend().get(TRANSACTIONS_KEY).is_none());
    assert!(matches!(t.flush(), Err(Error::Persistence(_))));

    t.backend_mut().set_fail_writes(false);
    t.add_at(TransactionKind::Expense, d("3"), Some(Category::Gift), at(2024, 4, 2))
        .unwrap();
    assert!(!t.is_dirty());
    let v: serde_json::Value =
        serde_json::from_str(t.backend().get(TRANSACTIONS_KEY).unwrap()).unwrap();
    assert_eq!(v.as_array().unwrap().len(), 2);
    assert_eq!(v[1]["id"], tx.id().as_str());
}

#[test]
fn failed_reset_write_still_advances() {
    let mut t = tracker();
    t.add_at(TransactionKind::Income, d("15"), None, at(2024, 4, 1))
        .unwrap();
    t.backend_mut().set_fail_writes(true);
    t.reset_at(&at(2024, 4, 30));
    assert!(t.is_dirty());
    assert_eq!(t.history().len(), 1);
    assert!(t.list_active().is_empty());
    assert!(t.backend().get(HISTORY_KEY).is_none());

    t.backend_mut().set_fail_writes(false);
    t.flush().unwrap();
    assert!(!t.is_dirty());
    assert!(t.backend().get(HISTORY_KEY).is_some());
}

#[test]
fn state_survives_reopen() {
    let mut t = tracker();
    t.add_at(TransactionKind::Expense, d("19.99"), Some(Category::Clothing), at(2024, 2, 9))
        .unwrap();
    t.reset_at(&at(2024, 2, 28));
    t.add_at(TransactionKind::Income, d("1200"), None, at(2024, 3, 1))
        .unwrap();

    let reopened = Tracker::open(t.into_backend());
    assert!(reopened.load_warnings().is_empty());
    assert_eq!(reopened.transactions().len(), 2);
    assert_eq!(reopened.list_active().len(), 1);
    assert_eq!(reopened.history().len(), 1);
    assert_eq!(reopened.history()[0].expense(), d("19.99"));
    assert_eq!(reopened.history()[0].balance(), d("-19.99"));
}

#[test]
fn reset_of_maximal_amounts_closes_cleanly() {
    let mut t = tracker();
    for day in 1..=20 {
        t.add_at(TransactionKind::Income, MAX_AMOUNT, None, at(2025, 1, day))
            .unwrap();
        t.add_at(TransactionKind::Expense, MAX_AMOUNT, Some(Category::Shopping), at(2025, 1, day))
            .unwrap();
    }
    t.add_at(TransactionKind::Income, MAX_AMOUNT, None, at(2025, 1, 21))
        .unwrap();

    let outcome = t.reset_at(&at(2025, 1, 31));
    assert_eq!(outcome.archived, 41);
    assert_eq!(outcome.summary.income(), d("21000000000000000"));
    assert_eq!(outcome.summary.expense(), d("20000000000000000"));
    assert_eq!(outcome.summary.balance(), MAX_AMOUNT);

    let reopened = Tracker::open(t.into_backend());
    assert!(reopened.load_warnings().is_empty());
    assert_eq!(reopened.history()[0].balance(), MAX_AMOUNT);
}
