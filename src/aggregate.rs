// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Month snapshot computation.
//!
//! Everything here is a pure function of its inputs. Sums are accumulated in
//! [`Decimal`] at full precision; rounding to cents only happens in
//! [`MonthSnapshot::rounded`].

use chrono::{DateTime, TimeZone};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::{Category, MonthKey, Transaction, TransactionKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub amount: Decimal,
}

/// Income, expense and per-category spend for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSnapshot {
    pub month: MonthKey,
    pub income: Decimal,
    pub expense: Decimal,
    /// `income - expense`, not clamped.
    pub balance: Decimal,
    /// One entry per category, in [`Category::ALL`] order.
    pub by_category: Vec<CategoryTotal>,
}

impl MonthSnapshot {
    /// Copy with every amount rounded to 2 fractional digits, midpoints away
    /// from zero.
    pub fn rounded(&self) -> MonthSnapshot {
        MonthSnapshot {
            month: self.month,
            income: round_cents(self.income),
            expense: round_cents(self.expense),
            balance: round_cents(self.balance),
            by_category: self
                .by_category
                .iter()
                .map(|c| CategoryTotal {
                    category: c.category,
                    amount: round_cents(c.amount),
                })
                .collect(),
        }
    }

    pub fn category_amount(&self, category: Category) -> Decimal {
        self.by_category
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.amount)
            .unwrap_or(Decimal::ZERO)
    }

    /// Percentage of the month's expense per category, one decimal place.
    /// All zero when nothing was spent.
    pub fn category_shares(&self) -> Vec<(Category, Decimal)> {
        self.by_category
            .iter()
            .map(|c| {
                // amount <= expense, so the ratio stays within [0, 1]
                let share = c
                    .amount
                    .checked_div(self.expense)
                    .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                    .unwrap_or(Decimal::ZERO)
                    .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
                (c.category, share)
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.income.is_zero() && self.expense.is_zero()
    }
}

pub fn round_cents(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Snapshot of the month containing `reference`.
///
/// Transactions are bucketed in `reference`'s time zone. Archived records are
/// not skipped; pass only the active ones if they should be left out.
pub fn aggregate<Tz: TimeZone>(transactions: &[Transaction], reference: &DateTime<Tz>) -> MonthSnapshot {
    aggregate_month(transactions, MonthKey::of(reference), &reference.timezone())
}

/// Snapshot of an explicit `month`, bucketing timestamps in `tz`.
pub fn aggregate_month<Tz: TimeZone>(
    transactions: &[Transaction],
    month: MonthKey,
    tz: &Tz,
) -> MonthSnapshot {
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    let mut per_category = [Decimal::ZERO; Category::ALL.len()];

    for t in transactions.iter().filter(|t| t.month_key(tz) == month) {
        match t.kind() {
            TransactionKind::Income => income = income.saturating_add(t.amount()),
            TransactionKind::Expense => {
                expense = expense.saturating_add(t.amount());
                if let Some(cat) = t.category() {
                    let slot = &mut per_category[cat as usize];
                    *slot = slot.saturating_add(t.amount());
                }
            }
        }
    }

    MonthSnapshot {
        month,
        income,
        expense,
        balance: income.saturating_sub(expense),
        by_category: Category::ALL
            .into_iter()
            .zip(per_category)
            .map(|(category, amount)| CategoryTotal { category, amount })
            .collect(),
    }
}
