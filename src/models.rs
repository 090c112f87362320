// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// The fixed set of expense categories, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Food,
    Clothing,
    Education,
    Health,
    Shopping,
    Pet,
    Furniture,
    Gift,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Clothing,
        Category::Education,
        Category::Health,
        Category::Shopping,
        Category::Pet,
        Category::Furniture,
        Category::Gift,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Clothing => "Clothing",
            Category::Education => "Education",
            Category::Health => "Health",
            Category::Shopping => "Shopping",
            Category::Pet => "Pet",
            Category::Furniture => "Furniture",
            Category::Gift => "Gift",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = Error;

    /// Case-insensitive lookup by name.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let names: Vec<&str> = Category::ALL.iter().map(|c| c.name()).collect();
                Error::Validation(format!(
                    "unknown category '{}', expected one of {}",
                    wanted,
                    names.join(", ")
                ))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Income => f.write_str("income"),
            TransactionKind::Expense => f.write_str("expense"),
        }
    }
}

/// Calendar month used to bucket transactions, displayed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidMonth(format!("{}-{}", year, month)));
        }
        Ok(Self { year, month })
    }

    /// The month containing `at`, in `at`'s own time zone.
    pub fn of<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// 1-based.
    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let bad = || Error::InvalidMonth(s.to_string());
        let (y, m) = s.split_once('-').ok_or_else(bad)?;
        if y.len() != 4 || m.len() != 2 {
            return Err(bad());
        }
        let year: i32 = y.parse().map_err(|_| bad())?;
        let month: u32 = m.parse().map_err(|_| bad())?;
        MonthKey::new(year, month).map_err(|_| bad())
    }
}

impl TryFrom<String> for MonthKey {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<MonthKey> for String {
    fn from(k: MonthKey) -> Self {
        k.to_string()
    }
}

/// Opaque transaction identifier.
///
/// Freshly issued ids are epoch milliseconds rendered in decimal, which keeps
/// them compatible with collections exported from the browser version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The numeric value of the id, if it is one.
    pub fn as_number(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single income or expense record.
///
/// Instances can only be built through [`Transaction::new`] (or by
/// deserializing a stored record, which runs the same checks), so an expense
/// always carries a category, income never does, and the amount is positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredTransaction")]
pub struct Transaction {
    id: TransactionId,
    #[serde(rename = "type")]
    kind: TransactionKind,
    amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<Category>,
    #[serde(rename = "date")]
    timestamp: DateTime<Utc>,
    archived: bool,
}

impl Transaction {
    /// Create an active transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `amount` is zero, negative or above
    /// [`MAX_AMOUNT`], if an expense has no category, or if income is given
    /// one.
    pub fn new(
        id: TransactionId,
        kind: TransactionKind,
        amount: Decimal,
        category: Option<Category>,
        timestamp: DateTime<Utc>,
    ) -> Result<Self> {
        validate(kind, amount, category)?;
        Ok(Self {
            id,
            kind,
            amount,
            category,
            timestamp,
            archived: false,
        })
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Always `Some` for expenses and `None` for income.
    pub fn category(&self) -> Option<Category> {
        self.category
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_archived(&self) -> bool {
        self.archived
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }

    /// The month this transaction falls in, seen from time zone `tz`.
    pub fn month_key<Tz: TimeZone>(&self, tz: &Tz) -> MonthKey {
        MonthKey::of(&self.timestamp.with_timezone(tz))
    }

    /// Returns true if the flag changed.
    pub(crate) fn mark_archived(&mut self) -> bool {
        let changed = !self.archived;
        self.archived = true;
        changed
    }
}

/// Largest amount a single transaction may carry.
///
/// Keeps month totals far inside `Decimal`'s range, so sums never overflow.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2764472320, 232830, 0, false, 0);

/// Check a `(kind, amount, category)` triple before a record is built.
pub fn validate(kind: TransactionKind, amount: Decimal, category: Option<Category>) -> Result<()> {
    if amount <= Decimal::ZERO {
        return Err(Error::Validation(format!(
            "amount must be greater than zero, got {}",
            amount
        )));
    }
    if amount > MAX_AMOUNT {
        return Err(Error::Validation(format!(
            "amount must not exceed {}, got {}",
            MAX_AMOUNT, amount
        )));
    }
    match (kind, category) {
        (TransactionKind::Expense, None) => Err(Error::Validation(
            "an expense must have a category".to_string(),
        )),
        (TransactionKind::Income, Some(c)) => Err(Error::Validation(format!(
            "income does not take a category (got '{}')",
            c
        ))),
        _ => Ok(()),
    }
}

#[derive(Deserialize)]
struct StoredTransaction {
    id: TransactionId,
    #[serde(rename = "type")]
    kind: TransactionKind,
    amount: Decimal,
    #[serde(default)]
    category: Option<Category>,
    date: DateTime<Utc>,
    #[serde(default)]
    archived: bool,
}

impl TryFrom<StoredTransaction> for Transaction {
    type Error = Error;

    fn try_from(s: StoredTransaction) -> Result<Self> {
        let mut tx = Transaction::new(s.id, s.kind, s.amount, s.category, s.date)?;
        tx.archived = s.archived;
        Ok(tx)
    }
}

/// Totals of a closed month, appended to the history by a reset.
///
/// There are no setters: a summary is never corrected in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    month: MonthKey,
    income: Decimal,
    expense: Decimal,
    balance: Decimal,
    #[serde(rename = "date")]
    closed_at: DateTime<Utc>,
}

impl MonthlySummary {
    pub(crate) fn new(
        month: MonthKey,
        income: Decimal,
        expense: Decimal,
        closed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            month,
            income,
            expense,
            balance: income.saturating_sub(expense),
            closed_at,
        }
    }

    pub fn month(&self) -> MonthKey {
        self.month
    }

    pub fn income(&self) -> Decimal {
        self.income
    }

    pub fn expense(&self) -> Decimal {
        self.expense
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn closed_at(&self) -> DateTime<Utc> {
        self.closed_at
    }
}
