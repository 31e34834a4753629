//! Summary aggregation
//!
//! Four independent reducers over the ledger's transactions: daily, weekly,
//! monthly, and per-category. Each folds signed amounts into buckets keyed
//! by date, ISO week, month, or category. Buckets exist only once a
//! transaction falls into them; map iteration order is unspecified and
//! callers wanting sorted output sort by key.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::{Category, Transaction};

/// Income/spend/net totals for a time bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeriodTotals {
    pub income: f64,
    pub spend: f64,
    pub net: f64,
}

impl PeriodTotals {
    fn add(&mut self, amount: f64) {
        if amount > 0.0 {
            self.income += amount;
        } else {
            self.spend += amount.abs();
        }
        self.net = self.income - self.spend;
    }
}

/// Income/spend/count totals for a category bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryTotals {
    pub income: f64,
    pub spend: f64,
    pub count: u64,
}

impl CategoryTotals {
    fn add(&mut self, amount: f64) {
        if amount > 0.0 {
            self.income += amount;
        } else {
            self.spend += amount.abs();
        }
        self.count += 1;
    }
}

/// First calendar day of `date`'s month.
fn start_of_month(date: NaiveDate) -> NaiveDate {
    // The first of a valid year/month always exists
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// Per-date totals, restricted to the current month.
///
/// `today` is the caller's reference-timezone date; transactions dated
/// before the first of that month are excluded entirely.
pub fn daily_summary(
    transactions: &[Transaction],
    today: NaiveDate,
) -> HashMap<String, PeriodTotals> {
    let month_start = start_of_month(today);

    let mut summary: HashMap<String, PeriodTotals> = HashMap::new();
    for tx in transactions {
        if tx.date < month_start {
            continue;
        }
        summary
            .entry(tx.date.format("%Y-%m-%d").to_string())
            .or_default()
            .add(tx.amount);
    }
    summary
}

/// Per-ISO-week totals over the entire ledger.
///
/// Keys are `<ISO-year>-W<2-digit-week>` with Monday-start weeks, so early
/// January dates can land in the previous ISO year's final week.
pub fn weekly_summary(transactions: &[Transaction]) -> HashMap<String, PeriodTotals> {
    let mut summary: HashMap<String, PeriodTotals> = HashMap::new();
    for tx in transactions {
        let week = tx.date.iso_week();
        let key = format!("{}-W{:02}", week.year(), week.week());
        summary.entry(key).or_default().add(tx.amount);
    }
    summary
}

/// Per-calendar-month totals over the entire ledger.
pub fn monthly_summary(transactions: &[Transaction]) -> HashMap<String, PeriodTotals> {
    let mut summary: HashMap<String, PeriodTotals> = HashMap::new();
    for tx in transactions {
        let key = format!("{:04}-{:02}", tx.date.year(), tx.date.month());
        summary.entry(key).or_default().add(tx.amount);
    }
    summary
}

/// Per-category totals and transaction counts over the entire ledger.
pub fn category_summary(transactions: &[Transaction]) -> HashMap<Category, CategoryTotals> {
    let mut summary: HashMap<Category, CategoryTotals> = HashMap::new();
    for tx in transactions {
        summary.entry(tx.category).or_default().add(tx.amount);
    }
    summary
}
