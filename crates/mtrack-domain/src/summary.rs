//! Aggregate value types derived from a sequence of transactions.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::transaction::Transaction;

/// Income, expense and balance totals over a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BalanceSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub current_balance: f64,
    pub count: usize,
}

impl BalanceSummary {
    /// Totals positive amounts as income and negative amounts as expenses.
    /// Zero amounts only increase `count`.
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let mut income = 0.0;
        let mut expenses = 0.0;
        let mut count = 0;
        for txn in transactions {
            if txn.is_income() {
                income += txn.amount();
            } else if txn.is_expense() {
                expenses += txn.amount();
            }
            count += 1;
        }
        let total_expenses = expenses.abs();
        Self {
            total_income: income,
            total_expenses,
            current_balance: income - total_expenses,
            count,
        }
    }
}

/// Per-category totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CategoryTotals {
    pub income: f64,
    pub expenses: f64,
    pub count: usize,
}

impl CategoryTotals {
    pub fn net(&self) -> f64 {
        self.income - self.expenses
    }

    fn record(&mut self, txn: &Transaction) {
        if txn.is_income() {
            self.income += txn.amount();
        } else if txn.is_expense() {
            self.expenses += txn.amount().abs();
        }
        self.count += 1;
    }
}

/// Category name to totals, ordered by name.
pub type CategorySummary = BTreeMap<String, CategoryTotals>;

/// Groups transactions by category. Only observed categories appear.
pub fn summarize_categories<'a, I>(transactions: I) -> CategorySummary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut summary = CategorySummary::new();
    for txn in transactions {
        summary
            .entry(txn.category().to_string())
            .or_default()
            .record(txn);
    }
    summary
}

/// Totals for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
    pub count: usize,
}

impl MonthlySummary {
    pub fn new(
        year: i32,
        month: u32,
        start: NaiveDate,
        end: NaiveDate,
        totals: BalanceSummary,
    ) -> Self {
        Self {
            year,
            month,
            start,
            end,
            income: totals.total_income,
            expenses: totals.total_expenses,
            net: totals.current_balance,
            count: totals.count,
        }
    }

    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}
