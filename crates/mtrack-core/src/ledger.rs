//! Per-user ledger: write-through transaction list plus derived aggregates.

use std::{fmt, sync::Arc};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use mtrack_domain::{
    summarize_categories, BalanceSummary, CategorySummary, MonthlySummary, Transaction,
    TransactionType, DEFAULT_CATEGORY,
};

use crate::{
    storage::{transaction_warnings, LedgerStorage},
    CoreError,
};

/// Optional filters applied by [`Ledger::query`]. Date bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub transaction_type: Option<TransactionType>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn to_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    pub fn of_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        if self.start_date.is_some_and(|start| txn.date() < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| txn.date() > end) {
            return false;
        }
        if let Some(kind) = self.transaction_type {
            if txn.transaction_type() != kind {
                return false;
            }
        }
        true
    }
}

/// The transactions recorded for one user.
///
/// Every successful [`Ledger::add`] rewrites the full record through the
/// attached [`LedgerStorage`] before returning.
pub struct Ledger {
    user: String,
    transactions: Vec<Transaction>,
    warnings: Vec<String>,
    storage: Arc<dyn LedgerStorage>,
}

impl Ledger {
    /// Creates the ledger for `user` and loads any existing record.
    ///
    /// Load failures never reach the caller: the ledger starts empty and the
    /// failure is kept in [`Ledger::warnings`]. The stored record is not touched.
    pub fn open(user: impl Into<String>, storage: Arc<dyn LedgerStorage>) -> Self {
        let user = user.into();
        let mut warnings = Vec::new();
        let transactions = match storage.load(&user) {
            Ok(transactions) => {
                for message in transaction_warnings(&transactions) {
                    warn!(user = %user, "{message}");
                    warnings.push(message);
                }
                debug!(user = %user, count = transactions.len(), "loaded ledger");
                transactions
            }
            Err(err) => {
                warn!(user = %user, error = %err, "failed to load ledger, starting empty");
                warnings.push(format!("could not load saved transactions: {err}"));
                Vec::new()
            }
        };
        Self {
            user,
            transactions,
            warnings,
            storage,
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Transactions in insertion order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Problems found while loading the stored record.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Records a transaction and writes the full ledger through to storage.
    ///
    /// The amount sign is coerced to match `transaction_type`. `category`
    /// defaults to `General`. Validation failures leave the ledger untouched.
    /// A persistence failure is returned after the in-memory append, which is
    /// kept: a returned error does not mean the entry was discarded.
    pub fn add(
        &mut self,
        date: NaiveDate,
        description: &str,
        amount: f64,
        transaction_type: TransactionType,
        category: Option<&str>,
    ) -> Result<(), CoreError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(CoreError::validation("description cannot be empty"));
        }
        if !amount.is_finite() {
            return Err(CoreError::validation(format!(
                "amount `{amount}` is not a finite number"
            )));
        }
        let category = match category.map(str::trim) {
            None => DEFAULT_CATEGORY,
            Some("") => return Err(CoreError::validation("category cannot be empty")),
            Some(category) => category,
        };

        let transaction =
            Transaction::normalized(date, description, amount, transaction_type, category);
        info!(user = %self.user, transaction = %transaction, "adding transaction");
        self.transactions.push(transaction);
        self.persist()
    }

    /// Same as [`Ledger::add`] but takes the date as `YYYY-MM-DD` text.
    pub fn add_parsed(
        &mut self,
        date: &str,
        description: &str,
        amount: f64,
        transaction_type: TransactionType,
        category: Option<&str>,
    ) -> Result<(), CoreError> {
        let date = parse_date(date)?;
        self.add(date, description, amount, transaction_type, category)
    }

    /// Returns matching transactions, newest first. Same-date entries keep
    /// their insertion order.
    pub fn query(&self, filter: &TransactionFilter) -> Vec<&Transaction> {
        let mut matches: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|txn| filter.matches(txn))
            .collect();
        matches.sort_by(|a, b| b.date().cmp(&a.date()));
        debug!(user = %self.user, ?filter, count = matches.len(), "queried ledger");
        matches
    }

    pub fn balance_summary(&self) -> BalanceSummary {
        BalanceSummary::from_transactions(&self.transactions)
    }

    pub fn category_summary(&self) -> CategorySummary {
        summarize_categories(&self.transactions)
    }

    /// Totals for the calendar month `month` (1-12) of `year`, both ends inclusive.
    pub fn monthly_summary(&self, year: i32, month: u32) -> Result<MonthlySummary, CoreError> {
        let (start, end) = month_bounds(year, month)?;
        let filter = TransactionFilter::new().from_date(start).to_date(end);
        let totals = BalanceSummary::from_transactions(self.query(&filter));
        Ok(MonthlySummary::new(year, month, start, end, totals))
    }

    fn persist(&self) -> Result<(), CoreError> {
        match self.storage.save(&self.user, &self.transactions) {
            Ok(()) => {
                debug!(user = %self.user, count = self.transactions.len(), "ledger saved");
                Ok(())
            }
            Err(err) => {
                warn!(user = %self.user, error = %err, "ledger change kept in memory but not saved");
                Err(err)
            }
        }
    }
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("user", &self.user)
            .field("transactions", &self.transactions)
            .field("warnings", &self.warnings)
            .finish_non_exhaustive()
    }
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        CoreError::validation(format!("invalid date `{}` (use YYYY-MM-DD)", input.trim()))
    })
}

/// First and last day of a calendar month.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), CoreError> {
    let invalid = || CoreError::validation(format!("invalid month {year:04}-{month:02}"));
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .ok_or_else(invalid)?;
    Ok((start, end))
}
