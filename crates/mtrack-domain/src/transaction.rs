//! Domain model for a single income or expense entry.

use std::{error::Error, fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{de::Deserializer, Deserialize, Serialize};

/// Category assigned when the caller does not supply one.
pub const DEFAULT_CATEGORY: &str = "General";

/// A recorded financial event.
///
/// The sign of `amount` is the source of truth for every aggregate: positive
/// values are income, negative values are expenses. [`Transaction::new`] keeps
/// whatever it is given; use [`Transaction::normalized`] to build an entry
/// whose sign agrees with its type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    date: NaiveDate,
    description: String,
    amount: f64,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    #[serde(default = "default_category")]
    category: String,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: f64,
        transaction_type: TransactionType,
        category: impl Into<String>,
    ) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            transaction_type,
            category: category.into(),
        }
    }

    /// Builds a transaction after coercing the amount sign to match `transaction_type`.
    pub fn normalized(
        date: NaiveDate,
        description: impl Into<String>,
        amount: f64,
        transaction_type: TransactionType,
        category: impl Into<String>,
    ) -> Self {
        let amount = transaction_type.normalize_amount(amount);
        Self::new(date, description, amount, transaction_type, category)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// True when the stored amount sign agrees with the declared type.
    /// Zero agrees with both.
    pub fn is_consistent(&self) -> bool {
        match self.transaction_type {
            TransactionType::Income => self.amount >= 0.0,
            TransactionType::Expense => self.amount <= 0.0,
        }
    }

    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | ${:.2} | {} | {}",
            self.date.format("%Y-%m-%d"),
            self.description,
            self.amount,
            self.transaction_type,
            self.category
        )
    }
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Declared direction of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    /// Coerces the sign of `amount` to match this type.
    ///
    /// Positive expenses are negated and negative income is made absolute.
    /// Amounts already carrying the right sign, and zero, pass through.
    pub fn normalize_amount(self, amount: f64) -> f64 {
        match self {
            TransactionType::Expense if amount > 0.0 => -amount,
            TransactionType::Income if amount < 0.0 => amount.abs(),
            _ => amount,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ParseTransactionTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(ParseTransactionTypeError(value.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for TransactionType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Raised when text does not name a known [`TransactionType`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTransactionTypeError(String);

impl fmt::Display for ParseTransactionTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown transaction type `{}` (expected Income or Expense)",
            self.0
        )
    }
}

impl Error for ParseTransactionTypeError {}
