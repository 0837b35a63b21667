use mtrack_domain::Transaction;

use crate::CoreError;

/// Abstraction over persistence backends holding one transaction record per user.
///
/// `save` is a full-state overwrite: two interleaved writers for the same user
/// lose one side's update. Callers serialize access per user.
pub trait LedgerStorage: Send + Sync {
    /// Replaces the stored record for `user` with `transactions`.
    fn save(&self, user: &str, transactions: &[Transaction]) -> Result<(), CoreError>;

    /// Loads the stored transactions for `user`.
    ///
    /// A user without a record yields an empty list. An unreadable or
    /// malformed record is an error.
    fn load(&self, user: &str) -> Result<Vec<Transaction>, CoreError>;
}

/// Derives the storage key for a user: lower-cased, spaces replaced by underscores.
pub fn storage_key(user: &str) -> String {
    user.to_lowercase().replace(' ', "_")
}

/// Checks that `user` maps to a usable record name: non-empty, not `.` or
/// `..`, and free of path separators and NUL.
pub fn validate_storage_key(user: &str) -> Result<(), CoreError> {
    let key = storage_key(user);
    let unusable = key.is_empty()
        || key == "."
        || key == ".."
        || key.contains(['/', '\\'])
        || key.contains('\0');
    if unusable {
        return Err(CoreError::validation(format!(
            "user name `{user}` cannot be used as a record name"
        )));
    }
    Ok(())
}

/// Detects records that violate ledger invariants within a loaded sequence.
pub fn transaction_warnings(transactions: &[Transaction]) -> Vec<String> {
    let mut warnings = Vec::new();
    for (index, txn) in transactions.iter().enumerate() {
        if !txn.is_consistent() {
            warnings.push(format!(
                "transaction #{} ({}) has amount {:.2} that disagrees with type {}",
                index + 1,
                txn.date(),
                txn.amount(),
                txn.transaction_type()
            ));
        }
        if txn.description().trim().is_empty() {
            warnings.push(format!(
                "transaction #{} ({}) has an empty description",
                index + 1,
                txn.date()
            ));
        }
        if !txn.amount().is_finite() {
            warnings.push(format!(
                "transaction #{} ({}) has a non-finite amount",
                index + 1,
                txn.date()
            ));
        }
    }
    warnings
}
