//! mtrack-core
//!
//! Ledger engine for the money tracker: per-user ledgers, the user registry
//! and the persistence contract they write through.
//! Depends on mtrack-domain. No CLI, no terminal I/O, no direct filesystem access.

pub mod error;
pub mod ledger;
pub mod registry;
pub mod storage;
pub mod time;

#[cfg(test)]
mod tests;

pub use error::CoreError;
pub use ledger::*;
pub use registry::*;
pub use storage::{storage_key, transaction_warnings, validate_storage_key, LedgerStorage};
pub use time::{Clock, SystemClock};
