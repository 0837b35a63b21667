//! mtrack-domain
//!
//! Pure domain models for the money tracker (Transaction, TransactionType and
//! the aggregate summaries derived from them).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod summary;
pub mod transaction;

pub use summary::*;
pub use transaction::*;
