#![doc(test(attr(deny(warnings))))]

//! Money Tracker keeps per-user income and expense ledgers with write-through
//! JSON persistence, and ships the `money_tracker_cli` shell on top of them.

pub mod cli;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
///
/// The filter comes from `RUST_LOG`, then the `log_filter` of the stored
/// configuration, then the built-in default.
pub fn init() {
    INIT_TRACING.call_once(|| {
        let configured = utils::configured_log_filter();
        utils::init_tracing(configured.as_deref());
        tracing::info!("Money Tracker tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
