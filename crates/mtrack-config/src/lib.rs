//! mtrack-config
//!
//! Tracker settings: which users exist up front, the category list offered
//! when recording expenses, where records live and the log filter.
//! Stored as JSON under `<app home>/config/config.json`.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{Config, DEFAULT_CATEGORIES, DEFAULT_USERS};
