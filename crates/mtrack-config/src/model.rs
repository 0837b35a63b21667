use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Users registered before any interaction.
pub const DEFAULT_USERS: [&str; 2] = ["Father", "Self"];

/// Categories offered when recording an expense.
pub const DEFAULT_CATEGORIES: [&str; 10] = [
    "Food",
    "Rent",
    "Utilities",
    "Transportation",
    "Entertainment",
    "Healthcare",
    "Shopping",
    "Education",
    "Travel",
    "General",
];

/// Stores user-configurable tracker preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional directory for user records. Defaults to the application data directory.
    pub data_dir: Option<PathBuf>,
    #[serde(default = "Config::default_users_value")]
    pub default_users: Vec<String>,
    #[serde(default = "Config::default_categories_value")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            default_users: Self::default_users_value(),
            categories: Self::default_categories_value(),
            log_filter: None,
        }
    }
}

impl Config {
    pub fn default_users_value() -> Vec<String> {
        DEFAULT_USERS.iter().map(|name| name.to_string()).collect()
    }

    pub fn default_categories_value() -> Vec<String> {
        DEFAULT_CATEGORIES.iter().map(|name| name.to_string()).collect()
    }

    /// Directory holding user records, falling back to `base`.
    pub fn resolve_data_dir(&self, base: &Path) -> PathBuf {
        match &self.data_dir {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => base.join(path),
            None => base.to_path_buf(),
        }
    }

    /// Rejects configurations the tracker cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.categories.iter().all(|name| name.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "at least one category is required".into(),
            ));
        }
        if let Some(blank) = self.default_users.iter().position(|name| name.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "default user #{} has an empty name",
                blank + 1
            )));
        }
        Ok(())
    }
}
