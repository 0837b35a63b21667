//! Shared runtime state for CLI interactions and command execution.

use std::{path::Path, sync::Arc};

use dialoguer::theme::ColorfulTheme;
use mtrack_config::{Config, ConfigManager};
use mtrack_core::{Clock, LedgerStorage, SystemClock, UserRegistry};
use mtrack_storage_json::JsonLedgerStorage;

use crate::errors::CliError;
use crate::utils::app_data_dir;

use super::{commands, output, registry::CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub users: UserRegistry,
    pub storage: JsonLedgerStorage,
    pub config: Config,
    pub theme: ColorfulTheme,
    pub clock: Arc<dyn Clock>,
    pub running: bool,
}

impl ShellContext {
    /// Loads the configuration from the application data directory and seeds
    /// the registry with the configured default users.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let base = app_data_dir();
        let config = ConfigManager::with_base_dir(&base)?.load()?;
        Self::with_config(mode, &base, config, Arc::new(SystemClock))
    }

    pub fn with_config(
        mode: CliMode,
        base: &Path,
        config: Config,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CliError> {
        let storage =
            JsonLedgerStorage::with_clock(config.resolve_data_dir(base), Arc::clone(&clock))?;
        let backend: Arc<dyn LedgerStorage> = Arc::new(storage.clone());
        let users = UserRegistry::with_users(backend, &config.default_users);

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let context = ShellContext {
            mode,
            registry,
            users,
            storage,
            config,
            theme: ColorfulTheme::default(),
            clock,
            running: true,
        };
        context.report_load_warnings();
        Ok(context)
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub fn prompt(&self) -> String {
        match self.users.active() {
            Some(ledger) => format!("money[{}]> ", ledger.user()),
            None => "money> ".to_string(),
        }
    }

    /// Canonical spelling of a configured category, matched case-insensitively.
    pub fn canonical_category(&self, input: &str) -> Option<&str> {
        let needle = input.trim();
        self.config
            .categories
            .iter()
            .find(|category| category.eq_ignore_ascii_case(needle))
            .map(String::as_str)
    }

    fn report_load_warnings(&self) {
        for ledger in self.users.ledgers() {
            for warning in ledger.warnings() {
                output::warning(format!("{}: {}", ledger.user(), warning));
            }
        }
    }
}
