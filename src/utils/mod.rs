pub mod build_info;

use std::{env, path::PathBuf};

use dirs::home_dir;
use mtrack_config::ConfigManager;
use tracing_subscriber::{fmt, EnvFilter};

const HOME_ENV: &str = "MONEY_TRACKER_HOME";
const DEFAULT_DIR_NAME: &str = ".money_tracker";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";

/// Directive used when neither `RUST_LOG` nor the configuration sets one.
pub const DEFAULT_LOG_FILTER: &str =
    "money_tracker=info,mtrack_core=info,mtrack_storage_json=info";

/// Installs the global tracing subscriber. Logs go to stderr so they never mix
/// with command output on stdout. A subscriber that is already installed is kept.
pub fn init_tracing(directive: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive.unwrap_or(DEFAULT_LOG_FILTER)));

    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Returns the application-specific data directory, defaulting to `~/.money_tracker`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Location of the configuration file inside the data directory.
pub fn config_file() -> PathBuf {
    app_data_dir().join(CONFIG_DIR).join(CONFIG_FILE)
}

/// `log_filter` from the stored configuration, if any. Unreadable
/// configuration is ignored here and reported once the shell starts.
pub(crate) fn configured_log_filter() -> Option<String> {
    ConfigManager::new(config_file())
        .load()
        .ok()
        .and_then(|config| config.log_filter)
        .filter(|filter| !filter.trim().is_empty())
}
