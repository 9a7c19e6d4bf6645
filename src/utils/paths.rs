use dirs::home_dir;
use std::{env, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".expense_core";
const HOME_ENV: &str = "EXPENSE_CORE_HOME";
const CONFIG_FILE: &str = "config.json";

/// Returns the application data directory, defaulting to `~/.expense_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Path to the configuration file inside `base`.
pub fn config_file_in(base: &std::path::Path) -> PathBuf {
    base.join(CONFIG_FILE)
}
