use dirs::home_dir;
use std::{
    env,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".invoice_core";
const STORAGE_DIR: &str = "local_storage";
const OUTBOX_DIR: &str = "outbox";
const EXPORT_DIR: &str = "exports";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";

/// Returns the application-specific data directory, defaulting to `~/.invoice_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("INVOICE_CORE_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Resolves every managed location relative to a base directory.
pub struct PathResolver;

impl PathResolver {
    pub fn base_dir() -> PathBuf {
        app_data_dir()
    }

    /// Directory backing the durable key/value draft storage.
    pub fn storage_dir_in(base: &Path) -> PathBuf {
        base.join(STORAGE_DIR)
    }

    /// Directory receiving submitted invoices.
    pub fn outbox_dir_in(base: &Path) -> PathBuf {
        base.join(OUTBOX_DIR)
    }

    /// Default destination for exported documents.
    pub fn export_dir_in(base: &Path) -> PathBuf {
        base.join(EXPORT_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join(CONFIG_DIR).join(CONFIG_FILE)
    }
}
