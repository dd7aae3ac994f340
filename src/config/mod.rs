use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    auth::{User, UserRole},
    core::utils::PathResolver,
    errors::Result,
    export::ExportOptions,
    invoice::financial::DEFAULT_TAX_PERCENTAGE,
    utils::persistence::{ensure_dir, load_json, save_json_atomic},
};

/// Signed-in identity remembered between CLI runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub email: String,
    pub role: UserRole,
}

impl StoredSession {
    pub fn to_user(&self) -> User {
        User::new(self.email.clone(), self.role)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub currency_symbol: String,
    pub default_tax_percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
    pub export_settle_delay_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<StoredSession>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".into(),
            default_tax_percentage: DEFAULT_TAX_PERCENTAGE,
            export_dir: None,
            export_settle_delay_ms: 150,
            session: None,
        }
    }
}

impl Config {
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            settle_delay: Duration::from_millis(self.export_settle_delay_ms),
            ..ExportOptions::default()
        }
    }

    /// Configured export directory, else `<base>/exports`.
    pub fn export_dir_in(&self, base: &Path) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathResolver::export_dir_in(base))
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        let path = PathResolver::config_file_in(&base);
        Ok(Self { base, path })
    }

    /// A missing file yields the defaults.
    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            load_json(&self.path)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        save_json_atomic(config, &self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.currency_symbol, "₹");
        assert_eq!(config.default_tax_percentage, 18.0);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        let config = Config {
            currency_symbol: "$".into(),
            export_settle_delay_ms: 0,
            session: Some(StoredSession {
                email: "staff@example.com".into(),
                role: UserRole::Staff,
            }),
            ..Config::default()
        };
        manager.save(&config).unwrap();
        assert!(manager.path().ends_with("config/config.json"));
        assert_eq!(manager.load().unwrap(), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        std::fs::create_dir_all(manager.path().parent().unwrap()).unwrap();
        std::fs::write(manager.path(), r#"{"currency_symbol":"€"}"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config.currency_symbol, "€");
        assert_eq!(config.export_settle_delay_ms, 150);
        assert_eq!(config.export_options().settle_delay, Duration::from_millis(150));
    }

    #[test]
    fn export_dir_defaults_under_base() {
        let config = Config::default();
        assert_eq!(
            config.export_dir_in(Path::new("/tmp/home")),
            PathBuf::from("/tmp/home/exports")
        );
    }
}
