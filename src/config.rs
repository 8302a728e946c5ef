//! Configuration loading and management.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    // Per-user data directory when available, project-local fallback otherwise
    dirs::data_dir()
        .map(|dir| dir.join("taskbook").join("tasks.db"))
        .unwrap_or_else(|| PathBuf::from(".taskbook/tasks.db"))
}

impl Config {
    /// Load configuration from file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from the default location, then apply environment
    /// overrides, falling back to defaults.
    pub fn load_or_default() -> Self {
        let mut config =
            Self::load(".taskbook/config.yaml").unwrap_or_default();

        if let Ok(db_path) = std::env::var("TASKBOOK_DB_PATH") {
            if !db_path.trim().is_empty() {
                config.db_path = PathBuf::from(db_path);
            }
        }

        config
    }

    /// Ensure the database directory exists.
    pub fn ensure_db_dir(&self) -> Result<()> {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_overrides_db_path() {
        let config: Config = serde_yaml::from_str("db_path: /tmp/custom.db").unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/custom.db"));
    }

    #[test]
    fn empty_yaml_uses_default() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.db_path, default_db_path());
    }
}
