//! Configuration loading and management
//!
//! Handles parsing of the optional `config.toml` next to the state snapshot.
//! Every field is defaulted, so a missing or partial file is fine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Environment override for the remote endpoint
pub const REMOTE_URL_ENV: &str = "TDO_REMOTE_URL";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Remote-load configuration
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Remote-load related configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Endpoint returning the task-list as a JSON array
    #[serde(default)]
    pub url: Option<String>,
}

/// Storage-related configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Override for the data directory
    #[serde(default)]
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from `path`, tolerating a missing file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// The remote endpoint: flag beats env beats config file.
    pub fn remote_url(&self, flag: Option<&str>) -> Option<String> {
        if let Some(url) = flag {
            return Some(url.to_string());
        }
        if let Ok(url) = std::env::var(REMOTE_URL_ENV) {
            let trimmed = url.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        self.remote.url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from_file(&temp.path().join("config.toml")).unwrap();
        assert!(config.remote.url.is_none());
        assert!(config.storage.dir.is_none());
    }

    #[test]
    fn partial_file_fills_remaining_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[remote]\nurl = \"http://localhost:4000/api/todos\"\n").unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(
            config.remote.url.as_deref(),
            Some("http://localhost:4000/api/todos")
        );
        assert!(config.storage.dir.is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "remote = [not toml").unwrap();
        assert!(Config::load_from_file(&path).is_err());
    }

    #[test]
    fn flag_overrides_config_url() {
        let config = Config {
            remote: RemoteConfig {
                url: Some("http://from-config/api/todos".to_string()),
            },
            ..Config::default()
        };
        assert_eq!(
            config.remote_url(Some("http://from-flag/api/todos")).as_deref(),
            Some("http://from-flag/api/todos")
        );
        assert_eq!(
            config.remote_url(None).as_deref(),
            Some("http://from-config/api/todos")
        );
    }
}
