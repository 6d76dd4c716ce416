//! Application configuration loaded from TOML, with environment overrides.
//!
//! Every field has a default so an absent file is not an error.
//!
//! | Variable                  | Field      |
//! |---------------------------|------------|
//! | `DREAM_JOURNAL_API_URL`   | `api_url`  |
//! | `DREAM_JOURNAL_API_KEY`   | `api_key`  |
//! | `DREAM_JOURNAL_USER`      | `user_id`  |
//! | `DREAM_JOURNAL_DATA_DIR`  | `data_dir` |

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_API_URL: &str = "DREAM_JOURNAL_API_URL";
pub const ENV_API_KEY: &str = "DREAM_JOURNAL_API_KEY";
pub const ENV_USER: &str = "DREAM_JOURNAL_USER";
pub const ENV_DATA_DIR: &str = "DREAM_JOURNAL_DATA_DIR";

const DB_FILE: &str = "dream_journal.db";
const KV_FILE: &str = "local_store.json";
const LOG_DIR: &str = "logs";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Could not determine a data directory")]
    NoDataDir,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the backend hosting the interpretation function
    pub api_url: String,
    /// Bearer key sent with interpretation requests
    pub api_key: String,
    /// Identity the session is acquired for
    pub user_id: String,
    /// Root for the database, local store and logs
    pub data_dir: Option<PathBuf>,
    /// TTF used for PDF export; Arabic needs one
    pub pdf_font: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            api_key: String::new(),
            user_id: "local".to_string(),
            data_dir: None,
            pdf_font: None,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Load `path` (or the per-user default location) and apply the
    /// environment. An explicit path must exist; the default one may not.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::load_from_file(p)?,
            None => match default_config_path() {
                Some(p) if p.exists() => Self::load_from_file(p)?,
                _ => Self::default(),
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply overrides from `lookup`; blank values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_API_URL) {
            self.api_url = v;
        }
        if let Some(v) = get(ENV_API_KEY) {
            self.api_key = v;
        }
        if let Some(v) = get(ENV_USER) {
            self.user_id = v;
        }
        if let Some(v) = get(ENV_DATA_DIR) {
            self.data_dir = Some(PathBuf::from(v));
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => project_dirs()
                .map(|p| p.data_dir().to_path_buf())
                .ok_or(ConfigError::NoDataDir),
        }
    }

    pub fn db_path(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.data_dir()?.join(DB_FILE))
    }

    pub fn kv_path(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.data_dir()?.join(KV_FILE))
    }

    pub fn log_dir(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.data_dir()?.join(LOG_DIR))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "dreamjournal", "dream-journal")
}

pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|p| p.config_dir().join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.user_id, "local");
    }

    #[test]
    fn test_partial_toml() {
        let config = AppConfig::from_toml_str(
            r#"
            api_url = "https://example.supabase.co"
            data_dir = "/tmp/dreams"
            "#,
        )
        .unwrap();
        assert_eq!(config.api_url, "https://example.supabase.co");
        assert_eq!(config.api_key, "");
        assert_eq!(config.db_path().unwrap(), PathBuf::from("/tmp/dreams/dream_journal.db"));
        assert_eq!(config.log_dir().unwrap(), PathBuf::from("/tmp/dreams/logs"));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            AppConfig::from_toml_str("api_url = ["),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (ENV_API_KEY, "secret"),
            (ENV_USER, "u-42"),
            (ENV_DATA_DIR, "  "),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig {
            data_dir: Some(PathBuf::from("/keep")),
            ..Default::default()
        };
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.api_key, "secret");
        assert_eq!(config.user_id, "u-42");
        assert_eq!(config.data_dir, Some(PathBuf::from("/keep")));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "user_id = \"file-user\"\n").unwrap();

        let config = AppConfig::load_from_file(&path).unwrap();
        assert_eq!(config.user_id, "file-user");

        assert!(matches!(
            AppConfig::load_from_file(dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
