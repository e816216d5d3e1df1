//! trialkeeper configuration (`config.toml`)

use crate::trial::DEFAULT_NAMESPACE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up inside the data directory
pub const CONFIG_FILE: &str = "config.toml";

/// trialkeeper configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrialkeeperConfig {
    /// Directory holding the persisted trial state
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Prefix for storage keys
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// JSONL analytics log (default: `<data_dir>/events.jsonl`)
    #[serde(default)]
    pub analytics_log: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset and no -v flag is given
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("trialkeeper"))
        .unwrap_or_else(|| PathBuf::from(".trialkeeper"))
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for TrialkeeperConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            namespace: default_namespace(),
            analytics_log: None,
            log_level: default_log_level(),
        }
    }
}

impl TrialkeeperConfig {
    /// Load config from an explicit file, or `<data_dir>/config.toml`
    ///
    /// A missing file yields the defaults; an explicit `--data-dir` wins over
    /// whatever the file says.
    pub fn load(config_path: Option<&Path>, data_dir: Option<&Path>) -> Result<Self> {
        let path = match (config_path, data_dir) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(dir)) => dir.join(CONFIG_FILE),
            (None, None) => default_data_dir().join(CONFIG_FILE),
        };

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            toml::from_str::<TrialkeeperConfig>(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            Self::default()
        };

        if let Some(dir) = data_dir {
            config.data_dir = dir.to_path_buf();
        }

        Ok(config)
    }

    /// Save config to `<data_dir>/config.toml`
    pub fn save(&self) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("Failed to create {}", self.data_dir.display()))?;

        let path = self.data_dir.join(CONFIG_FILE);
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Resolved analytics log path
    pub fn analytics_log_path(&self) -> PathBuf {
        self.analytics_log
            .clone()
            .unwrap_or_else(|| self.data_dir.join("events.jsonl"))
    }
}
