use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Build configuration, loaded from `~/.config/rezeptbuch/config.toml`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the recipe source files (.md and .json).
    pub corpus_dir: PathBuf,
    /// Where the merged collection JSON is written.
    pub output_path: PathBuf,
    /// The users array the registry is built from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users_path: Option<PathBuf>,
    /// Where the built name → user registry is written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_path: Option<PathBuf>,
    /// Author credited for comment lines without a "Name:" prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_comment_author: Option<String>,
    /// Source file name → creator credited for that file's recipes.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub creator_overrides: HashMap<String, String>,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the loaded paths
        config.corpus_dir = Self::expand_path(&config.corpus_dir).unwrap_or(config.corpus_dir);
        config.output_path = Self::expand_path(&config.output_path).unwrap_or(config.output_path);
        config.users_path = config
            .users_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));
        config.registry_path = config
            .registry_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/rezeptbuch");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
