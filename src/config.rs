use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::desk::alarm::{MatchMode, DEFAULT_SNOOZE_MINUTES};
use crate::theme::ThemeConfig;

const APP_DIR: &str = "deskmates";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub theme: ThemeConfig,
    pub alarm: AlarmConfig,
    pub quotes: QuoteConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AlarmConfig {
    pub snooze_minutes: u32,
    pub match_mode: MatchMode,
    /// Directory the tone chooser lists.
    pub tone_dir: Option<PathBuf>,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            snooze_minutes: DEFAULT_SNOOZE_MINUTES,
            match_mode: MatchMode::default(),
            tone_dir: None,
        }
    }
}

impl AlarmConfig {
    pub fn tone_dir(&self) -> PathBuf {
        self.tone_dir
            .clone()
            .or_else(dirs::audio_dir)
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    pub store_path: Option<PathBuf>,
    /// Quotes added to the built-in list.
    pub extra: Vec<String>,
}

impl QuoteConfig {
    pub fn store_path(&self) -> PathBuf {
        self.store_path
            .clone()
            .unwrap_or_else(|| data_dir().join("favorites.json"))
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
        }
    }
}

impl LogConfig {
    pub fn dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(data_dir)
    }
}

impl Config {
    /// Loads the user config; a missing file yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Loads the config, or the defaults plus the reason they were used.
/// The caller logs the error once the subscriber is installed.
pub fn load_or_default() -> (Config, Option<ConfigError>) {
    or_default(Config::load())
}

fn or_default(result: Result<Config, ConfigError>) -> (Config, Option<ConfigError>) {
    match result {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    }
}

pub fn warn_defaulted(error: &ConfigError) {
    tracing::warn!(error = %error, "config not loaded, using defaults");
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.toml"))
}

pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}
