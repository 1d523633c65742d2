use serde::{Deserialize, Serialize};

use crate::configs::*;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub flows: FlowsConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{0} is empty")]
    Empty(String),
}

impl Config {
    /// Loads `config.toml`, then `config.default.toml`. Built-in defaults
    /// apply when neither file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = if std::path::Path::new("config.toml").exists() {
            "config.toml"
        } else if std::path::Path::new("config.default.toml").exists() {
            "config.default.toml"
        } else {
            tracing::debug!("No config file found, using defaults");
            return Ok(Self::default());
        };

        tracing::info!("Loading configuration from: {}", config_path);
        Self::from_path(config_path)
    }

    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)?;
        if config_str.trim().is_empty() {
            return Err(ConfigError::Empty(path.display().to_string()));
        }
        Self::parse(&config_str)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}
