use crate::error::Error;
use directories::ProjectDirs;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://api.monobank.ua";

/// Sent when no credential is configured; the upstream rejects it.
pub const PLACEHOLDER_TOKEN: &str = "your_token_here";

pub const CONFIG_PATH_VAR: &str = "MONOBANK_MCP_CONFIG";
pub const TOKEN_VAR: &str = "MONOBANK_API_TOKEN";
pub const BASE_URL_VAR: &str = "MONOBANK_API_URL";
pub const LOG_LEVEL_VAR: &str = "MONOBANK_MCP_LOG_LEVEL";
pub const LOG_FORMAT_VAR: &str = "MONOBANK_MCP_LOG_FORMAT";

#[derive(Debug)]
pub struct Config {
    pub monobank: MonobankConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug)]
pub struct MonobankConfig {
    pub token: SecretString,
    pub base_url: String,
}

impl MonobankConfig {
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            base_url: base_url.into(),
        }
    }

    pub fn uses_placeholder_token(&self) -> bool {
        self.token.expose_secret() == PLACEHOLDER_TOKEN
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

// On-disk shape: every key optional, environment wins.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    monobank: FileMonobankConfig,
    logging: FileLoggingConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileMonobankConfig {
    token: Option<String>,
    base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileLoggingConfig {
    level: Option<String>,
    format: Option<String>,
}

impl Config {
    /// Load configuration from the optional TOML file and the process environment.
    pub fn load() -> Result<Self, Error> {
        let path = std::env::var_os(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .or_else(default_config_path);

        let contents = match path {
            Some(path) => read_optional(&path)?,
            None => None,
        };

        Self::from_sources(contents.as_deref(), |key| std::env::var(key).ok())
    }

    /// Merge defaults, file contents and environment lookups (highest precedence last).
    pub fn from_sources<F>(file: Option<&str>, env: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file: FileConfig = match file {
            Some(contents) => toml::from_str(contents)
                .map_err(|e| Error::Config(format!("invalid config file: {}", e)))?,
            None => FileConfig::default(),
        };

        let non_empty = |key: &str| env(key).filter(|value| !value.trim().is_empty());
        let defaults = LoggingConfig::default();

        let token = match non_empty(TOKEN_VAR) {
            Some(token) => SecretString::from(token),
            None => file
                .monobank
                .token
                .filter(|token| !token.trim().is_empty())
                .map(SecretString::from)
                .unwrap_or_else(|| SecretString::from(PLACEHOLDER_TOKEN.to_string())),
        };

        let base_url = non_empty(BASE_URL_VAR)
            .or(file.monobank.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self {
            monobank: MonobankConfig {
                token,
                base_url: base_url.trim_end_matches('/').to_string(),
            },
            logging: LoggingConfig {
                level: non_empty(LOG_LEVEL_VAR)
                    .or(file.logging.level)
                    .unwrap_or(defaults.level),
                format: non_empty(LOG_FORMAT_VAR)
                    .or(file.logging.format)
                    .unwrap_or(defaults.format),
            },
        })
    }
}

fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("ua", "monobank", "monobank-mcp")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn read_optional(path: &Path) -> Result<Option<String>, Error> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(Error::Config(format!(
            "failed to read {}: {}",
            path.display(),
            e
        ))),
    }
}
