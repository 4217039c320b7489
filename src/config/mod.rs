//! Configuration loading and validation.
//!
//! Settings come from an optional TOML file, overridden by environment
//! variables such as `ESPORTS_STATS__SERVER__PORT=8080`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::feed::FeedClientConfig;
use crate::models::{FallbackPolicy, Lang, TrackedTeam};
use crate::parse_duration;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "ESPORTS_STATS";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to render config: {0}")]
    RenderError(#[from] toml::ser::Error),

    #[error("Failed to load config: {0}")]
    LoadError(#[from] ::config::ConfigError),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Tracked team configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamConfig {
    #[serde(default = "default_team_slug")]
    pub slug: String,

    #[serde(default = "default_team_code")]
    pub code: String,

    #[serde(default = "default_team_name")]
    pub name: String,

    /// Policy when the team cannot be identified in a match
    #[serde(default)]
    pub fallback: FallbackPolicy,
}

fn default_team_slug() -> String {
    "flyquest".to_string()
}

fn default_team_code() -> String {
    "FLY".to_string()
}

fn default_team_name() -> String {
    "FlyQuest".to_string()
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self {
            slug: default_team_slug(),
            code: default_team_code(),
            name: default_team_name(),
            fallback: FallbackPolicy::default(),
        }
    }
}

impl TeamConfig {
    pub fn tracked_team(&self) -> TrackedTeam {
        TrackedTeam::new(
            Some(self.slug.clone()),
            Some(self.code.clone()),
            Some(self.name.clone()),
            self.fallback,
        )
    }
}

/// Match feed configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Feed URL; without one the API only accepts posted matches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Cache freshness, e.g. "5m", "1h", "90s"
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl: String,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_max_content_size")]
    pub max_content_size: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

fn default_cache_ttl() -> String {
    "5m".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_content_size() -> usize {
    5 * 1024 * 1024
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: None,
            cache_ttl: default_cache_ttl(),
            timeout_seconds: default_timeout(),
            max_content_size: default_max_content_size(),
            api_key: None,
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Default language for achievement text
    #[serde(default)]
    pub lang: Lang,

    #[serde(default)]
    pub team: TeamConfig,

    #[serde(default)]
    pub feed: FeedConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            lang: Lang::default(),
            team: TeamConfig::default(),
            feed: FeedConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an optional TOML file with environment
    /// overrides layered on top.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: AppConfig = ::config::Config::builder()
            .add_source(::config::File::from(path).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed.timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "Feed timeout must be greater than 0".to_string(),
            ));
        }

        if parse_duration(&self.feed.cache_ttl).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "Invalid feed cache_ttl: {}",
                self.feed.cache_ttl
            )));
        }

        if let Some(url) = &self.feed.url {
            Url::parse(url).map_err(|e| {
                ConfigError::ValidationError(format!("Invalid feed url {}: {}", url, e))
            })?;
        }

        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        if !self.team.tracked_team().is_identifiable() {
            return Err(ConfigError::ValidationError(
                "Team needs at least one of slug, code or name".to_string(),
            ));
        }

        Ok(())
    }

    pub fn tracked_team(&self) -> TrackedTeam {
        self.team.tracked_team()
    }

    /// Feed client settings, if a feed URL is configured.
    pub fn feed_client_config(&self) -> Result<Option<FeedClientConfig>, ConfigError> {
        let Some(url) = &self.feed.url else {
            return Ok(None);
        };
        let url = Url::parse(url)
            .map_err(|e| ConfigError::ValidationError(format!("Invalid feed url: {}", e)))?;

        Ok(Some(FeedClientConfig {
            cache_dir: self.data_dir.join("raw"),
            cache_ttl: parse_duration(&self.feed.cache_ttl).unwrap_or(Duration::from_secs(300)),
            max_content_size: self.feed.max_content_size,
            timeout: Duration::from_secs(self.feed.timeout_seconds),
            api_key: self.feed.api_key.clone(),
            ..FeedClientConfig::new(url)
        }))
    }
}
