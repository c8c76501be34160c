//! Configuration management for Promptcast
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//! The resulting [`Config`] is built once at startup and handed to the
//! command handlers by reference.

use crate::endpoint::Endpoint;
use crate::error::{PromptcastError, Result};
use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration structure for Promptcast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Assistant server to talk to
    #[serde(default)]
    pub server: ServerConfig,
    /// Provider and model used for prompts
    #[serde(default)]
    pub model: ModelConfig,
    /// Local session cache settings
    #[serde(default)]
    pub cache: CacheConfig,
    /// How `send` picks a session
    #[serde(default)]
    pub session: SessionConfig,
}

/// Assistant server location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    4096
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Provider/model pair sent with every prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Provider identifier understood by the server
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Model identifier understood by the server
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_provider() -> String {
    "anthropic".to_string()
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
        }
    }
}

/// Storage medium for the session cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    /// One small file per endpoint
    #[default]
    Files,
    /// A single SQLite database in the cache directory
    Sqlite,
}

impl FromStr for CacheBackend {
    type Err = PromptcastError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "files" | "file" => Ok(CacheBackend::Files),
            "sqlite" => Ok(CacheBackend::Sqlite),
            other => Err(PromptcastError::Config(format!(
                "Invalid cache backend: {}. Must be one of: files, sqlite",
                other
            ))),
        }
    }
}

/// Local session cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Directory holding the cache records
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,

    /// Storage medium
    #[serde(default)]
    pub backend: CacheBackend,
}

/// Default cache directory under the platform data dir
///
/// Falls back to `./.promptcast/sessions` when no home directory can be
/// determined.
pub fn default_cache_dir() -> PathBuf {
    ProjectDirs::from("dev", "promptcast", "promptcast")
        .map(|dirs| dirs.data_dir().join("sessions"))
        .unwrap_or_else(|| PathBuf::from(".promptcast").join("sessions"))
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
            backend: CacheBackend::default(),
        }
    }
}

/// Which store is authoritative for picking a session on `send`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStrategy {
    /// Reuse the session recorded for the endpoint in the local cache
    #[default]
    Cached,
    /// Ask the server for its most recently updated session
    Server,
}

impl FromStr for SessionStrategy {
    type Err = PromptcastError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cached" | "cache" => Ok(SessionStrategy::Cached),
            "server" => Ok(SessionStrategy::Server),
            other => Err(PromptcastError::Config(format!(
                "Invalid session strategy: {}. Must be one of: cached, server",
                other
            ))),
        }
    }
}

/// Session selection configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Resolution strategy for `send` without an explicit selector
    #[serde(default)]
    pub strategy: SessionStrategy,
}

/// Provider/model pair resolved from configuration and flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelector {
    /// Provider identifier
    pub provider_id: String,
    /// Model identifier
    pub model_id: String,
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Returns
    ///
    /// Returns the loaded and merged configuration
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::debug!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    /// Default configuration file location
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("dev", "promptcast", "promptcast")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
            .unwrap_or_else(|| PathBuf::from(".promptcast").join("config.yaml"))
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(PromptcastError::from)
            .with_context(|| format!("Failed to read config file {}", path))?;
        let config = serde_yaml::from_str(&contents)
            .map_err(PromptcastError::from)
            .context("Failed to parse config")?;
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        if let Ok(host) = std::env::var("PROMPTCAST_HOST") {
            self.server.host = host;
        }

        if let Ok(port) = std::env::var("PROMPTCAST_PORT") {
            match port.parse() {
                Ok(v) => self.server.port = v,
                Err(_) => tracing::warn!("Invalid PROMPTCAST_PORT: {}", port),
            }
        }

        if let Ok(provider) = std::env::var("PROMPTCAST_PROVIDER") {
            self.model.provider = provider;
        }

        if let Ok(model) = std::env::var("PROMPTCAST_MODEL") {
            self.model.model = model;
        }

        if let Ok(dir) = std::env::var("PROMPTCAST_CACHE_DIR") {
            tracing::debug!(dir = %dir, "Env override: PROMPTCAST_CACHE_DIR");
            self.cache.dir = PathBuf::from(dir);
        }

        if let Ok(backend) = std::env::var("PROMPTCAST_CACHE_BACKEND") {
            match backend.parse() {
                Ok(v) => self.cache.backend = v,
                Err(_) => tracing::warn!("Invalid PROMPTCAST_CACHE_BACKEND: {}", backend),
            }
        }

        if let Ok(strategy) = std::env::var("PROMPTCAST_SESSION_STRATEGY") {
            match strategy.parse() {
                Ok(v) => self.session.strategy = v,
                Err(_) => tracing::warn!("Invalid PROMPTCAST_SESSION_STRATEGY: {}", strategy),
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any required value is empty or zero
    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(PromptcastError::Config("server.host cannot be empty".to_string()).into());
        }

        if self.server.port == 0 {
            return Err(
                PromptcastError::Config("server.port must be greater than 0".to_string()).into(),
            );
        }

        if self.model.provider.trim().is_empty() {
            return Err(
                PromptcastError::Config("model.provider cannot be empty".to_string()).into(),
            );
        }

        if self.model.model.trim().is_empty() {
            return Err(PromptcastError::Config("model.model cannot be empty".to_string()).into());
        }

        if self.cache.dir.as_os_str().is_empty() {
            return Err(PromptcastError::Config("cache.dir cannot be empty".to_string()).into());
        }

        Ok(())
    }

    /// Endpoint identity of the configured server
    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(&self.server.host, self.server.port)
    }

    /// Provider/model pair, with optional per-command overrides
    pub fn model_selector(&self, provider: Option<&str>, model: Option<&str>) -> ModelSelector {
        ModelSelector {
            provider_id: provider.unwrap_or(&self.model.provider).to_string(),
            model_id: model.unwrap_or(&self.model.model).to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            model: ModelConfig::default(),
            cache: CacheConfig::default(),
            session: SessionConfig::default(),
        }
    }
}
