//! # ic-config
//!
//! Layered settings: built-in defaults, then an optional TOML file, then
//! `INNERCIRCLE__SECTION__KEY` environment variables. A `.env` file is
//! loaded into the environment first.

use config::{Config, Environment, File, FileFormat};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

pub const ENV_PREFIX: &str = "INNERCIRCLE";
/// Names the settings file; defaults to [`DEFAULT_CONFIG_PATH`].
pub const CONFIG_PATH_VAR: &str = "INNERCIRCLE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/innercircle.toml";
/// Minimum session secret length; the cookie key is derived from it.
pub const MIN_SECRET_LEN: usize = 32;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub session: SessionSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize)]
pub struct SessionSettings {
    pub secret: SecretString,
    /// Mark session and flash cookies `Secure` (HTTPS only).
    pub cookie_secure: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// `EnvFilter` directive; `RUST_LOG` wins when set.
    pub filter: String,
    pub format: LogFormat,
}

impl Settings {
    /// Loads `.env`, the settings file and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                return Err(ConfigError::Invalid(format!(".env: {e}")));
            }
        }
        Self::from_sources(Some(&Self::file_path()), None)
    }

    /// The settings file `load` reads: `INNERCIRCLE_CONFIG` or the default path.
    pub fn file_path() -> String {
        std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
    }

    /// Builds settings from an optional file and an environment map.
    /// `env: None` reads the process environment.
    pub fn from_sources(file: Option<&str>, env: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000)?
            .set_default("database.url", "sqlite://innercircle.db")?
            .set_default("database.max_connections", 5)?
            .set_default("session.cookie_secure", false)?
            .set_default("log.filter", "info,tower_http=info")?
            .set_default("log.format", "pretty")?;

        if let Some(path) = file {
            builder = builder.add_source(File::new(path, FileFormat::Toml).required(false));
        }

        let environment = Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
            .source(env);
        let settings: Settings = builder.add_source(environment).build()?.try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.session.secret.expose_secret().len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid(format!(
                "session.secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Invalid("database.url is empty".into()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid("database.max_connections must be at least 1".into()));
        }
        Ok(())
    }
}
