//! Server configuration with environment variable support.
//!
//! Settings are read from `ROUTEBIND_`-prefixed environment variables,
//! optionally seeded from a `.env` file.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `ROUTEBIND_HOST` | `127.0.0.1` |
//! | `ROUTEBIND_PORT` | `8000` |
//!
//! Log filtering follows `RUST_LOG` (see [`App::new`](crate::App::new)).
//!
//! # Example
//!
//! ```ignore
//! use routebind_core::config::{load_dotenv, ServerConfig};
//!
//! load_dotenv();
//! let config = ServerConfig::from_env()?;
//! app.serve(&config).await?;
//! ```

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Prefix for all routebind environment variables.
pub const ENV_PREFIX: &str = "ROUTEBIND_";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

/// Error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Env(#[from] envy::Error),
}

/// Where the HTTP server listens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Load from `ROUTEBIND_*` process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(envy::prefixed(ENV_PREFIX).from_env::<Self>()?)
    }

    /// Load from explicit `(name, value)` pairs, using the same prefix rules
    /// as [`from_env`](Self::from_env).
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter::<_, Self>(vars)?)
    }

    /// `host:port`, suitable for binding.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.addr())
    }
}

/// Load a `.env` file from the current directory or its parents.
///
/// Returns the path that was loaded, or `None` if there was no file.
/// Variables already set in the environment are not overwritten.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenvy::dotenv().ok()
}
