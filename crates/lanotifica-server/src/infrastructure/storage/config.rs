//! JSON-based configuration persistence for the relay.
//!
//! Reads `config.json` from the directory described by a [`ConfigPaths`]:
//!
//! ```json
//! {
//!   "port": ":19420",
//!   "secret": "<64 hex characters>",
//!   "read_timeout_seconds": 10,
//!   "write_timeout_seconds": 10,
//!   "idle_timeout_seconds": 120,
//!   "icon_cache_max_age_days": 180
//! }
//! ```
//!
//! # First run
//!
//! When the file does not exist, [`load_config`] creates the directory,
//! generates a new secret from the OS random source, and writes the defaults
//! with owner-only permissions.  It then reads the file back, so the returned
//! [`Config`] is always exactly what is on disk.
//!
//! # Every later run
//!
//! The file is loaded verbatim and never rewritten.  The secret in particular
//! is never regenerated once it exists: regenerating it would silently unpair
//! every phone.  Editing the file by hand is the only way to change it.
//!
//! # Serde default values
//!
//! Fields annotated with `#[serde(default = "some_fn")]` fall back to the
//! built-in default when absent from the file.  `secret` has no default: a
//! file without one is malformed and startup stops with a parse error rather
//! than repairing it.

use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use lanotifica_core::{Secret, SecretError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::files::{create_config_dir, write_new_file, PRIVATE_FILE_MODE};
use super::paths::ConfigPaths;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither `XDG_CONFIG_HOME` nor `HOME` is set.
    #[error("could not determine config directory: set XDG_CONFIG_HOME or HOME")]
    NoConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file exists but is not a valid config.
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The default config could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A fresh secret could not be generated.
    #[error("failed to generate secret: {0}")]
    Secret(#[from] SecretError),

    /// `port` is neither `:PORT` nor `HOST:PORT`.
    #[error("invalid listen address {0:?}: expected \":PORT\" or \"HOST:PORT\"")]
    InvalidPort(String),
}

// ── Config schema ─────────────────────────────────────────────────────────────

/// Relay configuration stored on disk.
///
/// Loaded once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Listen address, `":19420"` style (all interfaces) or `"HOST:PORT"`.
    #[serde(default = "default_port")]
    pub port: String,
    /// Bearer secret shared with paired phones.
    pub secret: Secret,
    #[serde(default = "default_read_timeout")]
    pub read_timeout_seconds: u64,
    #[serde(default = "default_write_timeout")]
    pub write_timeout_seconds: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
    /// Maximum age of cached app icons.
    #[serde(default = "default_icon_cache_max_age")]
    pub icon_cache_max_age_days: u64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_port() -> String {
    ":19420".to_string()
}
fn default_read_timeout() -> u64 {
    10
}
fn default_write_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    120
}
fn default_icon_cache_max_age() -> u64 {
    180
}

impl Config {
    /// Builds the default configuration around `secret`.
    pub fn with_secret(secret: Secret) -> Self {
        Self {
            port: default_port(),
            secret,
            read_timeout_seconds: default_read_timeout(),
            write_timeout_seconds: default_write_timeout(),
            idle_timeout_seconds: default_idle_timeout(),
            icon_cache_max_age_days: default_icon_cache_max_age(),
        }
    }

    /// Builds the default configuration with a freshly generated secret.
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::RandomSource`] if the OS random source fails.
    pub fn generate() -> Result<Self, SecretError> {
        Ok(Self::with_secret(Secret::generate()?))
    }

    /// Socket address to bind.  `":PORT"` binds every IPv4 interface.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPort`] if `port` cannot be parsed.
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        if let Some(port) = self.port.strip_prefix(':') {
            let port: u16 = port
                .parse()
                .map_err(|_| ConfigError::InvalidPort(self.port.clone()))?;
            return Ok(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)));
        }
        self.port
            .parse()
            .map_err(|_| ConfigError::InvalidPort(self.port.clone()))
    }

    /// The numeric TCP port, for the discovery advertisement.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPort`] if `port` cannot be parsed.
    pub fn port_number(&self) -> Result<u16, ConfigError> {
        let tail = self
            .port
            .rsplit_once(':')
            .map_or(self.port.as_str(), |(_, port)| port);
        tail.parse()
            .map_err(|_| ConfigError::InvalidPort(self.port.clone()))
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_seconds)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_seconds)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_seconds)
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Loads the config, creating it with a new secret on first run.
///
/// # Errors
///
/// - [`ConfigError::Secret`] if the first-run secret cannot be generated.
/// - [`ConfigError::Io`] for any file-system failure.
/// - [`ConfigError::Parse`] if the existing file is malformed.
pub fn load_config(paths: &ConfigPaths) -> Result<Config, ConfigError> {
    let path = paths.config_file();

    match std::fs::metadata(&path) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => write_default_config(paths)?,
        Err(source) => return Err(ConfigError::Io { path, source }),
    }

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
}

/// Writes a freshly generated default config.
///
/// If another process creates the file first, its content wins and this call
/// succeeds without touching it.
fn write_default_config(paths: &ConfigPaths) -> Result<(), ConfigError> {
    create_config_dir(paths.dir()).map_err(|source| ConfigError::Io {
        path: paths.dir().to_path_buf(),
        source,
    })?;

    let config = Config::generate()?;
    let content = serde_json::to_string_pretty(&config).map_err(ConfigError::Serialize)?;

    let path = paths.config_file();
    match write_new_file(&path, content.as_bytes(), PRIVATE_FILE_MODE) {
        Ok(()) => {
            info!("created default config at {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
        Err(source) => Err(ConfigError::Io { path, source }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
