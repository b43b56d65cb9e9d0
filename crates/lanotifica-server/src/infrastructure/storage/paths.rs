//! Resolution of the per-user configuration directory.
//!
//! Follows the XDG base directory convention on every platform:
//!
//! - `$XDG_CONFIG_HOME/lanotifica` when the variable is set and non-empty;
//! - `$HOME/.config/lanotifica` otherwise.
//!
//! The result is captured once in a [`ConfigPaths`] value.  Tests build one
//! with [`ConfigPaths::new`] over a temporary directory, so they never touch
//! the real user configuration and can run in parallel.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use super::config::ConfigError;

/// Name of the application subdirectory under the config base directory.
pub const APP_DIR_NAME: &str = "lanotifica";
pub const CONFIG_FILE_NAME: &str = "config.json";
pub const CERT_FILE_NAME: &str = "cert.pem";
pub const KEY_FILE_NAME: &str = "key.pem";

/// Locations of every file the relay persists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    dir: PathBuf,
}

impl ConfigPaths {
    /// Uses `dir` directly as the configuration directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolves the directory from `XDG_CONFIG_HOME` / `HOME`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] when neither variable is usable.
    pub fn from_env() -> Result<Self, ConfigError> {
        resolve_config_dir(
            std::env::var_os("XDG_CONFIG_HOME"),
            std::env::var_os("HOME"),
        )
        .map(Self::new)
        .ok_or(ConfigError::NoConfigDir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE_NAME)
    }

    pub fn cert_file(&self) -> PathBuf {
        self.dir.join(CERT_FILE_NAME)
    }

    pub fn key_file(&self) -> PathBuf {
        self.dir.join(KEY_FILE_NAME)
    }
}

/// Pure resolution of the configuration directory from the two variables.
pub fn resolve_config_dir(
    xdg_config_home: Option<OsString>,
    home: Option<OsString>,
) -> Option<PathBuf> {
    let base = xdg_config_home
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| {
            home.filter(|v| !v.is_empty())
                .map(|h| PathBuf::from(h).join(".config"))
        })?;
    Some(base.join(APP_DIR_NAME))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_prefers_xdg_config_home() {
        // Arrange
        let xdg = Some(OsString::from("/xdg"));
        let home = Some(OsString::from("/home/user"));

        // Act
        let dir = resolve_config_dir(xdg, home);

        // Assert
        assert_eq!(dir, Some(PathBuf::from("/xdg/lanotifica")));
    }

    #[test]
    fn test_resolve_falls_back_to_home_dot_config() {
        let dir = resolve_config_dir(None, Some(OsString::from("/home/user")));
        assert_eq!(dir, Some(PathBuf::from("/home/user/.config/lanotifica")));
    }

    #[test]
    fn test_resolve_treats_empty_xdg_as_unset() {
        let dir = resolve_config_dir(Some(OsString::new()), Some(OsString::from("/h")));
        assert_eq!(dir, Some(PathBuf::from("/h/.config/lanotifica")));
    }

    #[test]
    fn test_resolve_returns_none_without_any_base() {
        assert_eq!(resolve_config_dir(None, None), None);
        assert_eq!(resolve_config_dir(None, Some(OsString::new())), None);
    }

    #[test]
    fn test_file_paths_live_in_config_dir() {
        let paths = ConfigPaths::new("/cfg/lanotifica");
        assert_eq!(paths.config_file(), PathBuf::from("/cfg/lanotifica/config.json"));
        assert_eq!(paths.cert_file(), PathBuf::from("/cfg/lanotifica/cert.pem"));
        assert_eq!(paths.key_file(), PathBuf::from("/cfg/lanotifica/key.pem"));
        assert_eq!(paths.dir(), Path::new("/cfg/lanotifica"));
    }
}
