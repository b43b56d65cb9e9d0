//! Storage infrastructure: the per-user configuration directory.
//!
//! - **`paths`** – resolves the directory once at startup into an explicit
//!   [`paths::ConfigPaths`] value that is passed by reference to every
//!   consumer.  Nothing reads the environment after that.
//! - **`config`** – loads `config.json`, creating it with a fresh secret on
//!   first run.
//! - **`files`** – owner-only directory and file creation shared with the
//!   certificate store.

pub mod config;
pub(crate) mod files;
pub mod paths;
