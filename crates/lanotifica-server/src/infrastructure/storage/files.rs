//! Permission-aware file creation.
//!
//! On Unix the mode is applied at creation time and then re-applied
//! explicitly, because `open(2)` filters the requested mode through the
//! process umask.  On other platforms the mode is ignored.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// `rwxr-x---` for the configuration directory.
pub(crate) const DIR_MODE: u32 = 0o750;

/// `rw-------` for the config file and the private key.
pub(crate) const PRIVATE_FILE_MODE: u32 = 0o600;

/// `rw-r--r--` for the certificate.
pub(crate) const PUBLIC_FILE_MODE: u32 = 0o644;

/// Creates `dir` and any missing parents.  Existing directories keep their
/// permissions.
pub(crate) fn create_config_dir(dir: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder.create(dir)
}

/// Writes `contents` to a file that must not already exist.
///
/// Fails with [`io::ErrorKind::AlreadyExists`] rather than overwriting.
pub(crate) fn write_new_file(path: &Path, contents: &[u8], mode: u32) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    }
    #[cfg(not(unix))]
    let _ = mode;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_new_file_refuses_to_overwrite() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("once.txt");
        write_new_file(&path, b"first", PRIVATE_FILE_MODE).unwrap();

        // Act
        let second = write_new_file(&path, b"second", PRIVATE_FILE_MODE);

        // Assert
        assert_eq!(second.unwrap_err().kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(&path).unwrap(), b"first");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_new_file_applies_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let private = dir.path().join("private");
        let public = dir.path().join("public");

        write_new_file(&private, b"k", PRIVATE_FILE_MODE).unwrap();
        write_new_file(&public, b"c", PUBLIC_FILE_MODE).unwrap();

        let mode = |p: &Path| fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&private), 0o600);
        assert_eq!(mode(&public), 0o644);
    }

    #[test]
    fn test_create_config_dir_creates_nested_parents() {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b").join("lanotifica");

        create_config_dir(&nested).unwrap();

        assert!(nested.is_dir());
        // Idempotent on an existing directory.
        create_config_dir(&nested).unwrap();
    }
}
