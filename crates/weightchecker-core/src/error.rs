//! Error types for `weightchecker-core`.
//!
//! Fallible operations return [`CoreResult<T>`]. Scanner failures never
//! escape the scan thread as errors; they are turned into a
//! `ScanEvent::Error` message carrying this type's `Display` text.

use std::path::{Path, PathBuf};

/// Unified error type for all core operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The target path does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// A directory was expected but the path points to something else.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The process lacks permission to access the path.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// A file or directory name is invalid (empty, contains separators, etc.).
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// A rename target is already taken.
    #[error("already exists: {0}")]
    AlreadyExists(PathBuf),

    /// The name mask is not a valid glob.
    #[error("invalid name mask: {0}")]
    InvalidPattern(String),

    /// Failed to parse the TOML settings file.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Map an I/O error on `path` to the most specific variant.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            std::io::ErrorKind::AlreadyExists => Self::AlreadyExists(path.to_path_buf()),
            _ => Self::Io(err),
        }
    }
}

/// Convenience alias used throughout `weightchecker-core`.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_displays_path() {
        let err = CoreError::NotFound(PathBuf::from("/missing/dir"));
        assert_eq!(err.to_string(), "path not found: /missing/dir");
    }

    #[test]
    fn already_exists_displays_path() {
        let err = CoreError::AlreadyExists(PathBuf::from("/tmp/b.txt"));
        assert_eq!(err.to_string(), "already exists: /tmp/b.txt");
    }

    #[test]
    fn invalid_pattern_displays_message() {
        let err = CoreError::InvalidPattern("[abc".to_string());
        assert!(err.to_string().starts_with("invalid name mask"));
    }

    #[test]
    fn from_io_maps_kinds() {
        let path = Path::new("/x");
        let nf = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(CoreError::from_io(path, nf), CoreError::NotFound(_)));

        let pd = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        assert!(matches!(
            CoreError::from_io(path, pd),
            CoreError::PermissionDenied(_)
        ));

        let other = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err = CoreError::from_io(path, other);
        assert!(matches!(err, CoreError::Io(_)));
        assert!(err.to_string().contains("boom"));
    }
}
