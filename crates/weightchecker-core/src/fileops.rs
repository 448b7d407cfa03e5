//! Single-item filesystem operations run on the UI thread: delete and
//! rename within the same parent directory.
use crate::error::{CoreError, CoreResult};
use std::path::{Path, PathBuf};
use tracing::info;

/// Deletes a file, or a directory with all of its contents.
///
/// Symbolic links are removed, never followed.
///
/// # Errors
///
/// - [`CoreError::NotFound`] if `path` does not exist.
/// - [`CoreError::PermissionDenied`] if removal is not allowed.
/// - [`CoreError::Io`] for any other I/O failure. A directory may then be
///   partially removed; nothing is rolled back.
pub fn delete_path(path: &Path) -> CoreResult<()> {
    let meta = std::fs::symlink_metadata(path).map_err(|e| CoreError::from_io(path, e))?;

    if meta.is_dir() {
        std::fs::remove_dir_all(path).map_err(|e| CoreError::from_io(path, e))?;
    } else {
        std::fs::remove_file(path).map_err(|e| CoreError::from_io(path, e))?;
    }

    info!("Deleted {}", path.display());
    Ok(())
}

/// Renames the item at `path` to `new_name` in the same directory and
/// returns the new path.
///
/// Renaming to the current name is a no-op. An existing item is never
/// overwritten.
///
/// # Errors
///
/// - [`CoreError::NotFound`] if `path` does not exist.
/// - [`CoreError::InvalidName`] if `new_name` is empty or contains a path
///   separator.
/// - [`CoreError::AlreadyExists`] if the target name is taken.
/// - [`CoreError::Io`] for any other I/O failure.
pub fn rename_path(path: &Path, new_name: &str) -> CoreResult<PathBuf> {
    if std::fs::symlink_metadata(path).is_err() {
        return Err(CoreError::NotFound(path.to_path_buf()));
    }

    let new_name = new_name.trim();
    if !is_valid_filename(new_name) {
        return Err(CoreError::InvalidName(new_name.to_string()));
    }

    let parent = path
        .parent()
        .ok_or_else(|| CoreError::InvalidName("no parent directory".to_string()))?;
    let new_path = parent.join(new_name);
    if new_path == path {
        return Ok(new_path);
    }

    // POSIX rename silently replaces the target, so check first.
    if std::fs::symlink_metadata(&new_path).is_ok() && !is_case_only_change(path, &new_path) {
        return Err(CoreError::AlreadyExists(new_path));
    }

    std::fs::rename(path, &new_path).map_err(|e| CoreError::from_io(path, e))?;
    info!("Renamed {} -> {}", path.display(), new_path.display());
    Ok(new_path)
}

/// Checks that `name` is usable as a single path component.
pub fn is_valid_filename(name: &str) -> bool {
    if name.is_empty() || name == "." || name == ".." {
        return false;
    }
    if name.contains('/') || name.contains('\0') {
        return false;
    }
    #[cfg(windows)]
    if name.contains('\\') || name.contains(':') {
        return false;
    }
    true
}

/// On case-insensitive Windows volumes `a.txt -> A.txt` sees its own source
/// as the existing target.
#[cfg(windows)]
fn is_case_only_change(from: &Path, to: &Path) -> bool {
    from.to_string_lossy().to_lowercase() == to.to_string_lossy().to_lowercase()
}

#[cfg(not(windows))]
fn is_case_only_change(_from: &Path, _to: &Path) -> bool {
    false
}
