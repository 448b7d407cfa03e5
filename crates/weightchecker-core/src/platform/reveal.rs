//! "Reveal in file manager": best-effort shell hand-off.
//!
//! Windows selects the item in Explorer, macOS reveals it in Finder and
//! other systems open the parent directory with the desktop's default
//! handler. Nothing waits on the spawned process.
use crate::error::{CoreError, CoreResult};
use std::path::Path;
use tracing::debug;

/// Show `path` in the platform file manager.
///
/// # Errors
///
/// - [`CoreError::NotFound`] if `path` no longer exists.
/// - [`CoreError::Io`] if the shell command could not be spawned.
pub fn reveal_in_file_manager(path: &Path) -> CoreResult<()> {
    if std::fs::symlink_metadata(path).is_err() {
        return Err(CoreError::NotFound(path.to_path_buf()));
    }
    debug!("Revealing {}", path.display());
    spawn_reveal(path)?;
    Ok(())
}

#[cfg(windows)]
fn spawn_reveal(path: &Path) -> std::io::Result<()> {
    use std::os::windows::process::CommandExt;
    if path.is_dir() {
        open::that(path)
    } else {
        // Explorer parses its own command line; the quotes must survive as-is.
        std::process::Command::new("explorer.exe")
            .raw_arg(format!("/select,\"{}\"", path.display()))
            .spawn()
            .map(|_| ())
    }
}

#[cfg(target_os = "macos")]
fn spawn_reveal(path: &Path) -> std::io::Result<()> {
    std::process::Command::new("open")
        .arg("-R")
        .arg(path)
        .spawn()
        .map(|_| ())
}

#[cfg(not(any(windows, target_os = "macos")))]
fn spawn_reveal(path: &Path) -> std::io::Result<()> {
    open::that(path.parent().unwrap_or(path))
}
