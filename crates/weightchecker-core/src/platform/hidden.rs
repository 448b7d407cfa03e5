//! Hidden-item detection.
//!
//! Windows uses the `FILE_ATTRIBUTE_HIDDEN` bit; everything else treats a
//! leading dot in the basename as hidden.
use std::path::Path;

/// Check whether `path` is hidden on this platform.
///
/// Returns `false` when the attribute cannot be read (vanished entry,
/// permission denied) so such items fall through to the normal filters.
#[cfg(windows)]
pub fn is_hidden(path: &Path) -> bool {
    use std::os::windows::fs::MetadataExt;
    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;
    std::fs::symlink_metadata(path)
        .map(|meta| meta.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
        .unwrap_or(false)
}

/// Check whether `path` is hidden on this platform.
#[cfg(not(windows))]
pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}
