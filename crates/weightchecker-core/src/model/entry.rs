//! One row of scan output and the comparators used to order rows.
use compact_str::CompactString;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// File or folder.
///
/// Declaration order matters: folders sort before files when ordering by
/// kind ascending.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryKind {
    Directory,
    File,
}

impl EntryKind {
    /// Label for the "Type" column.
    pub fn label(self) -> &'static str {
        match self {
            Self::Directory => "📁 Folder",
            Self::File => "📄 File",
        }
    }
}

/// A single reported file or directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub kind: EntryKind,

    /// Basename in current-folder mode, path relative to the scan root in
    /// recursive mode.
    pub display_name: CompactString,

    /// File length, or the recursive sum of descendant file lengths for a
    /// directory (the directory itself contributes nothing).
    pub size: u64,

    /// Unique key within a scan session.
    pub path: PathBuf,
}

impl Entry {
    pub fn new(kind: EntryKind, display_name: CompactString, size: u64, path: PathBuf) -> Self {
        Self {
            kind,
            display_name,
            size,
            path,
        }
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Derive the display name for `path` in a scan rooted at `root`.
///
/// Falls back to the full path when `path` is not under `root`.
pub fn display_name(path: &Path, root: &Path, recursive: bool) -> CompactString {
    if recursive {
        if let Ok(rel) = path.strip_prefix(root) {
            if !rel.as_os_str().is_empty() {
                return CompactString::new(rel.to_string_lossy());
            }
        }
    }
    match path.file_name() {
        Some(name) => CompactString::new(name.to_string_lossy()),
        None => CompactString::new(path.to_string_lossy()),
    }
}

/// Column the table is ordered by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    Kind,
    Name,
    Size,
}

impl SortKey {
    pub fn label(self) -> &'static str {
        match self {
            Self::Kind => "Type",
            Self::Name => "Name",
            Self::Size => "Size",
        }
    }
}

/// Sort `entries` in place with a stable comparator.
///
/// Equal keys keep their current relative order, so sorting unchanged data
/// twice is deterministic. Descending reverses the comparator rather than
/// the slice for the same reason.
pub fn sort_entries(entries: &mut [Entry], key: SortKey, descending: bool) {
    entries.sort_by(|a, b| {
        let ord = compare(a, b, key);
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
}

fn compare(a: &Entry, b: &Entry, key: SortKey) -> Ordering {
    match key {
        SortKey::Kind => a
            .kind
            .cmp(&b.kind)
            .then_with(|| compare_names(&a.display_name, &b.display_name)),
        SortKey::Name => compare_names(&a.display_name, &b.display_name),
        SortKey::Size => a.size.cmp(&b.size),
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}
