//! Inclusion rules applied to every candidate before it is emitted or
//! descended into: hidden-item exclusion and the glob name mask.
use crate::error::{CoreError, CoreResult};
use crate::platform::is_hidden;
use globset::{GlobBuilder, GlobMatcher};
use std::ffi::OsStr;
use std::path::Path;

/// Filter set for one scan.
///
/// The mask is matched against the basename only with shell-glob rules:
/// `*` any run of characters, `?` one character, `[...]` a class,
/// everything else literal. Matching is case-insensitive on Windows.
#[derive(Clone, Debug)]
pub struct ScanFilters {
    show_hidden: bool,
    pattern: String,
    /// `None` when the mask matches everything.
    matcher: Option<GlobMatcher>,
}

impl ScanFilters {
    /// Compile a filter set. An empty or all-`*` mask matches every name.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidPattern`] if the mask is not a valid glob.
    pub fn new(show_hidden: bool, name_pattern: &str) -> CoreResult<Self> {
        let pattern = name_pattern.trim();
        let matcher = if pattern.is_empty() || pattern.chars().all(|c| c == '*') {
            None
        } else {
            let glob = GlobBuilder::new(&shell_glob(pattern))
                .case_insensitive(cfg!(windows))
                .literal_separator(false)
                .backslash_escape(false)
                .build()
                .map_err(|e| CoreError::InvalidPattern(format!("{pattern}: {e}")))?;
            Some(glob.compile_matcher())
        };
        Ok(Self {
            show_hidden,
            pattern: if pattern.is_empty() {
                "*".to_string()
            } else {
                pattern.to_string()
            },
            matcher,
        })
    }

    #[inline]
    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    /// The mask as entered (trimmed; `*` when blank).
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Check a basename against the mask.
    pub fn matches_name(&self, name: &OsStr) -> bool {
        match &self.matcher {
            Some(m) => m.is_match(Path::new(name)),
            None => true,
        }
    }

    /// Whether traversal may descend into the directory at `path`.
    ///
    /// Only the hidden rule prunes descent; a folder that fails the mask is
    /// still walked so matching descendants are found.
    pub fn may_descend(&self, path: &Path) -> bool {
        self.show_hidden || !is_hidden(path)
    }
}

impl Default for ScanFilters {
    fn default() -> Self {
        Self {
            show_hidden: false,
            pattern: "*".to_string(),
            matcher: None,
        }
    }
}

/// Rewrite a shell mask into globset syntax.
///
/// Only `*`, `?` and `[...]` keep their meaning. Braces become one-character
/// classes so they are not read as alternation, and a `[` with no closing
/// `]` is matched literally.
fn shell_glob(mask: &str) -> String {
    let chars: Vec<char> = mask.chars().collect();
    let mut out = String::with_capacity(mask.len() + 8);
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '{' => out.push_str("[{]"),
            '}' => out.push_str("[}]"),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.extend(&chars[i..=end]);
                    i = end;
                }
                None => out.push_str("[[]"),
            },
            c => out.push(c),
        }
        i += 1;
    }
    out
}

/// Index of the `]` closing the class that opens at `start`.
///
/// A `]` right after the opening `[` (or after `[!` / `[^`) is a member.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut i = start + 1;
    if matches!(chars.get(i), Some('!') | Some('^')) {
        i += 1;
    }
    if chars.get(i) == Some(&']') {
        i += 1;
    }
    chars[i.min(chars.len())..]
        .iter()
        .position(|&c| c == ']')
        .map(|offset| i + offset)
}

/// Decide whether an item is reported.
///
/// Excludes hidden items unless `show_hidden` is set, and items whose
/// basename does not match the mask. Paths without a basename (a bare root)
/// are excluded.
pub fn should_include(path: &Path, filters: &ScanFilters) -> bool {
    if !filters.show_hidden && is_hidden(path) {
        return false;
    }
    match path.file_name() {
        Some(name) => filters.matches_name(name),
        None => false,
    }
}
