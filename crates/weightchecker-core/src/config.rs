//! Application settings loaded from a TOML file.
//!
//! Every field has a default so the tool works without a settings file.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CoreError, CoreResult};

/// Upper bound on how long starting a new scan waits for the old one.
pub const MAX_CANCEL_GRACE_MS: u64 = 1_000;

/// Environment variable that overrides the settings file location.
pub const CONFIG_ENV_VAR: &str = "WEIGHTCHECKER_CONFIG";

/// Settings file looked up in the working directory when the
/// environment variable is not set.
pub const DEFAULT_CONFIG_FILE: &str = "weightchecker.toml";

/// Top-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub scan: ScanSettings,
    #[serde(default)]
    pub ui: UiSettings,
    #[serde(default)]
    pub log: LogSettings,
}

impl Settings {
    /// Load settings from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the file does not exist.
    /// - [`CoreError::PermissionDenied`] if the file is not readable.
    /// - [`CoreError::ConfigParse`] if the TOML is malformed.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CoreError::from_io(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse settings from TOML text.
    pub fn from_toml(content: &str) -> CoreResult<Self> {
        toml::from_str(content).map_err(|e| CoreError::ConfigParse(e.to_string()))
    }

    /// Load settings, falling back to defaults when the file is missing or
    /// broken. A missing file is normal and stays quiet.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(CoreError::NotFound(_)) => Self::default(),
            Err(e) => {
                warn!("Ignoring settings file {}: {e}", path.display());
                Self::default()
            }
        }
    }
}

/// Defaults for a new scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSettings {
    #[serde(default = "default_true")]
    pub recursive: bool,
    #[serde(default)]
    pub show_hidden: bool,
    #[serde(default = "default_pattern")]
    pub name_pattern: String,
    /// Descend into symbolic links. Off by default because link cycles
    /// are only caught by the per-session guards.
    ///
    /// When off, a link to a folder is listed as a file whose size is that
    /// of the link itself, not of the folder it points to.
    #[serde(default)]
    pub follow_links: bool,
    /// Pre-count items so the progress bar can be determinate.
    #[serde(default = "default_true")]
    pub precount: bool,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            recursive: true,
            show_hidden: false,
            name_pattern: default_pattern(),
            follow_links: false,
            precount: true,
        }
    }
}

/// Timing knobs for the presenter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_cancel_grace_ms")]
    pub cancel_grace_ms: u64,
}

impl UiSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// Bounded wait for a superseded scan, never more than
    /// [`MAX_CANCEL_GRACE_MS`].
    pub fn cancel_grace(&self) -> Duration {
        Duration::from_millis(self.cancel_grace_ms.min(MAX_CANCEL_GRACE_MS))
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            cancel_grace_ms: default_cancel_grace_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_pattern() -> String {
    "*".to_string()
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_cancel_grace_ms() -> u64 {
    500
}

fn default_log_level() -> String {
    "info".to_string()
}
