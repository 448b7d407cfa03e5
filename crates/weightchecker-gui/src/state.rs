/// Application state management.
///
/// Centralises all mutable state that the UI reads and writes. The scan
/// thread only talks to this state through the scan channel; every display
/// mutation happens in `drain()`, in sort-header clicks, or after a
/// completed rename/delete.
///
/// Each window (the main one and every drill-down sub-window) owns its own
/// `AppState`, so sessions, channels and cancel tokens are never shared.
use crossbeam_channel::{Receiver, Sender};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use weightchecker_core::config::Settings;
use weightchecker_core::fileops;
use weightchecker_core::model::{display_name, format_count, format_size, sort_entries};
use weightchecker_core::model::{Entry, SortKey};
use weightchecker_core::platform::reveal_in_file_manager;
use weightchecker_core::scanner::{
    progress_fraction, scan_channel, spawn_scan, ScanEvent, ScanFilters, ScanHandle,
    ScanMessage, ScanRequest, SessionId,
};
use weightchecker_core::CoreResult;

/// The current phase of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPhase {
    /// Nothing scanned yet, or the last scan failed.
    Idle,
    /// A session is running; the progress bar is visible.
    Scanning,
    /// The last session finished or was stopped; entries are final.
    Results,
}

/// How long to sleep between checks while waiting for a superseded scan.
const RETIRE_POLL: Duration = Duration::from_millis(10);

/// One table row as handed to the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow<'a> {
    pub kind: &'static str,
    pub display_name: &'a str,
    pub human_size: String,
    pub absolute_path: &'a Path,
    pub is_dir: bool,
}

/// Open rename prompt.
#[derive(Debug, Clone)]
pub struct RenameDialog {
    pub path: PathBuf,
    pub new_name: String,
}

/// All state for one window.
pub struct AppState {
    // ── Scan options ───────────────────────────────────
    /// Text in the path field; committed with Enter or "Scan".
    pub path_input: String,
    /// Root of the current (or last) session.
    pub current_root: Option<PathBuf>,
    pub recursive: bool,
    pub show_hidden: bool,
    /// Text in the mask field; committed with Enter.
    pub name_pattern: String,
    follow_links: bool,
    precount: bool,
    poll_interval: Duration,
    cancel_grace: Duration,

    // ── Session ────────────────────────────────────────
    pub phase: AppPhase,
    session: SessionId,
    scan_handle: Option<ScanHandle>,
    scan_tx: Sender<ScanMessage>,
    scan_rx: Receiver<ScanMessage>,
    last_drain: Option<Instant>,

    // ── Display ────────────────────────────────────────
    pub entries: Vec<Entry>,
    /// Paths currently represented in `entries`.
    visited: HashSet<PathBuf>,
    pub sort_key: SortKey,
    pub sort_descending: bool,
    pub status_text: String,
    /// `None` while scanning means indeterminate.
    pub progress: Option<f32>,
    pub processed: u64,
    pub scan_duration: Option<Duration>,

    // ── Dialogs ────────────────────────────────────────
    pub selected: Option<PathBuf>,
    pub pending_delete: Option<PathBuf>,
    pub rename_dialog: Option<RenameDialog>,
    pub error_message: Option<String>,
    /// Folders the user asked to open in a sub-window this frame.
    subwindow_requests: Vec<PathBuf>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl AppState {
    /// Create idle state with scan options taken from `settings`.
    pub fn new(settings: &Settings) -> Self {
        let (scan_tx, scan_rx) = scan_channel();
        Self {
            path_input: String::new(),
            current_root: None,
            recursive: settings.scan.recursive,
            show_hidden: settings.scan.show_hidden,
            name_pattern: settings.scan.name_pattern.clone(),
            follow_links: settings.scan.follow_links,
            precount: settings.scan.precount,
            poll_interval: settings.ui.poll_interval(),
            cancel_grace: settings.ui.cancel_grace(),
            phase: AppPhase::Idle,
            session: SessionId::default(),
            scan_handle: None,
            scan_tx,
            scan_rx,
            last_drain: None,
            entries: Vec::new(),
            visited: HashSet::new(),
            sort_key: SortKey::Name,
            sort_descending: false,
            status_text: "Ready".to_string(),
            progress: None,
            processed: 0,
            scan_duration: None,
            selected: None,
            pending_delete: None,
            rename_dialog: None,
            error_message: None,
            subwindow_requests: Vec::new(),
        }
    }

    /// State for a drill-down window: same options, current-folder mode.
    pub fn for_subfolder(settings: &Settings, path: PathBuf) -> Self {
        let mut state = Self::new(settings);
        state.recursive = false;
        state.start_scan(path);
        state
    }

    #[inline]
    pub fn is_scanning(&self) -> bool {
        self.phase == AppPhase::Scanning
    }

    #[inline]
    pub fn session(&self) -> SessionId {
        self.session
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    // ── Scan lifecycle ─────────────────────────────────

    /// Start a new session on `path`, superseding any running one.
    ///
    /// An invalid mask is reported through `error_message` and leaves the
    /// current session untouched.
    pub fn start_scan(&mut self, path: PathBuf) {
        let filters = match ScanFilters::new(self.show_hidden, &self.name_pattern) {
            Ok(f) => f,
            Err(e) => {
                self.error_message = Some(e.to_string());
                return;
            }
        };

        self.retire_session();

        self.entries.clear();
        self.visited.clear();
        self.selected = None;
        self.processed = 0;
        self.scan_duration = None;
        self.progress = if self.precount { Some(0.0) } else { None };
        self.path_input = path.to_string_lossy().into_owned();
        self.current_root = Some(path.clone());
        self.status_text = "Scanning…".to_string();
        self.phase = AppPhase::Scanning;

        self.session = self.session.next();
        let request = ScanRequest {
            root: path,
            recursive: self.recursive,
            filters,
            follow_links: self.follow_links,
            precount: self.precount,
        };
        match spawn_scan(self.session, request, self.scan_tx.clone()) {
            Ok(handle) => self.scan_handle = Some(handle),
            Err(e) => {
                warn!("Could not start scan: {e}");
                self.fail_session(e.to_string());
            }
        }
    }

    /// Re-scan the current root with the current options.
    pub fn rescan(&mut self) {
        if let Some(root) = self.current_root.clone() {
            self.start_scan(root);
        }
    }

    /// Scan whatever is typed in the path field.
    pub fn scan_path_input(&mut self) {
        let trimmed = self.path_input.trim();
        if trimmed.is_empty() {
            return;
        }
        self.start_scan(PathBuf::from(trimmed));
    }

    pub fn set_recursive(&mut self, recursive: bool) {
        if self.recursive != recursive {
            self.recursive = recursive;
            self.rescan();
        }
    }

    pub fn set_show_hidden(&mut self, show_hidden: bool) {
        if self.show_hidden != show_hidden {
            self.show_hidden = show_hidden;
            self.rescan();
        }
    }

    /// Apply the mask field. Nothing is scanned if the mask is invalid.
    pub fn commit_pattern(&mut self) {
        if let Err(e) = ScanFilters::new(self.show_hidden, &self.name_pattern) {
            self.error_message = Some(e.to_string());
            return;
        }
        self.rescan();
    }

    /// Ask the running session to stop. Partial results are kept once its
    /// `Cancelled` event is drained.
    pub fn cancel_scan(&mut self) {
        if let Some(ref handle) = self.scan_handle {
            handle.cancel();
        }
    }

    /// Cancel the running session and wait a bounded time for its thread.
    ///
    /// The channel keeps being emptied while waiting so a scanner blocked
    /// on a full queue gets to see the flag. A session that does not exit
    /// within the grace period is abandoned; its later messages are dropped
    /// by the session check in `drain()`.
    fn retire_session(&mut self) {
        if let Some(handle) = self.scan_handle.take() {
            handle.cancel();
            let deadline = Instant::now() + self.cancel_grace;
            loop {
                self.discard_queued();
                if handle.is_finished() {
                    break;
                }
                let now = Instant::now();
                if now >= deadline {
                    warn!(
                        "Scan {} did not stop within {:?}; abandoning it",
                        handle.session(),
                        self.cancel_grace
                    );
                    break;
                }
                handle.wait_timeout((deadline - now).min(RETIRE_POLL));
            }
        }
        self.discard_queued();
    }

    fn discard_queued(&mut self) {
        let dropped = self.scan_rx.try_iter().count();
        if dropped > 0 {
            debug!("Discarded {dropped} queued scan messages");
        }
    }

    // ── Draining ───────────────────────────────────────

    /// Drain on the poll schedule. Returns `true` if state changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last_drain {
            if now.duration_since(last) < self.poll_interval {
                return false;
            }
        }
        self.last_drain = Some(now);
        self.drain()
    }

    /// Apply every message queued right now, without waiting for more.
    ///
    /// Messages from any session but the current one are dropped. Returns
    /// `true` if state changed.
    pub fn drain(&mut self) -> bool {
        let pending = self.scan_rx.len();
        let mut changed = false;
        for _ in 0..pending {
            let msg = match self.scan_rx.try_recv() {
                Ok(m) => m,
                Err(_) => break,
            };
            if msg.session != self.session {
                debug!("Dropping message from stale scan {}", msg.session);
                continue;
            }
            self.apply(msg.event);
            changed = true;
        }
        changed
    }

    fn apply(&mut self, event: ScanEvent) {
        match event {
            ScanEvent::Item(entry) => {
                if self.visited.insert(entry.path.clone()) {
                    self.entries.push(entry);
                }
            }
            ScanEvent::Progress { processed, total } => {
                self.processed = processed;
                self.progress = progress_fraction(processed, total);
            }
            ScanEvent::Finished { items, duration } => {
                info!("Scan {} done: {items} items", self.session);
                self.status_text = format!(
                    "Done: {} items in {:.2}s",
                    format_count(items),
                    duration.as_secs_f64()
                );
                self.scan_duration = Some(duration);
                self.end_session(AppPhase::Results);
                self.resort();
            }
            ScanEvent::Cancelled => {
                self.status_text = "Stopped".to_string();
                self.end_session(AppPhase::Results);
                self.resort();
            }
            ScanEvent::Error(message) => {
                warn!("Scan {} failed: {message}", self.session);
                self.fail_session(message);
            }
        }
    }

    fn end_session(&mut self, phase: AppPhase) {
        self.phase = phase;
        self.progress = None;
        self.scan_handle = None;
    }

    fn fail_session(&mut self, message: String) {
        self.error_message = Some(message);
        self.status_text = "Ready".to_string();
        self.end_session(AppPhase::Idle);
    }

    // ── Sorting ────────────────────────────────────────

    /// Sort by `key`; the active key flips direction instead.
    pub fn sort_by(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.sort_descending = !self.sort_descending;
        } else {
            self.sort_key = key;
            self.sort_descending = false;
        }
        self.resort();
    }

    fn resort(&mut self) {
        sort_entries(&mut self.entries, self.sort_key, self.sort_descending);
    }

    /// Arrow shown next to a column header, if it is the active one.
    pub fn sort_arrow(&self, key: SortKey) -> &'static str {
        match (self.sort_key == key, self.sort_descending) {
            (false, _) => "",
            (true, false) => " ▲",
            (true, true) => " ▼",
        }
    }

    // ── Display ────────────────────────────────────────

    pub fn display_rows(&self) -> impl Iterator<Item = DisplayRow<'_>> + '_ {
        self.entries.iter().map(|e| DisplayRow {
            kind: e.kind.label(),
            display_name: e.display_name.as_str(),
            human_size: format_size(e.size),
            absolute_path: &e.path,
            is_dir: e.is_dir(),
        })
    }

    pub fn entry(&self, path: &Path) -> Option<&Entry> {
        self.entries.iter().find(|e| e.path == path)
    }

    // ── File operations ────────────────────────────────

    /// Delete `path` from disk and drop its entry and every entry below it.
    ///
    /// On failure nothing in memory changes and the message is kept for the
    /// error window.
    pub fn delete(&mut self, path: &Path) -> CoreResult<()> {
        if let Err(e) = fileops::delete_path(path) {
            warn!("Delete of {} failed: {e}", path.display());
            self.error_message = Some(e.to_string());
            return Err(e);
        }
        self.entries.retain(|e| !e.path.starts_with(path));
        self.visited.retain(|p| !p.starts_with(path));
        if self.selected.as_deref().is_some_and(|s| s.starts_with(path)) {
            self.selected = None;
        }
        self.status_text = format!("Deleted {}", file_label(path));
        Ok(())
    }

    /// Rename `path` to `new_name` and update its entry in place.
    ///
    /// Entries below a renamed folder are moved under the new path so later
    /// operations on them still find the files.
    pub fn rename(&mut self, path: &Path, new_name: &str) -> CoreResult<PathBuf> {
        let new_path = match fileops::rename_path(path, new_name) {
            Ok(p) => p,
            Err(e) => {
                warn!("Rename of {} failed: {e}", path.display());
                self.error_message = Some(e.to_string());
                return Err(e);
            }
        };
        if new_path == path {
            return Ok(new_path);
        }

        let root = self.current_root.clone().unwrap_or_default();
        for entry in &mut self.entries {
            if let Some(moved) = reparent(&entry.path, path, &new_path) {
                entry.display_name = display_name(&moved, &root, self.recursive);
                entry.path = moved;
            }
        }
        self.visited = self
            .visited
            .drain()
            .map(|p| reparent(&p, path, &new_path).unwrap_or(p))
            .collect();
        if let Some(moved) = self
            .selected
            .as_deref()
            .and_then(|s| reparent(s, path, &new_path))
        {
            self.selected = Some(moved);
        }
        self.status_text = format!("Renamed {} to {}", file_label(path), file_label(&new_path));
        Ok(new_path)
    }

    /// Show `path` in the platform file manager.
    pub fn reveal(&mut self, path: &Path) {
        if let Err(e) = reveal_in_file_manager(path) {
            warn!("Reveal of {} failed: {e}", path.display());
            self.error_message = Some(e.to_string());
        }
    }

    // ── Sub-windows ────────────────────────────────────

    /// Ask for a drill-down window on `path`. Only honoured in
    /// current-folder mode and for folders.
    pub fn request_subwindow(&mut self, path: &Path) {
        if self.recursive {
            return;
        }
        if self.entry(path).is_some_and(Entry::is_dir) {
            self.subwindow_requests.push(path.to_path_buf());
        }
    }

    pub fn take_subwindow_requests(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.subwindow_requests)
    }
}

impl Drop for AppState {
    fn drop(&mut self) {
        if let Some(ref handle) = self.scan_handle {
            handle.cancel();
        }
    }
}

/// `path` moved from under `from` to under `to`, or `None` if it is not
/// `from` or below it.
fn reparent(path: &Path, from: &Path, to: &Path) -> Option<PathBuf> {
    let rest = path.strip_prefix(from).ok()?;
    if rest.as_os_str().is_empty() {
        Some(to.to_path_buf())
    } else {
        Some(to.join(rest))
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
