/// Scanner module: orchestrates one background traversal per session.
///
/// A scan runs on its own named thread and reports through a bounded
/// crossbeam channel of [`ScanMessage`]s. The channel is created once per
/// consumer with [`scan_channel`] and every session gets a clone of the
/// sender, so messages from a superseded session may still arrive and must
/// be filtered by [`SessionId`].
///
/// Cancellation is cooperative: [`ScanHandle::cancel`] sets a shared flag
/// that the traversal checks before listing each directory and before
/// emitting each item. A thread cannot be killed, so callers wait a bounded
/// time with [`ScanHandle::wait_timeout`] and then abandon it.
pub mod filter;
pub mod progress;
pub mod walk;

pub use filter::{should_include, ScanFilters};
pub use progress::{progress_fraction, ScanEvent, ScanMessage, SessionId};
pub use walk::{count_items, directory_size, run_scan, PROGRESS_EVERY};

use crate::error::CoreResult;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::info;

/// Maximum number of messages that may queue up in the channel.
///
/// The UI drains on every poll tick. If it falls behind (hidden window,
/// modal dialog) the scanner blocks on `send` rather than consuming
/// unbounded heap.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// Create the channel a consumer keeps for all of its sessions.
pub fn scan_channel() -> (Sender<ScanMessage>, Receiver<ScanMessage>) {
    crossbeam_channel::bounded(PROGRESS_CHANNEL_CAPACITY)
}

/// Shared cancellation flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the scan to stop as soon as possible.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// What to scan and how.
#[derive(Clone, Debug)]
pub struct ScanRequest {
    pub root: PathBuf,
    /// Whole subtree when `true`, immediate children only otherwise.
    pub recursive: bool,
    pub filters: ScanFilters,
    /// Descend into and size through symbolic links.
    pub follow_links: bool,
    /// Pre-count items for a determinate progress bar.
    pub precount: bool,
}

impl ScanRequest {
    /// A request with links not followed and pre-counting on.
    pub fn new(root: impl Into<PathBuf>, recursive: bool, filters: ScanFilters) -> Self {
        Self {
            root: root.into(),
            recursive,
            filters,
            follow_links: false,
            precount: true,
        }
    }
}

/// Handle to a running or completed scan.
pub struct ScanHandle {
    session: SessionId,
    cancel: CancelToken,
    /// Disconnects when the scan thread exits.
    finished_rx: Receiver<()>,
    /// Dropping the join handle detaches the thread.
    _thread: Option<thread::JoinHandle<()>>,
}

impl ScanHandle {
    #[inline]
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Request the scan to stop as soon as possible.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Block up to `timeout` for the scan thread to exit. Returns `true`
    /// if it has exited.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        match self.finished_rx.recv_timeout(timeout) {
            Err(RecvTimeoutError::Disconnected) => true,
            Err(RecvTimeoutError::Timeout) => false,
            // Nothing is ever sent; treat a stray value as still running.
            Ok(()) => false,
        }
    }

    /// Non-blocking check for thread exit.
    pub fn is_finished(&self) -> bool {
        matches!(self.finished_rx.try_recv(), Err(TryRecvError::Disconnected))
    }
}

/// Start `request` on a background thread, tagging every message with
/// `session`.
///
/// # Errors
///
/// [`CoreError::Io`](crate::CoreError::Io) if the thread could not be
/// spawned.
pub fn spawn_scan(
    session: SessionId,
    request: ScanRequest,
    sender: Sender<ScanMessage>,
) -> CoreResult<ScanHandle> {
    let cancel = CancelToken::new();
    let cancel_clone = cancel.clone();
    let (finished_tx, finished_rx) = crossbeam_channel::bounded::<()>(0);

    let thread = thread::Builder::new()
        .name("weightchecker-scanner".into())
        .spawn(move || {
            // Held for the thread's lifetime; dropping it signals exit.
            let _finished = finished_tx;
            run_scan(session, &request, &cancel_clone, &sender);
        })?;

    info!("Spawned scanner thread for session {session}");
    Ok(ScanHandle {
        session,
        cancel,
        finished_rx,
        _thread: Some(thread),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let a = CancelToken::new();
        let b = a.clone();
        assert!(!b.is_cancelled());
        a.cancel();
        assert!(b.is_cancelled());
    }

    #[test]
    fn request_defaults() {
        let req = ScanRequest::new("/tmp", true, ScanFilters::default());
        assert!(!req.follow_links);
        assert!(req.precount);
        assert_eq!(req.filters.pattern(), "*");
    }
}
