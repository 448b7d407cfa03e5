//! Single-threaded traversal that produces the scan event stream.
//!
//! Listing uses `std::fs::read_dir` with an explicit stack so the emission
//! order is fixed: for each directory its files come first, then its
//! subdirectories, each group in name order, and subdirectories are then
//! descended depth-first. Folder sizes and the progress pre-count use
//! `jwalk` in serial mode.
use crate::error::{CoreError, CoreResult};
use crate::model::{display_name, Entry, EntryKind};
use crate::scanner::filter::should_include;
use crate::scanner::progress::{ScanEvent, ScanMessage, SessionId};
use crate::scanner::{CancelToken, ScanRequest};
use crossbeam_channel::Sender;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// A progress event is sent after this many emitted items.
pub const PROGRESS_EVERY: u64 = 32;

/// Sum the lengths of every regular file below `path`.
///
/// The sum is unfiltered: hidden files and names outside the mask still
/// count toward their folder. Entries that cannot be read are skipped. When
/// `cancel` is set the total accumulated so far is returned.
pub fn directory_size(path: &Path, cancel: &CancelToken, follow_links: bool) -> u64 {
    let walker = jwalk::WalkDir::new(path)
        .min_depth(1)
        .skip_hidden(false)
        .follow_links(follow_links)
        .parallelism(jwalk::Parallelism::Serial);

    let mut total: u64 = 0;
    for entry_result in walker {
        if cancel.is_cancelled() {
            break;
        }
        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                debug!("Skipping while sizing {}: {err}", path.display());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        match entry.metadata() {
            Ok(meta) => total = total.saturating_add(meta.len()),
            Err(err) => debug!("No metadata for {}: {err}", entry.path().display()),
        }
    }
    total
}

/// Count the items a scan of `request` is expected to emit.
///
/// Applies the same hidden and mask rules as the scan itself but is only an
/// estimate; the consumer clamps progress against it. Returns `None` if
/// `cancel` is set before the count completes.
pub fn count_items(request: &ScanRequest, cancel: &CancelToken) -> Option<u64> {
    let show_hidden = request.filters.show_hidden();
    let mut walker = jwalk::WalkDir::new(&request.root)
        .min_depth(1)
        .skip_hidden(false)
        .follow_links(request.follow_links)
        .parallelism(jwalk::Parallelism::Serial)
        .process_read_dir(move |_depth, _dir, _state, children| {
            if !show_hidden {
                children.retain(|child| match child {
                    Ok(entry) => !crate::platform::is_hidden(&entry.path()),
                    Err(_) => true,
                });
            }
        });
    if !request.recursive {
        walker = walker.max_depth(1);
    }

    let mut count: u64 = 0;
    for entry_result in walker {
        if cancel.is_cancelled() {
            return None;
        }
        if let Ok(entry) = entry_result {
            if request.filters.matches_name(&entry.file_name) {
                count += 1;
            }
        }
    }
    Some(count)
}

/// Traverse `request.root` and send the resulting events on `tx`.
///
/// Runs on the calling thread. Exactly one terminal event
/// ([`ScanEvent::Finished`], [`ScanEvent::Cancelled`] or
/// [`ScanEvent::Error`]) is sent last, unless the receiver has gone away.
pub fn run_scan(
    session: SessionId,
    request: &ScanRequest,
    cancel: &CancelToken,
    tx: &Sender<ScanMessage>,
) {
    let start = Instant::now();
    info!(
        "Scan {session} of {} started (recursive: {}, mask: {})",
        request.root.display(),
        request.recursive,
        request.filters.pattern()
    );

    let mut walker = Walker::new(session, request, cancel, tx);
    if let Err(err) = walker.run() {
        info!("Scan {session} failed: {err}");
        walker.send(ScanEvent::Error(err.to_string()));
        return;
    }
    if walker.disconnected {
        debug!("Scan {session}: receiver dropped");
        return;
    }

    walker.send_progress();
    if cancel.is_cancelled() {
        info!(
            "Scan {session} cancelled after {} items",
            walker.processed
        );
        walker.send(ScanEvent::Cancelled);
    } else {
        let duration = start.elapsed();
        info!(
            "Scan {session} finished: {} items in {:.2}s",
            walker.processed,
            duration.as_secs_f64()
        );
        walker.send(ScanEvent::Finished {
            items: walker.processed,
            duration,
        });
    }
}

/// One listed child of a directory.
struct Child {
    path: PathBuf,
    is_dir: bool,
}

/// Mutable traversal state for one session.
struct Walker<'a> {
    session: SessionId,
    request: &'a ScanRequest,
    cancel: &'a CancelToken,
    tx: &'a Sender<ScanMessage>,
    /// Paths already emitted in this session.
    visited: HashSet<PathBuf>,
    /// Canonical directories already listed; only used when following links.
    descended: HashSet<PathBuf>,
    processed: u64,
    total: Option<u64>,
    disconnected: bool,
}

impl<'a> Walker<'a> {
    fn new(
        session: SessionId,
        request: &'a ScanRequest,
        cancel: &'a CancelToken,
        tx: &'a Sender<ScanMessage>,
    ) -> Self {
        Self {
            session,
            request,
            cancel,
            tx,
            visited: HashSet::new(),
            descended: HashSet::new(),
            processed: 0,
            total: None,
            disconnected: false,
        }
    }

    fn run(&mut self) -> CoreResult<()> {
        let root = &self.request.root;
        let meta = fs::metadata(root).map_err(|e| CoreError::from_io(root, e))?;
        if !meta.is_dir() {
            return Err(CoreError::NotADirectory(root.clone()));
        }

        if self.request.precount {
            self.total = count_items(self.request, self.cancel);
            debug!("Scan {}: pre-count {:?}", self.session, self.total);
            // Let the consumer show a determinate bar from the start.
            self.send_progress();
        }

        if self.request.recursive {
            self.walk_tree()
        } else {
            self.list_current()
        }
    }

    #[inline]
    fn should_stop(&self) -> bool {
        self.disconnected || self.cancel.is_cancelled()
    }

    /// Current-folder mode: the root's immediate children only.
    fn list_current(&mut self) -> CoreResult<()> {
        let root = self.request.root.clone();
        let children = self.list_dir(&root).map_err(|e| CoreError::from_io(&root, e))?;
        for child in &children {
            if self.should_stop() {
                break;
            }
            self.visit(child);
        }
        Ok(())
    }

    /// Recursive mode: depth-first pre-order walk of the whole subtree.
    fn walk_tree(&mut self) -> CoreResult<()> {
        let root = self.request.root.clone();
        self.first_descent(&root);
        let mut stack = vec![root.clone()];

        while let Some(dir) = stack.pop() {
            if self.should_stop() {
                break;
            }
            let children = match self.list_dir(&dir) {
                Ok(c) => c,
                Err(e) if dir == root => return Err(CoreError::from_io(&dir, e)),
                Err(e) => {
                    debug!("Cannot list {}: {e}", dir.display());
                    continue;
                }
            };

            for child in &children {
                if self.should_stop() {
                    return Ok(());
                }
                self.visit(child);
            }

            let mut subdirs = Vec::new();
            for child in children.into_iter().filter(|c| c.is_dir) {
                if self.request.filters.may_descend(&child.path) && self.first_descent(&child.path)
                {
                    subdirs.push(child.path);
                }
            }
            stack.extend(subdirs.into_iter().rev());
        }
        Ok(())
    }

    /// Filter, size and emit one child.
    fn visit(&mut self, child: &Child) {
        let path = &child.path;
        if !should_include(path, &self.request.filters) {
            return;
        }
        if !self.visited.insert(path.clone()) {
            return;
        }

        let (kind, size) = if child.is_dir {
            (
                EntryKind::Directory,
                directory_size(path, self.cancel, self.request.follow_links),
            )
        } else {
            match self.file_len(path) {
                Ok(len) => (EntryKind::File, len),
                Err(e) => {
                    debug!("Skipping {}: {e}", path.display());
                    return;
                }
            }
        };
        // A size cut short by cancellation is never reported.
        if self.cancel.is_cancelled() {
            return;
        }

        let name = display_name(path, &self.request.root, self.request.recursive);
        self.send(ScanEvent::Item(Entry::new(kind, name, size, path.clone())));
        self.processed += 1;
        if self.processed % PROGRESS_EVERY == 0 {
            self.send_progress();
        }
    }

    /// List `dir` sorted files-first, then by name.
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<Child>> {
        let mut children = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!("Skipping entry in {}: {e}", dir.display());
                    continue;
                }
            };
            let file_type = match entry.file_type() {
                Ok(t) => t,
                Err(e) => {
                    debug!("Skipping {}: {e}", entry.path().display());
                    continue;
                }
            };
            let path = entry.path();
            let is_dir = if file_type.is_symlink() {
                self.request.follow_links && fs::metadata(&path).map(|m| m.is_dir()).unwrap_or(false)
            } else {
                file_type.is_dir()
            };
            children.push(Child { path, is_dir });
        }
        children.sort_by(|a, b| {
            a.is_dir
                .cmp(&b.is_dir)
                .then_with(|| a.path.file_name().cmp(&b.path.file_name()))
        });
        Ok(children)
    }

    fn file_len(&self, path: &Path) -> io::Result<u64> {
        let meta = if self.request.follow_links {
            fs::metadata(path)?
        } else {
            fs::symlink_metadata(path)?
        };
        Ok(meta.len())
    }

    /// Record `dir` as listed. Returns `false` if a linked alias of it was
    /// already walked.
    fn first_descent(&mut self, dir: &Path) -> bool {
        if !self.request.follow_links {
            return true;
        }
        match fs::canonicalize(dir) {
            Ok(canonical) => self.descended.insert(canonical),
            Err(_) => false,
        }
    }

    fn send_progress(&mut self) {
        self.send(ScanEvent::Progress {
            processed: self.processed,
            total: self.total,
        });
    }

    fn send(&mut self, event: ScanEvent) {
        if self.disconnected {
            return;
        }
        let msg = ScanMessage {
            session: self.session,
            event,
        };
        if self.tx.send(msg).is_err() {
            self.disconnected = true;
        }
    }
}
