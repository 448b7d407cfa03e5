/// End-to-end tests for `AppState`: the per-window presenter.
///
/// These tests drive the real scanner and the real filesystem through
/// `AppState` without spinning up an egui window, keeping them fast and
/// deterministic.
///
/// **Scope:**
///   - Scan lifecycle (start, drain, completion, stop, restart)
///   - Sorting (toggle, stability)
///   - Rename and delete reconciliation
///   - Drill-down sub-window requests
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use weightchecker_core::config::Settings;
use weightchecker_core::model::{EntryKind, SortKey};
use weightchecker_gui::state::{AppPhase, AppState};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn write_bytes(path: &Path, n: usize) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut f = fs::File::create(path).unwrap();
    f.write_all(&vec![0u8; n]).unwrap();
}

/// ```text
/// root/
///   a.txt     (100 bytes)
///   b.bin     (200 bytes)
///   sub/
///     c.rs    (300 bytes)
/// ```
fn make_temp_tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_bytes(&tmp.path().join("a.txt"), 100);
    write_bytes(&tmp.path().join("b.bin"), 200);
    write_bytes(&tmp.path().join("sub").join("c.rs"), 300);
    tmp
}

fn state_with(recursive: bool) -> AppState {
    let mut settings = Settings::default();
    settings.scan.recursive = recursive;
    AppState::new(&settings)
}

/// Pump `drain()` until the phase leaves `Scanning` or the deadline expires.
fn pump_until_done(state: &mut AppState) {
    let deadline = std::time::Instant::now() + Duration::from_secs(30);
    while state.phase == AppPhase::Scanning {
        assert!(
            std::time::Instant::now() < deadline,
            "scan did not complete within 30 seconds"
        );
        state.drain();
        std::thread::sleep(Duration::from_millis(10));
    }
}

fn scanned(root: &Path, recursive: bool) -> AppState {
    let mut state = state_with(recursive);
    state.start_scan(root.to_path_buf());
    pump_until_done(&mut state);
    state
}

fn names(state: &AppState) -> Vec<String> {
    state
        .entries
        .iter()
        .map(|e| e.display_name.to_string())
        .collect()
}

fn sub_c() -> String {
    Path::new("sub").join("c.rs").to_string_lossy().into_owned()
}

// ── Scan lifecycle ────────────────────────────────────────────────────────────

/// After `start_scan`, the phase must be `Scanning` with a fresh status.
#[test]
fn start_scan_sets_scanning_phase() {
    let tmp = make_temp_tree();
    let mut state = state_with(true);
    state.start_scan(tmp.path().to_path_buf());
    assert_eq!(state.phase, AppPhase::Scanning);
    assert_eq!(state.status_text, "Scanning…");
    assert_eq!(state.current_root.as_deref(), Some(tmp.path()));
}

/// A completed recursive scan holds every entry, sorted by name.
#[test]
fn scan_completes_with_sorted_entries() {
    let tmp = make_temp_tree();
    let state = scanned(tmp.path(), true);

    assert_eq!(state.phase, AppPhase::Results);
    assert!(state.status_text.starts_with("Done: 4 items"));
    assert_eq!(state.progress, None);
    assert_eq!(names(&state), vec!["a.txt", "b.bin", "sub", &sub_c()]);

    let sub = state.entry(&tmp.path().join("sub")).unwrap();
    assert_eq!(sub.kind, EntryKind::Directory);
    assert_eq!(sub.size, 300);
}

/// Display rows carry kind, name, human size and absolute path.
#[test]
fn display_rows_expose_formatted_sizes() {
    let tmp = make_temp_tree();
    let state = scanned(tmp.path(), false);

    let rows: Vec<_> = state.display_rows().collect();
    assert_eq!(rows.len(), 3);
    let a = rows.iter().find(|r| r.display_name == "a.txt").unwrap();
    assert_eq!(a.human_size, "100 B");
    assert_eq!(a.absolute_path, tmp.path().join("a.txt"));
    assert!(!a.is_dir);
    let sub = rows.iter().find(|r| r.display_name == "sub").unwrap();
    assert!(sub.is_dir);
}

/// Draining an idle state is a no-op.
#[test]
fn drain_without_scan_is_idempotent() {
    let mut state = state_with(true);
    assert!(!state.drain());
    assert!(!state.drain());
    assert_eq!(state.phase, AppPhase::Idle);
    assert!(state.entries.is_empty());
    assert_eq!(state.status_text, "Ready");
}

/// A missing root surfaces an error and resets the scanning UI.
#[test]
fn missing_root_reports_error() {
    let tmp = TempDir::new().unwrap();
    let state = scanned(&tmp.path().join("gone"), true);
    assert_eq!(state.phase, AppPhase::Idle);
    assert_eq!(state.status_text, "Ready");
    assert!(state.error_message.is_some());
    assert!(state.entries.is_empty());
}

/// Starting a second scan clears the first one's results.
#[test]
fn start_scan_resets_previous_results() {
    let tmp = make_temp_tree();
    let other = TempDir::new().unwrap();
    write_bytes(&other.path().join("only.txt"), 1);

    let mut state = scanned(tmp.path(), true);
    let first = state.session();
    assert_eq!(state.entries.len(), 4);

    state.start_scan(other.path().to_path_buf());
    assert!(state.entries.is_empty(), "previous entries must be cleared");
    assert_ne!(state.session(), first);
    pump_until_done(&mut state);
    assert_eq!(names(&state), vec!["only.txt"]);
}

/// Restarting while a scan is still running never mixes the two sessions.
#[test]
fn restart_mid_scan_keeps_only_new_session() {
    let big = TempDir::new().unwrap();
    for d in 0..20 {
        for f in 0..20 {
            write_bytes(&big.path().join(format!("d{d:02}")).join(format!("f{f:02}")), 1);
        }
    }
    let small = make_temp_tree();

    let mut state = state_with(true);
    state.start_scan(big.path().to_path_buf());
    state.start_scan(small.path().to_path_buf());
    pump_until_done(&mut state);

    assert!(state
        .entries
        .iter()
        .all(|e| e.path.starts_with(small.path())));
    assert_eq!(state.entries.len(), 4);
}

/// Stopping keeps partial results and reports "Stopped".
#[test]
fn cancel_scan_stops_with_partial_results() {
    let tmp = make_temp_tree();
    let mut state = state_with(true);
    state.start_scan(tmp.path().to_path_buf());
    state.cancel_scan();
    pump_until_done(&mut state);

    // The scan may finish before the flag is read; either outcome is final.
    assert_eq!(state.phase, AppPhase::Results);
    assert!(
        state.status_text == "Stopped" || state.status_text.starts_with("Done"),
        "unexpected status {}",
        state.status_text
    );
    assert!(state.entries.len() <= 4);
}

/// An invalid mask is reported and no scan starts.
#[test]
fn invalid_mask_blocks_rescan() {
    let tmp = make_temp_tree();
    let mut state = scanned(tmp.path(), true);
    let session = state.session();

    state.name_pattern = "[z-a]".to_string();
    state.commit_pattern();
    assert_eq!(state.session(), session);
    assert_eq!(state.phase, AppPhase::Results);
    assert!(state.error_message.is_some());
}

/// Changing the mode re-scans the current folder.
#[test]
fn mode_change_rescans() {
    let tmp = make_temp_tree();
    let mut state = scanned(tmp.path(), true);
    assert_eq!(state.entries.len(), 4);

    state.set_recursive(false);
    assert_eq!(state.phase, AppPhase::Scanning);
    pump_until_done(&mut state);
    assert_eq!(names(&state), vec!["a.txt", "b.bin", "sub"]);
}

// ── Sorting ───────────────────────────────────────────────────────────────────

/// Clicking the active column flips direction; a new column starts ascending.
#[test]
fn sort_toggles_direction() {
    let tmp = make_temp_tree();
    let mut state = scanned(tmp.path(), false);

    state.sort_by(SortKey::Size);
    assert_eq!(state.sort_key, SortKey::Size);
    assert!(!state.sort_descending);
    let sizes: Vec<u64> = state.entries.iter().map(|e| e.size).collect();
    assert_eq!(sizes, vec![100, 200, 300]);

    state.sort_by(SortKey::Size);
    assert!(state.sort_descending);
    let sizes: Vec<u64> = state.entries.iter().map(|e| e.size).collect();
    assert_eq!(sizes, vec![300, 200, 100]);

    state.sort_by(SortKey::Kind);
    assert!(!state.sort_descending);
    assert_eq!(names(&state), vec!["sub", "a.txt", "b.bin"]);
}

/// Equal sizes keep their relative order through repeated sorts.
#[test]
fn size_sort_is_stable() {
    let tmp = TempDir::new().unwrap();
    for name in ["d.bin", "a.bin", "c.bin", "b.bin"] {
        write_bytes(&tmp.path().join(name), 10);
    }
    let mut state = scanned(tmp.path(), false);
    // Finished sorts by name first.
    assert_eq!(names(&state), vec!["a.bin", "b.bin", "c.bin", "d.bin"]);

    state.sort_by(SortKey::Size);
    assert_eq!(names(&state), vec!["a.bin", "b.bin", "c.bin", "d.bin"]);
    state.sort_by(SortKey::Size);
    assert_eq!(names(&state), vec!["a.bin", "b.bin", "c.bin", "d.bin"]);
}

// ── File operations ───────────────────────────────────────────────────────────

/// Renaming updates exactly one entry and the filesystem.
#[test]
fn rename_updates_one_entry() {
    let tmp = make_temp_tree();
    let mut state = scanned(tmp.path(), true);
    let before: Vec<_> = state.entries.clone();

    let old = tmp.path().join("a.txt");
    let new = state.rename(&old, "z.txt").unwrap();
    assert_eq!(new, tmp.path().join("z.txt"));
    assert!(new.exists() && !old.exists());

    let changed: Vec<_> = state
        .entries
        .iter()
        .zip(before.iter())
        .filter(|(after, before)| after != before)
        .collect();
    assert_eq!(changed.len(), 1);
    let (after, _) = changed[0];
    assert_eq!(after.path, new);
    assert_eq!(after.display_name.as_str(), "z.txt");
    assert!(state.status_text.starts_with("Renamed"));
}

/// Renaming in recursive mode recomputes the relative display name.
#[test]
fn rename_in_subfolder_keeps_relative_name() {
    let tmp = make_temp_tree();
    let mut state = scanned(tmp.path(), true);

    let old = tmp.path().join("sub").join("c.rs");
    state.rename(&old, "d.rs").unwrap();
    let entry = state.entry(&tmp.path().join("sub").join("d.rs")).unwrap();
    assert_eq!(
        entry.display_name.as_str(),
        Path::new("sub").join("d.rs").to_string_lossy()
    );
}

/// Renaming a folder moves the entries below it, so they stay usable.
#[test]
fn rename_folder_moves_descendants() {
    let tmp = make_temp_tree();
    let mut state = scanned(tmp.path(), true);

    let renamed = state.rename(&tmp.path().join("sub"), "lib").unwrap();
    let moved = renamed.join("c.rs");
    let entry = state.entry(&moved).expect("descendant follows its folder");
    assert_eq!(
        entry.display_name.as_str(),
        Path::new("lib").join("c.rs").to_string_lossy()
    );
    assert!(state.entry(&tmp.path().join("sub").join("c.rs")).is_none());

    state.delete(&moved).unwrap();
    assert!(!moved.exists());
    assert!(state.error_message.is_none());
}

/// A rename onto an existing name changes nothing.
#[test]
fn rename_collision_changes_nothing() {
    let tmp = make_temp_tree();
    let mut state = scanned(tmp.path(), true);
    let before = state.entries.clone();

    let err = state.rename(&tmp.path().join("a.txt"), "b.bin");
    assert!(err.is_err());
    assert_eq!(state.entries, before);
    assert!(state.error_message.is_some());
    assert_eq!(fs::metadata(tmp.path().join("a.txt")).unwrap().len(), 100);
    assert_eq!(fs::metadata(tmp.path().join("b.bin")).unwrap().len(), 200);
}

/// Deleting a file removes exactly its entry.
#[test]
fn delete_file_removes_entry() {
    let tmp = make_temp_tree();
    let mut state = scanned(tmp.path(), true);

    state.delete(&tmp.path().join("b.bin")).unwrap();
    assert!(!tmp.path().join("b.bin").exists());
    assert_eq!(names(&state), vec!["a.txt", "sub", &sub_c()]);
    assert!(state.status_text.starts_with("Deleted"));
}

/// Deleting a folder also drops the entries below it.
#[test]
fn delete_folder_removes_descendants() {
    let tmp = make_temp_tree();
    let mut state = scanned(tmp.path(), true);

    state.delete(&tmp.path().join("sub")).unwrap();
    assert_eq!(names(&state), vec!["a.txt", "b.bin"]);
}

/// A failed delete leaves state alone and records the error.
#[test]
fn delete_failure_changes_nothing() {
    let tmp = make_temp_tree();
    let mut state = scanned(tmp.path(), true);
    let before = state.entries.clone();

    let ghost: PathBuf = tmp.path().join("ghost");
    assert!(state.delete(&ghost).is_err());
    assert_eq!(state.entries, before);
    assert!(state.error_message.is_some());
}

// ── Sub-windows ───────────────────────────────────────────────────────────────

/// Folders can be opened in a sub-window only in current-folder mode.
#[test]
fn subwindow_requests_need_current_folder_mode() {
    let tmp = make_temp_tree();
    let sub = tmp.path().join("sub");

    let mut recursive = scanned(tmp.path(), true);
    recursive.request_subwindow(&sub);
    assert!(recursive.take_subwindow_requests().is_empty());

    let mut flat = scanned(tmp.path(), false);
    flat.request_subwindow(&tmp.path().join("a.txt"));
    flat.request_subwindow(&sub);
    assert_eq!(flat.take_subwindow_requests(), vec![sub.clone()]);
    assert!(flat.take_subwindow_requests().is_empty());
}

/// A sub-window state is independent and lists its folder non-recursively.
#[test]
fn subfolder_state_scans_its_own_folder() {
    let tmp = make_temp_tree();
    let parent = scanned(tmp.path(), false);

    let mut child = AppState::for_subfolder(&Settings::default(), tmp.path().join("sub"));
    assert!(!child.recursive);
    assert_ne!(child.current_root, parent.current_root);
    pump_until_done(&mut child);
    assert_eq!(names(&child), vec!["c.rs"]);
    assert_eq!(parent.entries.len(), 3);
}
