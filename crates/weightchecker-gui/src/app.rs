/// Main `eframe::App` implementation for WeightChecker.
///
/// This is the top-level UI layout: toolbar, entry table and status bar for
/// the main window, plus any number of independent drill-down sub-windows.
use crate::panels;
use crate::state::AppState;
use crate::widgets;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use weightchecker_core::config::Settings;

/// Pre-built application state.
///
/// Construct this **before** calling `eframe::run_native` so the initial
/// scan is already running when the window appears.
pub struct WeightCheckerState {
    pub(crate) inner: AppState,
    settings: Settings,
}

impl WeightCheckerState {
    /// Build state from `settings` and start scanning `initial`, if given.
    pub fn build(settings: Settings, initial: Option<PathBuf>) -> Self {
        let mut state = AppState::new(&settings);
        if let Some(path) = initial {
            state.start_scan(path);
        }
        Self {
            inner: state,
            settings,
        }
    }
}

/// A drill-down window with its own state and scan session.
struct SubWindow {
    id: egui::Id,
    title: String,
    state: AppState,
    open: bool,
}

/// The WeightChecker application.
pub struct WeightCheckerApp {
    state: AppState,
    settings: Settings,
    subwindows: Vec<SubWindow>,
    next_subwindow: u64,
}

impl WeightCheckerApp {
    /// Create a new application instance from pre-built state.
    pub fn with_state(cc: &eframe::CreationContext<'_>, state: WeightCheckerState) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());
        Self {
            state: state.inner,
            settings: state.settings,
            subwindows: Vec::new(),
            next_subwindow: 0,
        }
    }

    fn open_subwindow(&mut self, path: PathBuf) {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        info!("Opening sub-window for {}", path.display());

        self.next_subwindow += 1;
        self.subwindows.push(SubWindow {
            id: egui::Id::new(("subwindow", self.next_subwindow)),
            title: format!("📁 {name}"),
            state: AppState::for_subfolder(&self.settings, path),
            open: true,
        });
    }
}

impl eframe::App for WeightCheckerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── Drain scan channels on the poll schedule ──────────────────────
        let now = Instant::now();
        self.state.tick(now);
        for window in &mut self.subwindows {
            window.state.tick(now);
        }

        let any_scanning =
            self.state.is_scanning() || self.subwindows.iter().any(|w| w.state.is_scanning());
        if any_scanning {
            ctx.request_repaint_after(self.state.poll_interval());
        }

        // ── Top toolbar ───────────────────────────────────────────────────
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.add_space(4.0);
            widgets::toolbar::toolbar(ui, &mut self.state, true);
            ui.add_space(4.0);
        });

        // ── Bottom status bar ─────────────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(24.0)
            .show(ctx, |ui| {
                ui.add_space(2.0);
                widgets::status_bar::status_bar(ui, &self.state);
                ui.add_space(2.0);
            });

        // ── Central panel (entry table) ───────────────────────────────────
        egui::CentralPanel::default().show(ctx, |ui| {
            widgets::entry_table::entry_table(ui, &mut self.state);
        });

        panels::dialogs::dialogs(ctx, egui::Id::new("main"), &mut self.state);

        // ── Sub-windows ───────────────────────────────────────────────────
        for window in &mut self.subwindows {
            egui::Window::new(window.title.clone())
                .id(window.id)
                .open(&mut window.open)
                .default_size([620.0, 420.0])
                .show(ctx, |ui| {
                    widgets::toolbar::toolbar(ui, &mut window.state, false);
                    ui.separator();
                    widgets::status_bar::status_bar(ui, &window.state);
                    ui.separator();
                    widgets::entry_table::entry_table(ui, &mut window.state);
                });
            panels::dialogs::dialogs(ctx, window.id, &mut window.state);
        }
        // Dropping a closed window's state cancels its scan.
        self.subwindows.retain(|w| w.open);

        let mut requests = self.state.take_subwindow_requests();
        for window in &mut self.subwindows {
            requests.extend(window.state.take_subwindow_requests());
        }
        for path in requests {
            self.open_subwindow(path);
        }
    }
}
