//! WeightChecker: shows how much disk space each file and folder takes.
//!
//! Thin binary entry point. All logic lives in the `weightchecker-core`
//! and `weightchecker-gui` crates.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use weightchecker_core::config::{Settings, CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};

fn main() -> anyhow::Result<()> {
    let config_path = std::env::var_os(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    let settings = Settings::load_or_default(&config_path);

    // RUST_LOG wins over the configured level.
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("WeightChecker starting");

    let initial = std::env::args_os().nth(1).map(PathBuf::from);

    // Build application state *before* opening the window so the initial
    // scan is already under way on the first frame.
    let state = weightchecker_gui::WeightCheckerState::build(settings, initial);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("WeightChecker")
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([640.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "WeightChecker",
        options,
        Box::new(|cc| {
            Ok(Box::new(weightchecker_gui::WeightCheckerApp::with_state(
                cc, state,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))?;

    Ok(())
}
