/// Top action bar -- path field, scan controls, mode and filters.
use crate::state::AppState;
use egui::Ui;
use tracing::debug;

/// Draw the toolbar.
///
/// `browse` enables the folder-picker button; sub-windows pass `false`
/// because they are pinned to one folder.
pub fn toolbar(ui: &mut Ui, state: &mut AppState, browse: bool) {
    ui.horizontal(|ui| {
        ui.label("Folder:");
        let field_width = (ui.available_width() - 260.0).max(160.0);
        let path_field = ui.add(
            egui::TextEdit::singleline(&mut state.path_input)
                .hint_text("Type a path and press Enter")
                .desired_width(field_width),
        );
        if path_field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            state.scan_path_input();
        }

        if browse
            && ui
                .button("📁 Browse")
                .on_hover_text("Choose a folder to scan")
                .clicked()
        {
            let mut dialog = rfd::FileDialog::new();
            if let Some(ref root) = state.current_root {
                dialog = dialog.set_directory(root);
            }
            match dialog.pick_folder() {
                Some(folder) => state.start_scan(folder),
                None => debug!("Folder picker dismissed"),
            }
        }

        if ui
            .add_enabled(
                !state.path_input.trim().is_empty(),
                egui::Button::new("▶ Scan").min_size(egui::vec2(70.0, 24.0)),
            )
            .clicked()
        {
            state.scan_path_input();
        }

        // Stop button (only during scan).
        if ui
            .add_enabled(
                state.is_scanning(),
                egui::Button::new("⏹ Stop").min_size(egui::vec2(70.0, 24.0)),
            )
            .clicked()
        {
            state.cancel_scan();
        }
    });

    ui.horizontal(|ui| {
        let mut recursive = state.recursive;
        ui.radio_value(&mut recursive, true, "Recursive")
            .on_hover_text("List every file and folder below the chosen folder");
        ui.radio_value(&mut recursive, false, "Current folder only")
            .on_hover_text("List the immediate children; double-click a folder to open it");
        state.set_recursive(recursive);

        ui.separator();

        let mut show_hidden = state.show_hidden;
        ui.checkbox(&mut show_hidden, "Show hidden");
        state.set_show_hidden(show_hidden);

        ui.separator();

        ui.label("Mask:");
        let mask_field = ui.add(
            egui::TextEdit::singleline(&mut state.name_pattern)
                .hint_text("*")
                .desired_width(120.0),
        );
        let mask_field = mask_field.on_hover_text("Shell wildcards: * any run, ? one character");
        if mask_field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            state.commit_pattern();
        }
    });
}
