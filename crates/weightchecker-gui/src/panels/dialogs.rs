/// Confirmation, rename and error dialogs.
///
/// Each dialog is driven by an `Option` in [`AppState`]; `None` hides it.
/// `owner` keeps window ids unique when several windows are open.
use crate::state::{AppState, RenameDialog};
use egui::{Context, Id};
use tracing::debug;
use weightchecker_core::model::format_size;

/// Draw whichever dialogs are currently open for `state`.
pub fn dialogs(ctx: &Context, owner: Id, state: &mut AppState) {
    delete_dialog(ctx, owner, state);
    rename_dialog(ctx, owner, state);
    error_dialog(ctx, owner, state);
}

fn delete_dialog(ctx: &Context, owner: Id, state: &mut AppState) {
    let Some(path) = state.pending_delete.clone() else {
        return;
    };

    let what = match state.entry(&path) {
        Some(entry) if entry.is_dir() => format!(
            "Delete the folder and everything in it ({})?",
            format_size(entry.size)
        ),
        Some(entry) => format!("Delete this file ({})?", format_size(entry.size)),
        None => "Delete this item?".to_string(),
    };

    let mut confirmed = false;
    let mut cancelled = false;
    egui::Window::new("Confirm delete")
        .id(owner.with("delete"))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(what);
            ui.add_space(4.0);
            ui.label(egui::RichText::new(path.display().to_string()).monospace());
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("🗑 Delete").clicked() {
                    confirmed = true;
                }
                if ui.button("Cancel").clicked() {
                    cancelled = true;
                }
            });
        });

    if confirmed {
        state.pending_delete = None;
        if let Err(e) = state.delete(&path) {
            debug!("Delete dialog closed with error: {e}");
        }
    } else if cancelled {
        state.pending_delete = None;
    }
}

fn rename_dialog(ctx: &Context, owner: Id, state: &mut AppState) {
    let Some(mut dialog) = state.rename_dialog.take() else {
        return;
    };

    let mut submit = false;
    let mut cancelled = false;
    egui::Window::new("Rename")
        .id(owner.with("rename"))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(dialog.path.display().to_string()).monospace());
            ui.add_space(4.0);
            let field = ui.text_edit_singleline(&mut dialog.new_name);
            if field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                submit = true;
            }
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let has_name = !dialog.new_name.trim().is_empty();
                if ui.add_enabled(has_name, egui::Button::new("Rename")).clicked() {
                    submit = true;
                }
                if ui.button("Cancel").clicked() {
                    cancelled = true;
                }
            });
        });

    if cancelled {
        return;
    }
    state.rename_dialog = if submit && !dialog.new_name.trim().is_empty() {
        submit_rename(state, dialog)
    } else {
        Some(dialog)
    };
}

/// Apply a submitted rename. Returns the prompt again when the rename
/// failed so the name can be corrected after the error is dismissed.
fn submit_rename(state: &mut AppState, dialog: RenameDialog) -> Option<RenameDialog> {
    match state.rename(&dialog.path, &dialog.new_name) {
        Ok(_) => None,
        Err(e) => {
            debug!("Rename of {} rejected: {e}", dialog.path.display());
            Some(dialog)
        }
    }
}

fn error_dialog(ctx: &Context, owner: Id, state: &mut AppState) {
    let Some(message) = state.error_message.clone() else {
        return;
    };

    let mut dismissed = false;
    egui::Window::new("Error")
        .id(owner.with("error"))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(format!("⚠ {message}")).color(ui.visuals().warn_fg_color));
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });

    if dismissed {
        state.error_message = None;
    }
}
