/// Results table: one row per entry, sortable by Type / Name / Size.
///
/// The body only reads state; clicks are collected into a [`TableAction`]
/// and applied after the table has been laid out.
use crate::state::{AppState, RenameDialog};
use egui::Ui;
use egui_extras::{Column, TableBuilder};
use std::path::PathBuf;
use weightchecker_core::model::SortKey;

const ROW_HEIGHT: f32 = 22.0;
const HEADER_HEIGHT: f32 = 24.0;

/// What the user did to the table this frame.
enum TableAction {
    Sort(SortKey),
    Select(PathBuf),
    OpenSubwindow(PathBuf),
    Reveal(PathBuf),
    Rename(PathBuf),
    Delete(PathBuf),
}

/// Draw the entry table.
pub fn entry_table(ui: &mut Ui, state: &mut AppState) {
    if state.entries.is_empty() {
        let text = if state.is_scanning() {
            "Waiting for scan results…"
        } else {
            "No entries."
        };
        ui.centered_and_justified(|ui| {
            ui.label(egui::RichText::new(text).color(ui.visuals().weak_text_color()));
        });
        return;
    }

    let mut action: Option<TableAction> = None;
    let color_weak = ui.visuals().weak_text_color();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .sense(egui::Sense::click())
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::exact(90.0))
        .column(Column::remainder().at_least(200.0).clip(true))
        .column(Column::exact(110.0))
        .header(HEADER_HEIGHT, |mut header| {
            for key in [SortKey::Kind, SortKey::Name, SortKey::Size] {
                header.col(|ui| {
                    let label = format!("{}{}", key.label(), state.sort_arrow(key));
                    if ui
                        .add(egui::Button::new(egui::RichText::new(label).strong()).frame(false))
                        .clicked()
                    {
                        action = Some(TableAction::Sort(key));
                    }
                });
            }
        })
        .body(|body| {
            let rows: Vec<_> = state.display_rows().collect();
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let data = &rows[row.index()];
                let path = data.absolute_path;
                row.set_selected(state.selected.as_deref() == Some(path));

                row.col(|ui| {
                    ui.label(egui::RichText::new(data.kind).color(color_weak));
                });
                row.col(|ui| {
                    ui.label(data.display_name);
                });
                row.col(|ui| {
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(data.human_size.as_str());
                    });
                });

                let response = row.response();
                if response.clicked() {
                    action = Some(TableAction::Select(path.to_path_buf()));
                }
                if response.double_clicked() && data.is_dir {
                    action = Some(TableAction::OpenSubwindow(path.to_path_buf()));
                }
                response
                    .on_hover_text(path.display().to_string())
                    .context_menu(|ui| {
                        if ui.button("📂 Reveal in file manager").clicked() {
                            action = Some(TableAction::Reveal(path.to_path_buf()));
                            ui.close_menu();
                        }
                        if ui.button("✏ Rename…").clicked() {
                            action = Some(TableAction::Rename(path.to_path_buf()));
                            ui.close_menu();
                        }
                        if ui.button("🗑 Delete…").clicked() {
                            action = Some(TableAction::Delete(path.to_path_buf()));
                            ui.close_menu();
                        }
                    });
            });
        });

    match action {
        Some(TableAction::Sort(key)) => state.sort_by(key),
        Some(TableAction::Select(path)) => state.selected = Some(path),
        Some(TableAction::OpenSubwindow(path)) => state.request_subwindow(&path),
        Some(TableAction::Reveal(path)) => state.reveal(&path),
        Some(TableAction::Rename(path)) => {
            let new_name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            state.rename_dialog = Some(RenameDialog { path, new_name });
        }
        Some(TableAction::Delete(path)) => state.pending_delete = Some(path),
        None => {}
    }
}
