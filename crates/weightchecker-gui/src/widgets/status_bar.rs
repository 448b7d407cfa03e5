/// Bottom status bar: status text, progress bar and counters.
use crate::state::AppState;
use egui::Ui;
use weightchecker_core::model::{format_count, format_size};

/// Draw the status bar at the bottom of a window.
pub fn status_bar(ui: &mut Ui, state: &AppState) {
    let color_weak = ui.visuals().weak_text_color();
    let color_normal = ui.visuals().text_color();

    ui.horizontal(|ui| {
        if state.is_scanning() {
            ui.spinner();
        }
        ui.label(
            egui::RichText::new(&state.status_text)
                .size(12.0)
                .color(color_normal),
        );

        if state.is_scanning() {
            ui.separator();
            let bar = match state.progress {
                Some(fraction) => egui::ProgressBar::new(fraction).show_percentage(),
                // Indeterminate: animate and show the running count instead.
                None => egui::ProgressBar::new(0.0)
                    .animate(true)
                    .text(format!("{} items", format_count(state.processed))),
            };
            ui.add(bar.desired_width(200.0));
        }

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if !state.entries.is_empty() {
                ui.label(
                    egui::RichText::new(format!("{} entries", format_count(state.entries.len() as u64)))
                        .size(12.0)
                        .color(color_weak),
                );
            }
            if let Some(ref selected) = state.selected {
                if let Some(entry) = state.entry(selected) {
                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!(
                            "{} — {}",
                            truncate_path(&selected.to_string_lossy(), 60),
                            format_size(entry.size)
                        ))
                        .size(12.0)
                        .color(color_weak),
                    );
                }
            }
        });
    });
}

/// Truncate a path string to fit within `max_len` characters,
/// replacing the middle with "..." if needed.
fn truncate_path(path: &str, max_len: usize) -> String {
    let chars: Vec<char> = path.chars().collect();
    if chars.len() <= max_len {
        return path.to_string();
    }
    let half = (max_len - 3) / 2;
    let head: String = chars[..half].iter().collect();
    let tail: String = chars[chars.len() - half..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_paths_are_untouched() {
        assert_eq!(truncate_path("/a/b", 60), "/a/b");
    }

    #[test]
    fn long_paths_keep_both_ends() {
        let long = format!("/start/{}/end.txt", "x".repeat(100));
        let out = truncate_path(&long, 21);
        assert_eq!(out.chars().count(), 21);
        assert!(out.starts_with("/start/"));
        assert!(out.ends_with("end.txt"));
    }

    #[test]
    fn multibyte_paths_do_not_panic() {
        let long = "ü".repeat(80);
        assert_eq!(truncate_path(&long, 10).chars().count(), 9);
    }
}
