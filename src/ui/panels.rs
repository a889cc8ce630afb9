use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – one row per series
// ---------------------------------------------------------------------------

/// Render the left series panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Series");
    ui.separator();

    if state.model.series.is_empty() {
        ui.label("No series loaded.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.show_all();
        }
        if ui.small_button("None").clicked() {
            state.hide_all();
        }
        if ui.small_button("Reset view").clicked() {
            state.reset_view = true;
        }
    });
    ui.separator();

    let mut toggled = None;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (idx, series) in state.model.series.iter().enumerate() {
                let color = state.model.color_of(idx);
                ui.horizontal(|ui: &mut Ui| {
                    let mut checked = series.visible;
                    let text = RichText::new(&series.label).color(color).strong();
                    if ui.checkbox(&mut checked, text).changed() {
                        toggled = Some(idx);
                    }
                });

                let mut detail = format!("{} points", series.points.len());
                if series.dropped > 0 {
                    detail.push_str(&format!(", {} rows skipped", series.dropped));
                }
                ui.label(RichText::new(detail).small().weak());
            }
        });

    if let Some(idx) = toggled {
        state.toggle_series(idx);
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{}  ·  {} series, {} points",
            state.config.file_path.display(),
            state.model.series.len(),
            state.model.total_points()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open data file")
        .add_filter("Supported files", &["csv", "xls", "xlsx", "xlsm", "xlsb", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xls", "xlsx", "xlsm", "xlsb"])
        .pick_file();

    if let Some(path) = file {
        state.load_file(path);
    }
}
