use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Bottom panel – live selection preview
// ---------------------------------------------------------------------------

/// Render the text dump of the selected rows.
pub fn preview_panel(ui: &mut Ui, state: &AppState) {
    let n_selected = state.view.selection().len();
    let n_total = state.view.dataset().len();
    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Selection");
        ui.label(format!("({n_selected}/{n_total})"));
    });
    ui.separator();

    ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let text = state.preview.borrow();
            ui.add(egui::Label::new(RichText::new(text.as_str()).monospace()).extend());
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
            let can_export = !state.view.selection().is_empty();
            if ui
                .add_enabled(can_export, egui::Button::new("Export selection…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let ds = state.view.dataset();
        ui.label(format!(
            "{} rows × {} columns, {} selected",
            ds.len(),
            ds.columns().len(),
            state.view.selection().len()
        ));

        ui.separator();
        ui.label(RichText::new(&state.location).weak());

        if let Some(msg) = &state.status_message {
            ui.separator();
            let text = RichText::new(msg);
            ui.label(if state.status_is_error {
                text.color(Color32::RED)
            } else {
                text
            });
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export selected rows")
        .set_file_name("seleccion.csv")
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        state.export_selection(&path);
    }
}
