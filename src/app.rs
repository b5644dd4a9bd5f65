use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct ViewerApp {
    pub state: AppState,
}

impl ViewerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl ViewerApp {
    /// Lay out the three panels for one pass.
    fn show(&mut self, ctx: &egui::Context) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Bottom panel: live preview of the selection ----
        egui::TopBottomPanel::bottom("selection_preview")
            .resizable(true)
            .default_height(180.0)
            .show(ctx, |ui| {
                panels::preview_panel(ui, &self.state);
            });

        // ---- Central panel: the grid ----
        let clicked = egui::CentralPanel::default()
            .show(ctx, |ui| table::selectable_table(ui, &self.state.view))
            .inner;

        if let Some(row) = clicked {
            self.apply_click(ctx, row);
        }
    }

    /// Toggle `row` and throw away the current pass, which was laid out
    /// with the previous selection. egui re-runs the frame without input.
    fn apply_click(&mut self, ctx: &egui::Context, row: usize) {
        self.state.click_row(row);
        ctx.request_discard("selection changed");
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.show(ctx);
    }
}
