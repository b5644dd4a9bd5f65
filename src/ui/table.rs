use eframe::egui::{self, Align, Label, Layout, RichText, Sense, TextStyle, Ui};
use egui_extras::{Column, TableBuilder};

use crate::selection::TableView;

// ---------------------------------------------------------------------------
// Selectable grid (central panel)
// ---------------------------------------------------------------------------

/// Draw every row and column of the view's dataset. Selected rows are
/// highlighted. Returns the row clicked this frame, if any; the caller
/// applies it through [`TableView::click_row`].
///
/// Rows are drawn in dataset order, so the returned index is both the
/// display position and the dataset position.
pub fn selectable_table(ui: &mut Ui, view: &TableView) -> Option<usize> {
    let dataset = view.dataset();
    let columns = dataset.columns();

    if columns.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("The dataset has no columns.");
        });
        return None;
    }

    let row_height = TextStyle::Body
        .resolve(ui.style())
        .size
        .max(ui.spacing().interact_size.y);
    let mut clicked = None;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .sense(Sense::click())
        .cell_layout(Layout::left_to_right(Align::Center))
        .column(Column::auto().at_least(36.0))
        .columns(Column::initial(140.0).at_least(40.0).clip(true), columns.len())
        .min_scrolled_height(0.0)
        .header(22.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            for col in columns {
                header.col(|ui| {
                    ui.strong(&col.name);
                });
            }
        })
        .body(|body| {
            body.rows(row_height, dataset.len(), |mut row| {
                let idx = row.index();
                row.set_selected(view.is_selected(idx));

                row.col(|ui| {
                    ui.add(Label::new(RichText::new(idx.to_string()).weak()).selectable(false));
                });
                for col in columns {
                    let value = &col.values[idx];
                    row.col(|ui| {
                        // Non-selectable so the click reaches the row.
                        let label = Label::new(value.to_string()).selectable(false);
                        if value.is_numeric() {
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                                ui.add(label);
                            });
                        } else {
                            ui.add(label);
                        }
                    });
                }

                if row.response().clicked() {
                    clicked = Some(idx);
                }
            });
        });

    if dataset.is_empty() {
        ui.label(RichText::new("No rows.").italics());
    }

    clicked
}
