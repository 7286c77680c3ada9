use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::FilteredView;
use crate::data::model::REQUIRED_COLUMNS;

const ROW_HEIGHT: f32 = 18.0;
const MAX_TABLE_HEIGHT: f32 = 420.0;

/// The filtered rows, one table row per record, in dataset order.
pub fn records_table(ui: &mut Ui, view: &FilteredView) {
    ui.strong(format!("{} matching records", view.len()));

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(40.0))
        .columns(Column::auto().at_least(70.0), REQUIRED_COLUMNS.len())
        .max_scroll_height(MAX_TABLE_HEIGHT)
        .header(ROW_HEIGHT + 4.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            for name in REQUIRED_COLUMNS {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            let indices = view.indices();
            body.rows(ROW_HEIGHT, view.len(), |mut row| {
                let Some(record) = view.record(row.index()) else {
                    return;
                };
                // Position in the loaded file, so gaps show what was filtered out.
                let source_row = indices[row.index()];
                row.col(|ui| {
                    ui.label(source_row.to_string());
                });
                for column in 0..REQUIRED_COLUMNS.len() {
                    row.col(|ui| {
                        ui.label(record.cell_text(column));
                    });
                }
            });
        });
}
