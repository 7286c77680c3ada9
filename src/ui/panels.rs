use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::{Dimension, SelectionMode};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Please Filter Here");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for dim in Dimension::FILTERABLE {
                let all_values = dataset.unique_values(dim);
                match dim.selection_mode() {
                    SelectionMode::Multi => multi_select(ui, state, dim, all_values),
                    SelectionMode::Single => single_select(ui, state, dim, all_values),
                }
                ui.add_space(6.0);
            }
        });
}

/// Checkbox list with All / None shortcuts.
fn multi_select(ui: &mut Ui, state: &mut AppState, dim: Dimension, all_values: &[String]) {
    let n_selected = all_values
        .iter()
        .filter(|v| state.selection.is_selected(dim, v))
        .count();
    let header_text = format!("Select the {dim}  ({n_selected}/{})", all_values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(dim.column_name())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(dim);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(dim);
                }
            });

            for val in all_values {
                let mut checked = state.selection.is_selected(dim, val);
                if ui.checkbox(&mut checked, val.as_str()).changed() {
                    state.toggle_filter_value(dim, val);
                }
            }
        });
}

/// Radio group accepting exactly one value.
fn single_select(ui: &mut Ui, state: &mut AppState, dim: Dimension, all_values: &[String]) {
    ui.strong(format!("Select the {dim}"));
    let current = state
        .selection
        .values(dim)
        .and_then(|set| set.iter().next().cloned());

    for val in all_values {
        if ui
            .radio(current.as_deref() == Some(val.as_str()), val.as_str())
            .clicked()
        {
            state.select_single(dim, val);
        }
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
        });

        ui.separator();

        if let (Some(ds), Some(path)) = (&state.dataset, &state.dataset_path) {
            ui.label(format!(
                "{}: {} records loaded, {} visible",
                path.display(),
                ds.len(),
                state.visible_rows()
            ));
        }

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
        .set_title("Open sales data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        // Errors are logged and surfaced in the status line by `open`.
        let _ = state.open(&path);
    }
}
