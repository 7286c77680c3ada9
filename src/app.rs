use eframe::egui;

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{charts, panels, summary, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SalesDashboardApp {
    pub state: AppState,
}

impl SalesDashboardApp {
    /// Create the app and try the configured dataset. A failed load leaves
    /// the window usable, with the error in the top bar.
    pub fn new(config: &DashboardConfig) -> Self {
        let mut state = AppState::default();
        if state.open(&config.dataset_path).is_err() {
            log::warn!("Starting without data; use File → Open… to pick a dataset");
        }
        Self { state }
    }
}

impl eframe::App for SalesDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPIs, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let report = match &self.state.report {
                None => {
                    ui.centered_and_justified(|ui| {
                        ui.heading("Open a sales file to begin  (File → Open…)");
                    });
                    return;
                }
                Some(Err(empty)) => {
                    ui.colored_label(egui::Color32::from_rgb(0xd9, 0x8e, 0x04), empty.to_string());
                    return;
                }
                Some(Ok(report)) => report,
            };

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.heading("Sales Dashboard");
                    ui.add_space(8.0);
                    summary::metric_cards(ui, &report.metrics);
                    ui.separator();
                    charts::units_charts(ui, &report.totals, self.state.state_colors.as_ref());
                    ui.separator();
                    table::records_table(ui, &report.view);
                });
        });
    }
}
