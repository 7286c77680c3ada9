use eframe::egui::{self, RichText, Ui};

use crate::data::metrics::MetricsSummary;

/// The five KPI cards across the top of the central panel.
pub fn metric_cards(ui: &mut Ui, metrics: &MetricsSummary) {
    let cards = [
        ("Average Price", metrics.average_price_text()),
        ("No of Units Sold", metrics.unit_count_text()),
        ("Total Sales", metrics.total_sales_text()),
        ("Sales Margin", metrics.operating_margin_text()),
        ("Operating Expenses", metrics.operating_expenses_text()),
    ];

    ui.columns(cards.len(), |columns| {
        for (col, (title, value)) in columns.iter_mut().zip(cards) {
            egui::Frame::group(col.style()).show(col, |ui: &mut Ui| {
                ui.set_min_width(ui.available_width());
                ui.label(RichText::new(title).strong());
                ui.label(RichText::new(value).size(15.0));
            });
        }
    });
}
