use std::f32::consts::TAU;

use eframe::egui::{self, Color32, Pos2, RichText, Sense, Shape, Stroke, Ui};
use egui_plot::{Bar, BarChart, Plot};

use crate::color::{ColorMap, CITY_BARS, PRODUCT_BARS};
use crate::data::grouping::{GroupedTotals, Series};

const CHART_HEIGHT: f32 = 260.0;
const PIE_RADIUS: f32 = 110.0;

// ---------------------------------------------------------------------------
// Units-sold charts (central panel)
// ---------------------------------------------------------------------------

/// Render the three units-sold charts.
pub fn units_charts(ui: &mut Ui, totals: &GroupedTotals, state_colors: Option<&ColorMap>) {
    ui.strong("Units Sold per City");
    horizontal_bars(ui, "units_per_city", "City", &totals.by_city, CITY_BARS);
    ui.add_space(8.0);

    ui.strong("Units Sold per Product");
    horizontal_bars(ui, "units_per_product", "Product", &totals.by_product, PRODUCT_BARS);
    ui.add_space(8.0);

    ui.strong("Total Units Sold per State");
    if let Some(colors) = state_colors {
        state_pie(ui, &totals.by_state, colors);
    }
}

/// One bar per category, categories on the y axis.
fn horizontal_bars(ui: &mut Ui, id: &str, axis: &str, series: &Series, color: Color32) {
    let bars: Vec<Bar> = series
        .iter()
        .enumerate()
        .map(|(i, (label, units))| Bar::new(i as f64, *units as f64).name(label).width(0.7))
        .collect();
    let chart = BarChart::new(bars).horizontal().color(color);

    let labels: Vec<String> = series.iter().map(|(label, _)| label.clone()).collect();
    let height = CHART_HEIGHT.max(22.0 * labels.len() as f32);

    Plot::new(id)
        .height(height)
        .x_axis_label("Total Units Sold")
        .y_axis_label(axis)
        .y_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show_grid([false, true])
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| plot_ui.bar_chart(chart));
}

/// Axis text for a bar position; blank between bars.
fn category_label(labels: &[String], position: f64) -> String {
    let rounded = position.round();
    if (position - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels
        .get(rounded as usize)
        .cloned()
        .unwrap_or_default()
}

/// Pie of each state's share of units, with a legend.
fn state_pie(ui: &mut Ui, series: &Series, colors: &ColorMap) {
    let total: u64 = series.iter().map(|(_, units)| units).sum();
    if total == 0 {
        ui.label("No units sold in the current selection.");
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        let (response, painter) =
            ui.allocate_painter(egui::vec2(PIE_RADIUS * 2.0, PIE_RADIUS * 2.0), Sense::hover());
        let center = response.rect.center();

        let mut start = 0.0_f32;
        for (state, units) in series {
            let sweep = *units as f32 / total as f32 * TAU;
            for points in sector_points(center, PIE_RADIUS, start, sweep) {
                painter.add(Shape::convex_polygon(points, colors.color_for(state), Stroke::NONE));
            }
            start += sweep;
        }

        ui.vertical(|ui: &mut Ui| {
            ui.strong("States");
            // The map was built from this series, so entries line up with it.
            for ((state, color), (_, units)) in colors.legend_entries().into_iter().zip(series) {
                let share = *units as f64 / total as f64 * 100.0;
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(RichText::new("■").color(color));
                    ui.label(format!("{state}: {units} ({share:.1}%)"));
                });
            }
        });
    });
}

/// Split a slice into convex pieces of at most 45°, each a fan from `center`.
fn sector_points(center: Pos2, radius: f32, start: f32, sweep: f32) -> Vec<Vec<Pos2>> {
    const MAX_PIECE: f32 = TAU / 8.0;
    const STEPS_PER_PIECE: usize = 8;

    let pieces = (sweep / MAX_PIECE).ceil().max(1.0) as usize;
    let piece_sweep = sweep / pieces as f32;

    (0..pieces)
        .map(|p| {
            let from = start + p as f32 * piece_sweep;
            let mut points = Vec::with_capacity(STEPS_PER_PIECE + 2);
            points.push(center);
            for s in 0..=STEPS_PER_PIECE {
                // Start at 12 o'clock and go clockwise.
                let angle = from + piece_sweep * s as f32 / STEPS_PER_PIECE as f32 - TAU / 4.0;
                points.push(center + radius * egui::vec2(angle.cos(), angle.sin()));
            }
            points
        })
        .collect()
}
