use std::sync::Arc;

use super::filter::{apply, EmptyResult, FilterSelection, FilteredView};
use super::grouping::GroupedTotals;
use super::metrics::{summarize, MetricsSummary};
use super::model::SalesDataset;

/// Everything the presentation layer draws for one selection.
#[derive(Debug, Clone)]
pub struct DashboardReport {
    pub view: FilteredView,
    pub metrics: MetricsSummary,
    pub totals: GroupedTotals,
}

/// Run the whole pipeline for one selection.
///
/// An empty match short-circuits with [`EmptyResult`] before any
/// aggregation runs.
pub fn build_report(
    dataset: &Arc<SalesDataset>,
    selection: &FilterSelection,
) -> Result<DashboardReport, EmptyResult> {
    let view = apply(dataset, selection)?;
    let metrics = summarize(&view);
    let totals = GroupedTotals::from_view(&view);
    log::debug!(
        "Report rebuilt: {} of {} rows selected",
        view.len(),
        view.dataset().len()
    );
    Ok(DashboardReport {
        view,
        metrics,
        totals,
    })
}
