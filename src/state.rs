use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::filter::{EmptyResult, FilterSelection};
use crate::data::loader::{DatasetCache, LoadError};
use crate::data::model::{Dimension, SalesDataset};
use crate::data::report::{build_report, DashboardReport};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Every dataset opened so far, by path.
    pub cache: DatasetCache,

    /// Currently displayed dataset (None until a load succeeds).
    pub dataset: Option<Arc<SalesDataset>>,

    /// Path the current dataset came from.
    pub dataset_path: Option<PathBuf>,

    /// Current filter control values.
    pub selection: FilterSelection,

    /// Output of the last pipeline run; `Err` when nothing matched.
    pub report: Option<Result<DashboardReport, EmptyResult>>,

    /// Colours of the state pie chart, rebuilt with the report.
    pub state_colors: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load (or fetch from cache) the dataset at `path` and show it.
    pub fn open(&mut self, path: &Path) -> Result<(), LoadError> {
        match self.cache.get_or_load(path) {
            Ok(dataset) => {
                log::debug!("{} dataset(s) cached", self.cache.len());
                self.set_dataset(dataset, path.to_path_buf());
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
                Err(e)
            }
        }
    }

    /// Ingest a dataset, reset filters to their defaults, and rebuild.
    pub fn set_dataset(&mut self, dataset: Arc<SalesDataset>, path: PathBuf) {
        if dataset.is_empty() {
            log::warn!("{} has no records", path.display());
        }
        self.selection = FilterSelection::initial(&dataset);
        self.dataset = Some(dataset);
        self.dataset_path = Some(path);
        self.status_message = None;
        self.refilter();
    }

    /// Re-run filter and aggregation for the current selection.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            self.report = None;
            self.state_colors = None;
            return;
        };
        let report = build_report(ds, &self.selection);
        self.state_colors = report.as_ref().ok().map(|r| {
            ColorMap::new(r.totals.by_state.iter().map(|(s, _)| s.as_str()))
        });
        self.report = Some(report);
    }

    /// Number of rows passing the current filters.
    pub fn visible_rows(&self) -> usize {
        match &self.report {
            Some(Ok(report)) => report.view.len(),
            _ => 0,
        }
    }

    /// Toggle a single value of a multi-select dimension.
    pub fn toggle_filter_value(&mut self, dim: Dimension, value: &str) {
        self.selection.toggle(dim, value);
        self.refilter();
    }

    /// Pick the one accepted value of a single-select dimension.
    pub fn select_single(&mut self, dim: Dimension, value: &str) {
        self.selection.set_single(dim, value);
        self.refilter();
    }

    /// Select all values in a dimension.
    pub fn select_all(&mut self, dim: Dimension) {
        if let Some(ds) = &self.dataset {
            let all = ds.unique_values(dim).to_vec();
            self.selection.set_values(dim, all);
            self.refilter();
        }
    }

    /// Deselect all values in a dimension.
    pub fn select_none(&mut self, dim: Dimension) {
        self.selection.set_values(dim, Vec::<String>::new());
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
Product,Retailer,Region,SalesMethod,City,State,PriceperUnit,UnitsSold,TotalSales,OperatingMargin,OperatingExpenses
A,Walmart,West,Online,Seattle,Washington,10,5,50,40,20
B,Walmart,West,Online,Portland,Oregon,20,8,160,30,50
A,Amazon,West,Online,Seattle,Washington,10,2,20,40,8
";

    fn loaded_state() -> (tempfile::NamedTempFile, AppState) {
        let file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        std::fs::write(file.path(), CSV).unwrap();
        let mut state = AppState::default();
        state.open(file.path()).unwrap();
        (file, state)
    }

    #[test]
    fn opening_builds_initial_report() {
        let (_file, state) = loaded_state();
        // Defaults: every product, first retailer (Walmart).
        assert_eq!(state.visible_rows(), 2);
        let report = state.report.as_ref().unwrap().as_ref().unwrap();
        assert_eq!(report.metrics.unit_count, 2);
        let colors = state.state_colors.as_ref().unwrap();
        assert_eq!(colors.legend_entries().len(), 2);
    }

    #[test]
    fn deselecting_every_product_shows_no_data() {
        let (_file, mut state) = loaded_state();
        state.select_none(Dimension::Product);
        assert!(matches!(state.report, Some(Err(EmptyResult))));
        assert!(state.state_colors.is_none());
        assert_eq!(state.visible_rows(), 0);

        state.select_all(Dimension::Product);
        assert_eq!(state.visible_rows(), 2);
    }

    #[test]
    fn controls_rebuild_the_report() {
        let (_file, mut state) = loaded_state();
        state.select_single(Dimension::Retailer, "Amazon");
        assert_eq!(state.visible_rows(), 1);

        state.select_single(Dimension::Retailer, "Walmart");
        state.toggle_filter_value(Dimension::Product, "B");
        let report = state.report.as_ref().unwrap().as_ref().unwrap();
        assert_eq!(report.totals.by_city, vec![("Seattle".to_string(), 5)]);
    }

    #[test]
    fn failed_open_keeps_previous_dataset() {
        let (_file, mut state) = loaded_state();
        let dir = tempfile::tempdir().unwrap();
        assert!(state.open(&dir.path().join("missing.csv")).is_err());
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
        assert_eq!(state.dataset.as_ref().unwrap().len(), 3);
    }

    #[test]
    fn reopening_uses_the_cache() {
        let (file, mut state) = loaded_state();
        let first = Arc::clone(state.dataset.as_ref().unwrap());
        state.open(file.path()).unwrap();
        assert!(Arc::ptr_eq(&first, state.dataset.as_ref().unwrap()));
        assert_eq!(state.cache.len(), 1);
    }

    #[test]
    fn header_only_file_opens_with_no_data() {
        let file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        let header = CSV.lines().next().unwrap();
        std::fs::write(file.path(), format!("{header}\n")).unwrap();

        let mut state = AppState::default();
        state.open(file.path()).unwrap();
        assert!(state.dataset.as_ref().unwrap().is_empty());
        assert!(matches!(state.report, Some(Err(EmptyResult))));
        assert!(state.state_colors.is_none());
    }
}
