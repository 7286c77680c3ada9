use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use thiserror::Error;

use super::model::{Dimension, Record, SalesDataset, SelectionMode};

// ---------------------------------------------------------------------------
// Filter predicate: which values are accepted per dimension
// ---------------------------------------------------------------------------

/// Accepted values per dimension.
///
/// * A dimension absent from the selection → no constraint
/// * A dimension present with an empty set → nothing matches
/// * Otherwise the record's value must be a member of the set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    accepted: BTreeMap<Dimension, BTreeSet<String>>,
}

impl FilterSelection {
    /// An unconstrained selection (matches every record).
    pub fn new() -> Self {
        Self::default()
    }

    /// The selection the dashboard opens with: every product, and the first
    /// value (in file order) of each single-select dimension.
    pub fn initial(dataset: &SalesDataset) -> Self {
        let mut selection = Self::new();
        for dim in Dimension::FILTERABLE {
            let values = dataset.unique_values(dim);
            match dim.selection_mode() {
                SelectionMode::Multi => {
                    selection = selection.with_values(dim, values.iter().cloned());
                }
                SelectionMode::Single => {
                    if let Some(first) = values.first() {
                        selection.set_single(dim, first.clone());
                    }
                }
            }
        }
        selection
    }

    /// Builder form of [`FilterSelection::set_values`].
    pub fn with_values<I, S>(mut self, dim: Dimension, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_values(dim, values);
        self
    }

    /// Replace the accepted set for `dim`.
    pub fn set_values<I, S>(&mut self, dim: Dimension, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accepted
            .insert(dim, values.into_iter().map(Into::into).collect());
    }

    /// Accept exactly one value for `dim`.
    pub fn set_single(&mut self, dim: Dimension, value: impl Into<String>) {
        self.set_values(dim, [value.into()]);
    }

    /// Add or remove one value from `dim`'s set.
    pub fn toggle(&mut self, dim: Dimension, value: &str) {
        let set = self.accepted.entry(dim).or_default();
        if !set.remove(value) {
            set.insert(value.to_string());
        }
    }

    /// Accepted set for `dim`; `None` if unconstrained.
    pub fn values(&self, dim: Dimension) -> Option<&BTreeSet<String>> {
        self.accepted.get(&dim)
    }

    pub fn is_selected(&self, dim: Dimension, value: &str) -> bool {
        self.accepted
            .get(&dim)
            .map_or(true, |set| set.contains(value))
    }

    /// AND across dimensions, OR within one dimension's set.
    pub fn matches(&self, record: &Record) -> bool {
        self.accepted
            .iter()
            .all(|(dim, set)| set.contains(record.category(*dim)))
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// The selection matched no records; aggregation must not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No data available based on the current filter setting")]
pub struct EmptyResult;

/// A non-empty, order-preserving subset of a dataset.
///
/// Only [`apply`] builds one, so holding a `FilteredView` proves there is at
/// least one row to aggregate.
#[derive(Debug, Clone)]
pub struct FilteredView {
    dataset: Arc<SalesDataset>,
    indices: Vec<usize>,
}

impl FilteredView {
    /// Dataset positions of the matching rows, ascending.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> + '_ {
        let all = self.dataset.records();
        self.indices.iter().map(move |&i| &all[i])
    }

    pub fn record(&self, row: usize) -> Option<&Record> {
        self.indices
            .get(row)
            .map(|&i| &self.dataset.records()[i])
    }

    /// Always at least 1.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn dataset(&self) -> &Arc<SalesDataset> {
        &self.dataset
    }
}

/// Select the records matching `selection`, keeping dataset order.
pub fn apply(
    dataset: &Arc<SalesDataset>,
    selection: &FilterSelection,
) -> Result<FilteredView, EmptyResult> {
    let indices: Vec<usize> = dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| selection.matches(rec))
        .map(|(i, _)| i)
        .collect();

    if indices.is_empty() {
        return Err(EmptyResult);
    }
    Ok(FilteredView {
        dataset: Arc::clone(dataset),
        indices,
    })
}
