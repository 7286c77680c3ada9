use std::collections::BTreeMap;

use super::filter::FilteredView;
use super::model::Dimension;

// ---------------------------------------------------------------------------
// Units sold per category, for the charts
// ---------------------------------------------------------------------------

/// One chart series: `(category value, total units sold)`.
pub type Series = Vec<(String, u64)>;

/// The three chart-ready groupings of a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedTotals {
    /// Ascending by units.
    pub by_city: Series,
    /// Ascending by units.
    pub by_product: Series,
    /// Proportions only; no ordering promised.
    pub by_state: Series,
}

impl GroupedTotals {
    pub fn from_view(view: &FilteredView) -> Self {
        GroupedTotals {
            by_city: by_city(view),
            by_product: by_product(view),
            by_state: by_state(view),
        }
    }
}

/// Sum `units_sold` per distinct value of `dim`, in key order.
///
/// Keys are compared as exact strings: case or whitespace variants of a
/// value form separate groups.
pub fn units_by(view: &FilteredView, dim: Dimension) -> Series {
    let mut groups: BTreeMap<&str, u64> = BTreeMap::new();
    for rec in view.records() {
        *groups.entry(rec.category(dim)).or_default() += rec.units_sold;
    }
    groups
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

/// Same as [`units_by`], then stably sorted ascending by total.
fn units_by_ascending(view: &FilteredView, dim: Dimension) -> Series {
    let mut series = units_by(view, dim);
    series.sort_by_key(|(_, units)| *units);
    series
}

pub fn by_city(view: &FilteredView) -> Series {
    units_by_ascending(view, Dimension::City)
}

pub fn by_product(view: &FilteredView) -> Series {
    units_by_ascending(view, Dimension::Product)
}

pub fn by_state(view: &FilteredView) -> Series {
    units_by(view, Dimension::State)
}
