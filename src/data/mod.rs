/// Data layer: core types, loading, filtering, and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + validate file → SalesDataset (cached per path)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → FilteredView, or EmptyResult
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌──────────┐   ┌──────────┐
///   │ metrics   │   │ grouping  │  KPIs / units per city, product, state
///   └──────────┘   └──────────┘
///        │              │
///        └──── report ──┘          one DashboardReport per selection
/// ```

pub mod filter;
pub mod grouping;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod report;
