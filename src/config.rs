use std::ffi::OsString;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Startup configuration
// ---------------------------------------------------------------------------

/// File the dashboard opens when no path is given.
pub const DEFAULT_DATASET: &str = "Adidas.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Dataset opened at startup.
    pub dataset_path: PathBuf,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET),
            window_size: [1400.0, 900.0],
            min_window_size: [800.0, 500.0],
        }
    }
}

impl DashboardConfig {
    /// Build from process arguments (including the program name).
    /// The only argument understood is an optional dataset path.
    pub fn from_args<I>(args: I) -> Self
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut config = Self::default();
        let mut args = args.into_iter().skip(1);
        if let Some(path) = args.next() {
            config.dataset_path = PathBuf::from(path);
        }
        if args.next().is_some() {
            log::warn!("Ignoring extra command-line arguments after the dataset path");
        }
        config
    }
}
