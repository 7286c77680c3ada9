use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Dimension – a categorical column of the sales table
// ---------------------------------------------------------------------------

/// Typed name of a categorical field, used instead of column-name strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    Product,
    Retailer,
    Region,
    SalesMethod,
    City,
    State,
}

/// How the side panel lets the user pick values for a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Any number of values (checkbox list).
    Multi,
    /// Exactly one value (radio group).
    Single,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Product,
        Dimension::Retailer,
        Dimension::Region,
        Dimension::SalesMethod,
        Dimension::City,
        Dimension::State,
    ];

    /// Dimensions exposed as filter controls, in side panel order.
    pub const FILTERABLE: [Dimension; 4] = [
        Dimension::Product,
        Dimension::Retailer,
        Dimension::Region,
        Dimension::SalesMethod,
    ];

    /// Column header in the source file.
    pub fn column_name(self) -> &'static str {
        match self {
            Dimension::Product => "Product",
            Dimension::Retailer => "Retailer",
            Dimension::Region => "Region",
            Dimension::SalesMethod => "SalesMethod",
            Dimension::City => "City",
            Dimension::State => "State",
        }
    }

    /// Human-readable label for filter headings.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::SalesMethod => "Sales Method",
            other => other.column_name(),
        }
    }

    pub fn selection_mode(self) -> SelectionMode {
        match self {
            Dimension::Product => SelectionMode::Multi,
            _ => SelectionMode::Single,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the sales table
// ---------------------------------------------------------------------------

/// Every column the input file must provide, in display order.
pub const REQUIRED_COLUMNS: [&str; 11] = [
    "Product",
    "Retailer",
    "Region",
    "SalesMethod",
    "City",
    "State",
    "PriceperUnit",
    "UnitsSold",
    "TotalSales",
    "OperatingMargin",
    "OperatingExpenses",
];

/// A single sales transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Product")]
    pub product: String,
    #[serde(rename = "Retailer")]
    pub retailer: String,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "SalesMethod")]
    pub sales_method: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "PriceperUnit")]
    pub price_per_unit: f64,
    #[serde(rename = "UnitsSold")]
    pub units_sold: u64,
    #[serde(rename = "TotalSales")]
    pub total_sales: f64,
    /// Percentage in `0..=100`.
    #[serde(rename = "OperatingMargin")]
    pub operating_margin: f64,
    #[serde(rename = "OperatingExpenses")]
    pub operating_expenses: f64,
}

impl Record {
    /// Value of a categorical field.
    pub fn category(&self, dim: Dimension) -> &str {
        match dim {
            Dimension::Product => &self.product,
            Dimension::Retailer => &self.retailer,
            Dimension::Region => &self.region,
            Dimension::SalesMethod => &self.sales_method,
            Dimension::City => &self.city,
            Dimension::State => &self.state,
        }
    }

    /// Check that every field is populated and in range.
    ///
    /// Absent or nonsensical values are rejected rather than coerced, since a
    /// zero would silently skew the means and sums downstream.
    pub fn validate(&self) -> Result<(), String> {
        for dim in Dimension::ALL {
            if self.category(dim).trim().is_empty() {
                return Err(format!("'{}' is empty", dim.column_name()));
            }
        }

        let numeric = [
            ("PriceperUnit", self.price_per_unit),
            ("TotalSales", self.total_sales),
            ("OperatingMargin", self.operating_margin),
            ("OperatingExpenses", self.operating_expenses),
        ];
        for (col, value) in numeric {
            if !value.is_finite() {
                return Err(format!("'{col}' is not a finite number"));
            }
        }

        if self.total_sales < 0.0 {
            return Err(format!("'TotalSales' is negative ({})", self.total_sales));
        }
        if self.operating_expenses < 0.0 {
            return Err(format!(
                "'OperatingExpenses' is negative ({})",
                self.operating_expenses
            ));
        }
        if !(0.0..=100.0).contains(&self.operating_margin) {
            return Err(format!(
                "'OperatingMargin' {} is outside 0..=100",
                self.operating_margin
            ));
        }
        Ok(())
    }

    /// Cell text for the given column index of [`REQUIRED_COLUMNS`].
    pub fn cell_text(&self, column: usize) -> String {
        match column {
            0..=5 => self.category(Dimension::ALL[column]).to_string(),
            6 => format!("{:.2}", self.price_per_unit),
            7 => self.units_sold.to_string(),
            8 => format!("{:.2}", self.total_sales),
            9 => format!("{:.2}", self.operating_margin),
            10 => format!("{:.2}", self.operating_expenses),
            _ => String::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// SalesDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The immutable loaded table plus the distinct values of each dimension.
#[derive(Debug, Clone)]
pub struct SalesDataset {
    records: Vec<Record>,
    /// Distinct values per dimension, in order of first appearance.
    unique_values: BTreeMap<Dimension, Vec<String>>,
}

impl SalesDataset {
    /// Build the per-dimension value index from validated records.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut unique_values: BTreeMap<Dimension, Vec<String>> = BTreeMap::new();
        for dim in Dimension::ALL {
            let values = unique_values.entry(dim).or_default();
            for rec in &records {
                let v = rec.category(dim);
                if !values.iter().any(|seen| seen == v) {
                    values.push(v.to_string());
                }
            }
        }
        SalesDataset {
            records,
            unique_values,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Distinct values of `dim`, first-appearance order.
    pub fn unique_values(&self, dim: Dimension) -> &[String] {
        self.unique_values
            .get(&dim)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
