use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type, UInt64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use thiserror::Error;

use super::model::{Record, SalesDataset, REQUIRED_COLUMNS};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a dataset could not be loaded. Fatal to that load; never retried.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("unreadable Arrow data: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    /// `row` is 1-based over data rows (the header is not counted).
    #[error("row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a sales dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the required column names
/// * `.json`    – `[{ "Product": "...", "UnitsSold": 10, ... }, ...]`
/// * `.parquet` – one column per required field (recommended for big files)
pub fn load_file(path: &Path) -> Result<SalesDataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    check_unit_total(&records)?;

    let dataset = SalesDataset::from_records(records);
    log::info!("Loaded {} sales records from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Loaded datasets keyed by path, kept for the lifetime of the owner.
///
/// The source file is treated as static, so entries are never invalidated.
#[derive(Debug, Default)]
pub struct DatasetCache {
    entries: HashMap<PathBuf, Arc<SalesDataset>>,
}

impl DatasetCache {
    /// Return the cached dataset for `path`, loading it on first use.
    /// Failed loads are not cached.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<SalesDataset>, LoadError> {
        if let Some(ds) = self.entries.get(path) {
            log::debug!("Dataset cache hit for {}", path.display());
            return Ok(Arc::clone(ds));
        }
        let ds = Arc::new(load_file(path)?);
        self.entries.insert(path.to_path_buf(), Arc::clone(&ds));
        Ok(ds)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Fail with every required column absent from `present`.
fn check_columns<'a>(present: impl IntoIterator<Item = &'a str>) -> Result<(), LoadError> {
    let present: Vec<&str> = present.into_iter().map(str::trim).collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !present.contains(col))
        .map(|col| col.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(LoadError::MissingColumns(missing))
    }
}

/// Fail if the units of all records together overflow `u64`. Every grouped
/// or filtered sum is bounded by this total, so aggregation cannot overflow.
fn check_unit_total(records: &[Record]) -> Result<(), LoadError> {
    let mut total: u64 = 0;
    for (i, rec) in records.iter().enumerate() {
        total = total
            .checked_add(rec.units_sold)
            .ok_or_else(|| LoadError::InvalidRecord {
                row: i + 1,
                reason: "total 'UnitsSold' over all rows does not fit in 64 bits".to_string(),
            })?;
    }
    Ok(())
}

fn validated(row: usize, record: Record) -> Result<Record, LoadError> {
    record
        .validate()
        .map_err(|reason| LoadError::InvalidRecord { row, reason })?;
    Ok(record)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with the required column names, in any order.
/// Extra columns are ignored; cells are trimmed.
fn load_csv(path: &Path) -> Result<Vec<Record>, LoadError> {
    read_csv(open(path)?)
}

fn read_csv<R: std::io::Read>(reader: R) -> Result<Vec<Record>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    check_columns(reader.headers()?.iter())?;

    let mut records = Vec::new();
    for (i, result) in reader.deserialize::<Record>().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| LoadError::InvalidRecord {
            row,
            reason: e.to_string(),
        })?;
        records.push(validated(row, record)?);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Product": "Men's Street Footwear", "Retailer": "Walmart", ..., "UnitsSold": 1220 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<Record>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_json(&text)
}

fn read_json(text: &str) -> Result<Vec<Record>, LoadError> {
    let rows: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(text)?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, obj) in rows.into_iter().enumerate() {
        let row = i + 1;
        check_columns(obj.keys().map(String::as_str))?;
        let record: Record = serde_json::from_value(serde_json::Value::Object(obj))
            .map_err(|e| LoadError::InvalidRecord {
                row,
                reason: e.to_string(),
            })?;
        records.push(validated(row, record)?);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per required field.
///
/// Categorical columns must be string typed; numeric columns may be any
/// integer or float type and are cast on read.  Works with files written by
/// both **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<Record>, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    check_columns(
        builder
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().as_str()),
    )?;
    let reader = builder.build()?;

    let mut records = Vec::new();
    for batch in reader {
        let batch = batch?;
        let offset = records.len();
        records.extend(records_from_batch(&batch, offset)?);
    }
    Ok(records)
}

/// Convert one record batch; `offset` is the number of rows already read.
fn records_from_batch(batch: &RecordBatch, offset: usize) -> Result<Vec<Record>, LoadError> {
    let text = |name: &str| column_as(batch, name, &DataType::Utf8);
    let float = |name: &str| column_as(batch, name, &DataType::Float64);

    let product = text("Product")?;
    let retailer = text("Retailer")?;
    let region = text("Region")?;
    let sales_method = text("SalesMethod")?;
    let city = text("City")?;
    let state = text("State")?;
    let price = float("PriceperUnit")?;
    let units = units_column(batch, offset)?;
    let total = float("TotalSales")?;
    let margin = float("OperatingMargin")?;
    let expenses = float("OperatingExpenses")?;

    let columns: [(&str, &ArrayRef); 11] = [
        ("Product", &product),
        ("Retailer", &retailer),
        ("Region", &region),
        ("SalesMethod", &sales_method),
        ("City", &city),
        ("State", &state),
        ("PriceperUnit", &price),
        ("UnitsSold", &units),
        ("TotalSales", &total),
        ("OperatingMargin", &margin),
        ("OperatingExpenses", &expenses),
    ];

    let s = |arr: &ArrayRef, i: usize| arr.as_string::<i32>().value(i).to_string();
    let f = |arr: &ArrayRef, i: usize| arr.as_primitive::<Float64Type>().value(i);

    let mut out = Vec::with_capacity(batch.num_rows());
    for i in 0..batch.num_rows() {
        let row = offset + i + 1;
        if let Some((name, _)) = columns.iter().find(|(_, arr)| arr.is_null(i)) {
            return Err(LoadError::InvalidRecord {
                row,
                reason: format!("'{name}' is null"),
            });
        }
        let record = Record {
            product: s(&product, i),
            retailer: s(&retailer, i),
            region: s(&region, i),
            sales_method: s(&sales_method, i),
            city: s(&city, i),
            state: s(&state, i),
            price_per_unit: f(&price, i),
            units_sold: units.as_primitive::<UInt64Type>().value(i),
            total_sales: f(&total, i),
            operating_margin: f(&margin, i),
            operating_expenses: f(&expenses, i),
        };
        out.push(validated(row, record)?);
    }
    Ok(out)
}

/// `UnitsSold` as `UInt64`, rejecting fractional or negative source values
/// that a plain cast would truncate or null out.
fn units_column(batch: &RecordBatch, offset: usize) -> Result<ArrayRef, LoadError> {
    let col = batch
        .column_by_name("UnitsSold")
        .ok_or_else(|| LoadError::MissingColumns(vec!["UnitsSold".to_string()]))?;
    let invalid = |i: usize, reason: String| LoadError::InvalidRecord {
        row: offset + i + 1,
        reason,
    };

    let dtype = col.data_type();
    if dtype.is_floating() {
        let values = cast(col, &DataType::Float64)?;
        for (i, v) in values.as_primitive::<Float64Type>().iter().enumerate() {
            let Some(v) = v else { continue };
            if !v.is_finite() || v.fract() != 0.0 {
                return Err(invalid(i, format!("'UnitsSold' {v} is not a whole number")));
            }
            if v < 0.0 {
                return Err(invalid(i, format!("'UnitsSold' {v} is negative")));
            }
            if v >= u64::MAX as f64 {
                return Err(invalid(i, format!("'UnitsSold' {v} is too large")));
            }
        }
    } else if dtype.is_signed_integer() {
        let values = cast(col, &DataType::Int64)?;
        for (i, v) in values.as_primitive::<Int64Type>().iter().enumerate() {
            if let Some(v) = v.filter(|v| *v < 0) {
                return Err(invalid(i, format!("'UnitsSold' {v} is negative")));
            }
        }
    }
    Ok(cast(col, &DataType::UInt64)?)
}

/// Fetch a column by name and cast it to `to`.
fn column_as(batch: &RecordBatch, name: &str, to: &DataType) -> Result<ArrayRef, LoadError> {
    let col = batch
        .column_by_name(name)
        .ok_or_else(|| LoadError::MissingColumns(vec![name.to_string()]))?;
    Ok(cast(col, to)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Dimension;

    use std::io::Write;

    use arrow::array::{Float64Array, Int64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use parquet::arrow::ArrowWriter;

    const HEADER: &str = "Product,Retailer,Region,SalesMethod,City,State,PriceperUnit,UnitsSold,TotalSales,OperatingMargin,OperatingExpenses";

    fn sample_csv() -> String {
        format!(
            "{HEADER}
Men's Street Footwear,Foot Locker,Northeast,In-store,New York,New York,50.0,1200,600000,50,300000
Women's Apparel,Walmart,South,Online,Houston,Texas,45.5,850,38675,35,13536.25
Men's Athletic Footwear,Amazon,West,Outlet,Seattle,Washington,40.0,600,24000,42.5,13800
"
        )
    }

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_csv_file() {
        let file = write_temp(".csv", &sample_csv());
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 3);
        let first = &ds.records()[0];
        assert_eq!(first.product, "Men's Street Footwear");
        assert_eq!(first.sales_method, "In-store");
        assert_eq!(first.units_sold, 1200);
        assert_eq!(first.total_sales, 600000.0);
        assert_eq!(ds.unique_values(Dimension::Region), ["Northeast", "South", "West"]);
    }

    #[test]
    fn csv_columns_may_be_reordered_and_extended() {
        let csv = "\
Invoice,UnitsSold,Product,Retailer,Region,SalesMethod,City,State,PriceperUnit,TotalSales,OperatingMargin,OperatingExpenses
INV-1,10,A,R,North,Online,X,S,1.5,15,10,2
";
        let records = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].units_sold, 10);
        assert_eq!(records[0].product, "A");
    }

    #[test]
    fn csv_missing_columns_are_reported() {
        let csv = "Product,Retailer,Region,City,State,PriceperUnit,UnitsSold,TotalSales\nA,R,N,X,S,1,1,1\n";
        match read_csv(csv.as_bytes()) {
            Err(LoadError::MissingColumns(cols)) => {
                assert_eq!(cols, ["SalesMethod", "OperatingMargin", "OperatingExpenses"]);
            }
            other => panic!("expected MissingColumns, got {other:?}"),
        }
    }

    #[test]
    fn csv_non_numeric_value_is_rejected() {
        let csv = format!("{HEADER}\nA,R,N,Online,X,S,abc,1,1,10,1\n");
        match read_csv(csv.as_bytes()) {
            Err(LoadError::InvalidRecord { row, .. }) => assert_eq!(row, 1),
            other => panic!("expected InvalidRecord, got {other:?}"),
        }
    }

    #[test]
    fn csv_empty_cell_is_rejected_not_zeroed() {
        let csv = format!(
            "{HEADER}\nA,R,N,Online,X,S,1,1,1,10,1\nA,R,N,Online,X,S,1,,1,10,1\n"
        );
        match read_csv(csv.as_bytes()) {
            Err(LoadError::InvalidRecord { row, .. }) => assert_eq!(row, 2),
            other => panic!("expected InvalidRecord, got {other:?}"),
        }

        let csv = format!("{HEADER}\nA,,N,Online,X,S,1,1,1,10,1\n");
        assert!(matches!(
            read_csv(csv.as_bytes()),
            Err(LoadError::InvalidRecord { row: 1, .. })
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("absent.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = write_temp(".xlsx", "");
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedExtension(ext) if ext == "xlsx"));
    }

    #[test]
    fn loads_json_records() {
        let json = r#"[
            {"Product": "A", "Retailer": "R", "Region": "N", "SalesMethod": "Online",
             "City": "X", "State": "S", "PriceperUnit": 2.5, "UnitsSold": 4,
             "TotalSales": 10.0, "OperatingMargin": 30, "OperatingExpenses": 3.0}
        ]"#;
        let file = write_temp(".json", json);
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].price_per_unit, 2.5);
    }

    #[test]
    fn json_missing_column_is_reported() {
        let json = r#"[{"Product": "A"}]"#;
        assert!(matches!(read_json(json), Err(LoadError::MissingColumns(_))));
    }

    fn write_parquet(units: Vec<Option<i64>>) -> tempfile::NamedTempFile {
        write_parquet_units(std::sync::Arc::new(Int64Array::from(units)))
    }

    fn write_parquet_units(units: ArrayRef) -> tempfile::NamedTempFile {
        let n = units.len();
        let text = |v: &str| std::sync::Arc::new(StringArray::from(vec![v; n])) as ArrayRef;
        let float = |v: f64| std::sync::Arc::new(Float64Array::from(vec![v; n])) as ArrayRef;

        let mut fields = Vec::new();
        let mut arrays = Vec::new();
        for (name, array) in [
            ("Product", text("A")),
            ("Retailer", text("R")),
            ("Region", text("N")),
            ("SalesMethod", text("Online")),
            ("City", text("X")),
            ("State", text("S")),
            ("PriceperUnit", float(2.0)),
            ("UnitsSold", units),
            ("TotalSales", float(20.0)),
            ("OperatingMargin", float(25.0)),
            ("OperatingExpenses", float(5.0)),
        ] {
            fields.push(Field::new(name, array.data_type().clone(), true));
            arrays.push(array);
        }
        let schema = std::sync::Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(schema.clone(), arrays).unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
        file
    }

    #[test]
    fn loads_parquet_with_integer_units() {
        let file = write_parquet(vec![Some(10), Some(3)]);
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[1].units_sold, 3);
        assert_eq!(ds.records()[0].operating_margin, 25.0);
    }

    #[test]
    fn parquet_null_cell_is_rejected() {
        let file = write_parquet(vec![Some(10), None]);
        match load_file(file.path()) {
            Err(LoadError::InvalidRecord { row, reason }) => {
                assert_eq!(row, 2);
                assert!(reason.contains("UnitsSold"), "{reason}");
            }
            other => panic!("expected InvalidRecord, got {other:?}"),
        }
    }

    #[test]
    fn parquet_fractional_units_are_rejected_not_truncated() {
        let units = std::sync::Arc::new(Float64Array::from(vec![4.0, 10.7])) as ArrayRef;
        let file = write_parquet_units(units);
        match load_file(file.path()) {
            Err(LoadError::InvalidRecord { row, reason }) => {
                assert_eq!(row, 2);
                assert!(reason.contains("whole number"), "{reason}");
            }
            other => panic!("expected InvalidRecord, got {other:?}"),
        }
    }

    #[test]
    fn parquet_whole_float_units_load() {
        let units = std::sync::Arc::new(Float64Array::from(vec![4.0, 12.0])) as ArrayRef;
        let ds = load_file(write_parquet_units(units).path()).unwrap();
        assert_eq!(ds.records()[1].units_sold, 12);
    }

    #[test]
    fn parquet_negative_units_are_rejected() {
        let file = write_parquet(vec![Some(3), Some(-5)]);
        match load_file(file.path()) {
            Err(LoadError::InvalidRecord { row, reason }) => {
                assert_eq!(row, 2);
                assert!(reason.contains("negative"), "{reason}");
            }
            other => panic!("expected InvalidRecord, got {other:?}"),
        }
    }

    #[test]
    fn unit_total_overflow_is_rejected() {
        let csv = format!(
            "{HEADER}\nA,R,N,Online,X,S,1,{},1,10,1\nA,R,N,Online,Y,S,1,1,1,10,1\n",
            u64::MAX
        );
        let file = write_temp(".csv", &csv);
        match load_file(file.path()) {
            Err(LoadError::InvalidRecord { row, reason }) => {
                assert_eq!(row, 2);
                assert!(reason.contains("64 bits"), "{reason}");
            }
            other => panic!("expected InvalidRecord, got {other:?}"),
        }
    }

    #[test]
    fn cache_returns_same_dataset_without_rereading() {
        let file = write_temp(".csv", &sample_csv());
        let mut cache = DatasetCache::default();
        let first = cache.get_or_load(file.path()).unwrap();

        // Overwrite the file; a cached load must not notice.
        std::fs::write(file.path(), format!("{HEADER}\n")).unwrap();
        let second = cache.get_or_load(file.path()).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.len(), 3);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cache_does_not_keep_failed_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("late.csv");
        let mut cache = DatasetCache::default();
        assert!(cache.get_or_load(&path).is_err());
        assert_eq!(cache.len(), 0);

        std::fs::write(&path, sample_csv()).unwrap();
        assert_eq!(cache.get_or_load(&path).unwrap().len(), 3);
    }
}
