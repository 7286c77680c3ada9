use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray, UInt64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// One synthetic sales row, serialized with the dashboard's column names.
#[derive(Debug, Serialize)]
struct SaleRow {
    #[serde(rename = "Product")]
    product: &'static str,
    #[serde(rename = "Retailer")]
    retailer: &'static str,
    #[serde(rename = "Region")]
    region: &'static str,
    #[serde(rename = "SalesMethod")]
    sales_method: &'static str,
    #[serde(rename = "City")]
    city: &'static str,
    #[serde(rename = "State")]
    state: &'static str,
    #[serde(rename = "PriceperUnit")]
    price_per_unit: f64,
    #[serde(rename = "UnitsSold")]
    units_sold: u64,
    #[serde(rename = "TotalSales")]
    total_sales: f64,
    #[serde(rename = "OperatingMargin")]
    operating_margin: f64,
    #[serde(rename = "OperatingExpenses")]
    operating_expenses: f64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

const PRODUCTS: [(&str, f64); 6] = [
    ("Men's Street Footwear", 45.0),
    ("Men's Athletic Footwear", 42.0),
    ("Women's Street Footwear", 40.0),
    ("Women's Athletic Footwear", 38.0),
    ("Men's Apparel", 48.0),
    ("Women's Apparel", 52.0),
];

const RETAILERS: [&str; 6] = [
    "Foot Locker",
    "Walmart",
    "Sports Direct",
    "West Gear",
    "Kohl's",
    "Amazon",
];

const METHODS: [&str; 3] = ["In-store", "Outlet", "Online"];

/// (region, city, state)
const LOCATIONS: [(&str, &str, &str); 10] = [
    ("Northeast", "New York", "New York"),
    ("Northeast", "Boston", "Massachusetts"),
    ("Northeast", "Philadelphia", "Pennsylvania"),
    ("South", "Houston", "Texas"),
    ("South", "Miami", "Florida"),
    ("Southeast", "Atlanta", "Georgia"),
    ("Midwest", "Chicago", "Illinois"),
    ("Midwest", "Detroit", "Michigan"),
    ("West", "Seattle", "Washington"),
    ("West", "San Francisco", "California"),
];

fn generate_rows(n: usize, rng: &mut SimpleRng) -> Vec<SaleRow> {
    (0..n)
        .map(|_| {
            let &(product, base_price) = rng.pick(&PRODUCTS);
            let &(region, city, state) = rng.pick(&LOCATIONS);
            let retailer = *rng.pick(&RETAILERS);
            let sales_method = *rng.pick(&METHODS);

            let price_per_unit = (base_price * rng.range(0.7, 1.3)).round();
            let units_sold = rng.range(10.0, 1200.0) as u64;
            let total_sales = price_per_unit * units_sold as f64;
            let operating_margin = (rng.range(15.0, 65.0) * 100.0).round() / 100.0;
            let operating_expenses =
                (total_sales * (1.0 - operating_margin / 100.0) * 100.0).round() / 100.0;

            SaleRow {
                product,
                retailer,
                region,
                sales_method,
                city,
                state,
                price_per_unit,
                units_sold,
                total_sales,
                operating_margin,
                operating_expenses,
            }
        })
        .collect()
}

fn write_csv(rows: &[SaleRow], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(rows: &[SaleRow], path: &Path) -> Result<()> {
    let text = |f: fn(&SaleRow) -> &'static str| {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>())) as ArrayRef
    };
    let float = |f: fn(&SaleRow) -> f64| {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>())) as ArrayRef
    };

    let columns: Vec<(&str, ArrayRef)> = vec![
        ("Product", text(|r| r.product)),
        ("Retailer", text(|r| r.retailer)),
        ("Region", text(|r| r.region)),
        ("SalesMethod", text(|r| r.sales_method)),
        ("City", text(|r| r.city)),
        ("State", text(|r| r.state)),
        ("PriceperUnit", float(|r| r.price_per_unit)),
        (
            "UnitsSold",
            Arc::new(UInt64Array::from(
                rows.iter().map(|r| r.units_sold).collect::<Vec<_>>(),
            )) as ArrayRef,
        ),
        ("TotalSales", float(|r| r.total_sales)),
        ("OperatingMargin", float(|r| r.operating_margin)),
        ("OperatingExpenses", float(|r| r.operating_expenses)),
    ];

    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, array)| {
                let dtype: DataType = array.data_type().clone();
                Field::new(*name, dtype, false)
            })
            .collect::<Vec<_>>(),
    ));
    let batch = RecordBatch::try_new(
        schema.clone(),
        columns.into_iter().map(|(_, array)| array).collect(),
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(2_000, &mut rng);

    write_csv(&rows, Path::new("Adidas.csv"))?;
    write_parquet(&rows, Path::new("Adidas.parquet"))?;

    println!("Wrote {} sales rows to Adidas.csv and Adidas.parquet", rows.len());
    Ok(())
}
