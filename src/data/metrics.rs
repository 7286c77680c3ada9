use super::filter::FilteredView;

// ---------------------------------------------------------------------------
// Summary metrics over a filtered view
// ---------------------------------------------------------------------------

/// The five headline figures of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSummary {
    /// Mean unit price ×100, truncated toward zero.
    ///
    /// The ×100 reproduces the currency-subunit display of the original
    /// report and is kept as-is even though it looks like a unit mix-up.
    pub average_price: i64,
    /// Number of transactions (rows), not the sum of units sold.
    pub unit_count: usize,
    pub total_sales: f64,
    /// Mean operating margin in percent.
    pub operating_margin: f64,
    pub operating_expenses: f64,
}

/// Reduce a view to its summary. Views are never empty, so the means are
/// always defined.
pub fn summarize(view: &FilteredView) -> MetricsSummary {
    let n = view.len();
    let (mut price, mut sales, mut margin, mut expenses) = (0.0, 0.0, 0.0, 0.0);
    for rec in view.records() {
        price += rec.price_per_unit;
        sales += rec.total_sales;
        margin += rec.operating_margin;
        expenses += rec.operating_expenses;
    }
    let mean = |sum: f64| sum / n as f64;

    MetricsSummary {
        average_price: (mean(price) * 100.0).trunc() as i64,
        unit_count: n,
        total_sales: sales,
        operating_margin: mean(margin),
        operating_expenses: mean(expenses),
    }
}

impl MetricsSummary {
    pub fn average_price_text(&self) -> String {
        let grouped = group_thousands(self.average_price.unsigned_abs(), self.average_price < 0);
        format!("₹ {grouped}")
    }

    pub fn unit_count_text(&self) -> String {
        group_thousands(self.unit_count as u64, false)
    }

    /// Grouped currency; decimals appear only when the sum is fractional.
    pub fn total_sales_text(&self) -> String {
        let whole = self.total_sales.trunc();
        let grouped = group_thousands(whole.abs() as u64, whole < 0.0);
        let cents = ((self.total_sales - whole).abs() * 100.0).round() as u64;
        match cents {
            0 => format!("₹ {grouped}"),
            // Rounding up a fraction like .999 carries into the integer part.
            100 => format!(
                "₹ {}",
                group_thousands(whole.abs() as u64 + 1, whole < 0.0)
            ),
            c => format!("₹ {grouped}.{c:02}"),
        }
    }

    pub fn operating_margin_text(&self) -> String {
        format!("{:.2} %", self.operating_margin)
    }

    pub fn operating_expenses_text(&self) -> String {
        format!("₹ {:.2}", self.operating_expenses)
    }
}

/// `1234567` → `"1,234,567"`.
fn group_thousands(value: u64, negative: bool) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
