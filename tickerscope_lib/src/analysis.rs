//! Descriptive statistics over a price series.
//!
//! Produces the usual count / mean / std / min / quartiles / max summary for
//! every numeric column of a series. No network calls.

use serde::Serialize;
use statrs::statistics::Statistics;
use tickerscope_api::types::PriceSeries;

/// Summary statistics for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (N-1); NaN with fewer than two values.
    pub std: f64,
    pub min: f64,
    #[serde(rename = "25%")]
    pub q25: f64,
    #[serde(rename = "50%")]
    pub median: f64,
    #[serde(rename = "75%")]
    pub q75: f64,
    pub max: f64,
}

/// Statistics for every numeric column, in layout order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub columns: Vec<ColumnSummary>,
}

impl Summary {
    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.column == name)
    }
}

/// Describes each numeric column of `series`. Missing cells (an absent
/// adjusted close) are skipped for that column only.
pub fn describe(series: &PriceSeries) -> Summary {
    let layout = series.layout();
    let columns = layout
        .numeric_columns()
        .map(|column| summarize(layout.header(column), series.column_values(column)))
        .collect();
    Summary { columns }
}

fn summarize(name: &str, mut values: Vec<f64>) -> ColumnSummary {
    values.retain(|v| !v.is_nan());
    values.sort_by(|a, b| a.total_cmp(b));
    ColumnSummary {
        column: name.to_string(),
        count: values.len(),
        mean: values.iter().mean(),
        std: values.iter().std_dev(),
        min: values.first().copied().unwrap_or(f64::NAN),
        q25: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q75: quantile(&values, 0.75),
        max: values.last().copied().unwrap_or(f64::NAN),
    }
}

/// Quantile `q` of ascending `sorted` values, interpolating linearly between
/// the two closest ranks. NaN for an empty slice.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tickerscope_api::types::{PriceRecord, SeriesLayout, Timestamp};

    fn record(day: u32, close: f64, adj: Option<f64>, volume: u64) -> PriceRecord {
        PriceRecord {
            timestamp: Timestamp::Day(NaiveDate::from_ymd_opt(2024, 1, day).unwrap()),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            adj_close: adj,
            volume,
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_quantile_interpolates() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert!(approx(quantile(&v, 0.25), 1.75));
        assert!(approx(quantile(&v, 0.5), 2.5));
        assert!(approx(quantile(&v, 0.75), 3.25));
        assert!(approx(quantile(&v, 0.0), 1.0));
        assert!(approx(quantile(&v, 1.0), 4.0));
    }

    #[test]
    fn test_quantile_edge_cases() {
        assert!(quantile(&[], 0.5).is_nan());
        assert!(approx(quantile(&[7.0], 0.25), 7.0));
    }

    #[test]
    fn test_describe_indexed_columns() {
        let series = PriceSeries::new(
            SeriesLayout::Indexed,
            vec![
                record(2, 1.0, Some(1.0), 100),
                record(3, 2.0, Some(2.0), 200),
                record(4, 3.0, Some(3.0), 300),
                record(5, 4.0, Some(4.0), 400),
            ],
        );
        let summary = describe(&series);
        let names: Vec<&str> = summary.columns.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(names, vec!["Open", "High", "Low", "Close", "Adj Close", "Volume"]);

        let close = summary.column("Close").unwrap();
        assert_eq!(close.count, 4);
        assert!(approx(close.mean, 2.5));
        // sample std of 1..=4
        assert!(approx(close.std, (5.0f64 / 3.0).sqrt()));
        assert!(approx(close.min, 1.0));
        assert!(approx(close.q25, 1.75));
        assert!(approx(close.median, 2.5));
        assert!(approx(close.q75, 3.25));
        assert!(approx(close.max, 4.0));

        let volume = summary.column("Volume").unwrap();
        assert!(approx(volume.mean, 250.0));
    }

    #[test]
    fn test_describe_flat_excludes_date() {
        let series = PriceSeries::new(SeriesLayout::Flat, vec![record(2, 10.0, None, 5)]);
        let summary = describe(&series);
        let names: Vec<&str> = summary.columns.iter().map(|c| c.column.as_str()).collect();
        assert_eq!(names, vec!["open", "high", "low", "close", "volume"]);
        let close = summary.column("close").unwrap();
        assert_eq!(close.count, 1);
        assert!(close.std.is_nan());
        assert!(approx(close.median, 10.0));
    }

    #[test]
    fn test_describe_skips_missing_adj_close() {
        let series = PriceSeries::new(
            SeriesLayout::Indexed,
            vec![
                record(2, 1.0, Some(1.0), 1),
                record(3, 2.0, None, 1),
                record(4, 3.0, Some(5.0), 1),
            ],
        );
        let summary = describe(&series);
        let adj = summary.column("Adj Close").unwrap();
        assert_eq!(adj.count, 2);
        assert!(approx(adj.mean, 3.0));
        assert_eq!(summary.column("Close").unwrap().count, 3);
    }

    #[test]
    fn test_describe_empty_series() {
        let summary = describe(&PriceSeries::empty(SeriesLayout::Indexed));
        assert_eq!(summary.columns.len(), 6);
        assert!(summary.columns.iter().all(|c| c.count == 0 && c.mean.is_nan()));
    }

    #[test]
    fn test_summary_serializes_quartile_names() {
        let series = PriceSeries::new(SeriesLayout::Flat, vec![record(2, 1.0, None, 1)]);
        let json = serde_json::to_value(describe(&series)).unwrap();
        let first = &json["columns"][0];
        assert!(first.get("25%").is_some());
        assert!(first.get("50%").is_some());
    }
}
