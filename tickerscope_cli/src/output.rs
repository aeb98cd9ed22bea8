use std::str::FromStr;

use anyhow::{bail, Result};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tickerscope_lib::analysis::{describe, Summary};
use tickerscope_lib::export::write_csv;
use tickerscope_lib::types::{PriceRecord, PriceSeries, SeriesLayout};
use tickerscope_lib::FetchOutcome;

use crate::chart;

/// Shown in place of the table, chart and statistics when nothing loaded.
pub const EMPTY_WARNING: &str = "No data available for the selected period.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => bail!(
                "unknown output format '{}'. Valid formats: table, json, csv, markdown",
                other
            ),
        }
    }
}

#[derive(Tabled)]
struct IndexedRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Open")]
    open: String,
    #[tabled(rename = "High")]
    high: String,
    #[tabled(rename = "Low")]
    low: String,
    #[tabled(rename = "Close")]
    close: String,
    #[tabled(rename = "Adj Close")]
    adj_close: String,
    #[tabled(rename = "Volume")]
    volume: u64,
}

#[derive(Tabled)]
struct FlatRow {
    date: String,
    open: String,
    high: String,
    low: String,
    close: String,
    volume: u64,
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Column")]
    column: String,
    #[tabled(rename = "count")]
    count: usize,
    #[tabled(rename = "mean")]
    mean: String,
    #[tabled(rename = "std")]
    std: String,
    #[tabled(rename = "min")]
    min: String,
    #[tabled(rename = "25%")]
    q25: String,
    #[tabled(rename = "50%")]
    median: String,
    #[tabled(rename = "75%")]
    q75: String,
    #[tabled(rename = "max")]
    max: String,
}

/// JSON document printed for `--output json`.
#[derive(Serialize)]
struct Report<'a> {
    symbol: &'a str,
    records: &'a [PriceRecord],
    summary: Summary,
}

fn build_indexed_rows(records: &[PriceRecord]) -> Vec<IndexedRow> {
    records
        .iter()
        .map(|r| IndexedRow {
            date: r.timestamp.to_string(),
            open: format_price(r.open),
            high: format_price(r.high),
            low: format_price(r.low),
            close: format_price(r.close),
            adj_close: r.adj_close.map(format_price).unwrap_or_default(),
            volume: r.volume,
        })
        .collect()
}

fn build_flat_rows(records: &[PriceRecord]) -> Vec<FlatRow> {
    records
        .iter()
        .map(|r| FlatRow {
            date: r.timestamp.to_string(),
            open: format_price(r.open),
            high: format_price(r.high),
            low: format_price(r.low),
            close: format_price(r.close),
            volume: r.volume,
        })
        .collect()
}

fn build_stat_rows(summary: &Summary) -> Vec<StatRow> {
    summary
        .columns
        .iter()
        .map(|c| StatRow {
            column: c.column.clone(),
            count: c.count,
            mean: format_stat(c.mean),
            std: format_stat(c.std),
            min: format_stat(c.min),
            q25: format_stat(c.q25),
            median: format_stat(c.median),
            q75: format_stat(c.q75),
            max: format_stat(c.max),
        })
        .collect()
}

fn styled(mut table: Table, markdown: bool) -> String {
    if markdown {
        table.with(Style::markdown());
    }
    table.to_string()
}

/// The full price table for a series.
pub fn render_prices(series: &PriceSeries, markdown: bool) -> String {
    let table = match series.layout() {
        SeriesLayout::Indexed => Table::new(build_indexed_rows(series.records())),
        SeriesLayout::Flat => Table::new(build_flat_rows(series.records())),
    };
    styled(table, markdown)
}

/// The descriptive statistics table for a series.
pub fn render_stats(series: &PriceSeries, markdown: bool) -> String {
    styled(Table::new(build_stat_rows(&describe(series))), markdown)
}

/// Everything shown for one load, as it would be printed to stdout.
/// Returns `None` when the outcome holds no data; the caller reports the
/// warning instead.
pub fn render_outcome(
    symbol: &str,
    outcome: &FetchOutcome,
    format: &OutputFormat,
    with_chart: bool,
) -> Result<Option<String>> {
    let Some(series) = outcome.series().filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let text = match format {
        OutputFormat::Table | OutputFormat::Markdown => {
            let markdown = *format == OutputFormat::Markdown;
            let mut sections = vec![render_prices(series, markdown)];
            if with_chart {
                let plot = chart::render_close_chart(
                    series,
                    chart::DEFAULT_WIDTH,
                    chart::DEFAULT_HEIGHT,
                );
                sections.push(if markdown {
                    format!("```text\n{}```", plot)
                } else {
                    plot
                });
            }
            sections.push(render_stats(series, markdown));
            sections.join("\n\n")
        }
        OutputFormat::Csv => {
            let mut buf = Vec::new();
            write_csv(series, &mut buf)?;
            String::from_utf8(buf)?.trim_end().to_string()
        }
        OutputFormat::Json => serde_json::to_string_pretty(&Report {
            symbol,
            records: series.records(),
            summary: describe(series),
        })?,
    };
    Ok(Some(text))
}

/// Prints a load result: data to stdout, the empty-state warning and the
/// outcome's message to stderr.
pub fn present(
    symbol: &str,
    outcome: &FetchOutcome,
    format: &OutputFormat,
    with_chart: bool,
) -> Result<()> {
    match render_outcome(symbol, outcome, format, with_chart)? {
        Some(text) => println!("{}", text),
        None => {
            eprintln!("Warning: {}", EMPTY_WARNING);
            match outcome {
                FetchOutcome::Failed { message } => eprintln!("Error: {}", message),
                FetchOutcome::NoData { message } => eprintln!("{}", message),
                FetchOutcome::Data(_) => {}
            }
        }
    }
    Ok(())
}

fn format_price(value: f64) -> String {
    format!("{:.2}", value)
}

fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
