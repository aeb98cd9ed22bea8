//! File export of price series: CSV, XLSX and the `slx` alias of XLSX.

use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_xlsxwriter::{
    DocProperties, ExcelDateTime, Format, FormatAlign, FormatBorder, Workbook,
};
use serde::Serialize;
use tickerscope_api::types::{Column, PriceRecord, PriceSeries, SeriesLayout};

use crate::error::TickerScopeError;

pub const CSV_MIME: &str = "text/csv";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Creation stamp for workbooks built from an empty series.
const EMPTY_SERIES_STAMP: (u16, u8, u8) = (2000, 1, 1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
    /// Same bytes as `Xlsx` under a different extension.
    Slx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Csv, ExportFormat::Xlsx, ExportFormat::Slx];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Slx => "slx",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Csv => CSV_MIME,
            ExportFormat::Xlsx | ExportFormat::Slx => XLSX_MIME,
        }
    }

    /// Human-readable name for download prompts.
    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Xlsx => "Excel",
            ExportFormat::Slx => "SLX",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = TickerScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExportFormat::ALL
            .into_iter()
            .find(|fmt| fmt.extension() == s)
            .ok_or_else(|| TickerScopeError::UnsupportedFormat(s.to_string()))
    }
}

/// Encoded export, ready to be written or offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBlob {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
    pub extension: &'static str,
}

impl ExportBlob {
    /// `{symbol}_data.{ext}`. Path separators in the symbol become `_`, so
    /// the name is always a single path component.
    pub fn file_name(&self, symbol: &str) -> String {
        let stem: String = symbol
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
            .collect();
        format!("{}_data.{}", stem, self.extension)
    }
}

/// Encodes `series` in the format named by `tag` (`csv`, `xlsx`, `slx`).
pub fn export(series: &PriceSeries, tag: &str) -> Result<ExportBlob, TickerScopeError> {
    export_as(series, tag.parse()?)
}

pub fn export_as(series: &PriceSeries, format: ExportFormat) -> Result<ExportBlob, TickerScopeError> {
    let bytes = match format {
        ExportFormat::Csv => to_csv(series)?,
        ExportFormat::Xlsx | ExportFormat::Slx => to_xlsx(series)?,
    };
    Ok(ExportBlob {
        bytes,
        mime: format.mime(),
        extension: format.extension(),
    })
}

/// Writes `blob` to `{dir}/{symbol}_data.{ext}` and returns the path.
pub fn write_blob(dir: &Path, symbol: &str, blob: &ExportBlob) -> Result<PathBuf, TickerScopeError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(blob.file_name(symbol));
    if path.parent() != Some(dir) {
        return Err(TickerScopeError::Export(format!(
            "export path escapes {}: {}",
            dir.display(),
            path.display()
        )));
    }
    std::fs::write(&path, &blob.bytes)?;
    tracing::info!("Wrote {} bytes to {}", blob.bytes.len(), path.display());
    Ok(path)
}

#[derive(Serialize)]
struct IndexedRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Adj Close")]
    adj_close: Option<f64>,
    #[serde(rename = "Volume")]
    volume: u64,
}

#[derive(Serialize)]
struct FlatRow {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

impl From<&PriceRecord> for IndexedRow {
    fn from(r: &PriceRecord) -> Self {
        Self {
            date: r.timestamp.to_string(),
            open: r.open,
            high: r.high,
            low: r.low,
            close: r.close,
            adj_close: r.adj_close,
            volume: r.volume,
        }
    }
}

impl From<&PriceRecord> for FlatRow {
    fn from(r: &PriceRecord) -> Self {
        Self {
            date: r.timestamp.to_string(),
            open: r.open,
            high: r.high,
            low: r.low,
            close: r.close,
            volume: r.volume,
        }
    }
}

/// Header row of the CSV encoding: the index column (if any) then the data columns.
pub fn csv_headers(layout: SeriesLayout) -> Vec<&'static str> {
    layout
        .index()
        .into_iter()
        .chain(layout.columns().iter().copied())
        .map(|c| layout.header(c))
        .collect()
}

/// Streams the CSV encoding of `series` into `writer`. The header row is
/// written even when the series is empty.
pub fn write_csv<W: io::Write>(series: &PriceSeries, writer: W) -> Result<(), TickerScopeError> {
    let mut wtr = csv::Writer::from_writer(writer);
    if series.is_empty() {
        wtr.write_record(csv_headers(series.layout()))?;
    }
    for record in series.records() {
        match series.layout() {
            SeriesLayout::Indexed => wtr.serialize(IndexedRow::from(record))?,
            SeriesLayout::Flat => wtr.serialize(FlatRow::from(record))?,
        }
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv(series: &PriceSeries) -> Result<Vec<u8>, TickerScopeError> {
    let mut buf = Vec::new();
    write_csv(series, &mut buf)?;
    Ok(buf)
}

/// Single `Sheet1` workbook with a bold header row. The index column is not
/// written; a flat layout's `date` column is written as Excel dates.
pub fn to_xlsx(series: &PriceSeries) -> Result<Vec<u8>, TickerScopeError> {
    let layout = series.layout();
    let mut workbook = Workbook::new();
    let stamp = match series.last_date() {
        Some(date) => excel_date(date)?,
        None => {
            let (y, m, d) = EMPTY_SERIES_STAMP;
            ExcelDateTime::from_ymd(y, m, d)?
        }
    };
    let properties = DocProperties::new().set_creation_datetime(&stamp);
    workbook.set_properties(&properties);

    let header_format = Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center);
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Sheet1")?;

    for (col, column) in layout.columns().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, layout.header(*column), &header_format)?;
    }

    for (i, record) in series.records().iter().enumerate() {
        let row = i as u32 + 1;
        for (col, column) in layout.columns().iter().enumerate() {
            let col = col as u16;
            match column {
                Column::Date => {
                    let date = excel_date(record.timestamp.date())?;
                    worksheet.write_datetime_with_format(row, col, &date, &date_format)?;
                }
                numeric => {
                    if let Some(value) = record.value(*numeric) {
                        worksheet.write_number(row, col, value)?;
                    }
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn excel_date(date: NaiveDate) -> Result<ExcelDateTime, TickerScopeError> {
    let year = u16::try_from(date.year())
        .map_err(|_| TickerScopeError::Export(format!("year out of range: {}", date)))?;
    Ok(ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8)?)
}
