//! Price records and the ordered series they form.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// When a record was sampled: a calendar day for daily and coarser
/// intervals, an instant for intraday ones.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum Timestamp {
    Day(NaiveDate),
    Instant(DateTime<Utc>),
}

impl Timestamp {
    /// Converts epoch seconds, keeping the time of day only when `intraday`.
    pub fn from_epoch(seconds: i64, intraday: bool) -> Option<Self> {
        let dt = DateTime::from_timestamp(seconds, 0)?;
        Some(if intraday {
            Timestamp::Instant(dt)
        } else {
            Timestamp::Day(dt.date_naive())
        })
    }

    /// UTC calendar date of the sample.
    pub fn date(&self) -> NaiveDate {
        match self {
            Timestamp::Day(d) => *d,
            Timestamp::Instant(dt) => dt.date_naive(),
        }
    }

    fn sort_key(&self) -> NaiveDateTime {
        match self {
            Timestamp::Day(d) => d.and_time(chrono::NaiveTime::MIN),
            Timestamp::Instant(dt) => dt.naive_utc(),
        }
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timestamp::Day(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Timestamp::Instant(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S%:z")),
        }
    }
}

/// One OHLCV sample.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PriceRecord {
    pub timestamp: Timestamp,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Split/dividend adjusted close. Only the Yahoo provider reports it.
    pub adj_close: Option<f64>,
    pub volume: u64,
}

/// A column of the tabular view of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Date,
    Open,
    High,
    Low,
    Close,
    AdjClose,
    Volume,
}

impl Column {
    /// True for every column except the timestamp.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Column::Date)
    }
}

/// How a series is laid out as a table.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesLayout {
    /// Timestamp is the row index named `Date`; capitalized value columns
    /// including `Adj Close`. Produced by the Yahoo provider.
    Indexed,
    /// `date` is an ordinary first column next to lowercase value columns.
    /// Produced by the Google provider.
    Flat,
}

impl SeriesLayout {
    /// The index column, if the timestamp is kept out of the data columns.
    pub fn index(&self) -> Option<Column> {
        match self {
            SeriesLayout::Indexed => Some(Column::Date),
            SeriesLayout::Flat => None,
        }
    }

    /// Data columns in display order (the index column excluded).
    pub fn columns(&self) -> &'static [Column] {
        match self {
            SeriesLayout::Indexed => &[
                Column::Open,
                Column::High,
                Column::Low,
                Column::Close,
                Column::AdjClose,
                Column::Volume,
            ],
            SeriesLayout::Flat => &[
                Column::Date,
                Column::Open,
                Column::High,
                Column::Low,
                Column::Close,
                Column::Volume,
            ],
        }
    }

    /// Data columns that hold numbers.
    pub fn numeric_columns(&self) -> impl Iterator<Item = Column> {
        self.columns().iter().copied().filter(Column::is_numeric)
    }

    /// Header text for a column in this layout.
    pub fn header(&self, column: Column) -> &'static str {
        match (self, column) {
            (SeriesLayout::Indexed, Column::Date) => "Date",
            (SeriesLayout::Indexed, Column::Open) => "Open",
            (SeriesLayout::Indexed, Column::High) => "High",
            (SeriesLayout::Indexed, Column::Low) => "Low",
            (SeriesLayout::Indexed, Column::Close) => "Close",
            (SeriesLayout::Indexed, Column::AdjClose) => "Adj Close",
            (SeriesLayout::Indexed, Column::Volume) => "Volume",
            (SeriesLayout::Flat, Column::Date) => "date",
            (SeriesLayout::Flat, Column::Open) => "open",
            (SeriesLayout::Flat, Column::High) => "high",
            (SeriesLayout::Flat, Column::Low) => "low",
            (SeriesLayout::Flat, Column::Close) => "close",
            (SeriesLayout::Flat, Column::AdjClose) => "adj_close",
            (SeriesLayout::Flat, Column::Volume) => "volume",
        }
    }
}

impl PriceRecord {
    /// Numeric value of a column; `None` for the timestamp and for a missing
    /// adjusted close.
    pub fn value(&self, column: Column) -> Option<f64> {
        match column {
            Column::Date => None,
            Column::Open => Some(self.open),
            Column::High => Some(self.high),
            Column::Low => Some(self.low),
            Column::Close => Some(self.close),
            Column::AdjClose => self.adj_close,
            Column::Volume => Some(self.volume as f64),
        }
    }
}

/// Price records for one symbol, ordered by timestamp ascending.
///
/// A series is either empty or made of complete records.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PriceSeries {
    layout: SeriesLayout,
    records: Vec<PriceRecord>,
}

impl PriceSeries {
    /// Builds a series, sorting the records by timestamp.
    pub fn new(layout: SeriesLayout, mut records: Vec<PriceRecord>) -> Self {
        records.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Self { layout, records }
    }

    pub fn empty(layout: SeriesLayout) -> Self {
        Self {
            layout,
            records: Vec::new(),
        }
    }

    pub fn layout(&self) -> SeriesLayout {
        self.layout
    }

    pub fn records(&self) -> &[PriceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.records.first().map(|r| r.timestamp.date())
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.records.last().map(|r| r.timestamp.date())
    }

    /// All values of a numeric column, skipping missing cells.
    pub fn column_values(&self, column: Column) -> Vec<f64> {
        self.records.iter().filter_map(|r| r.value(column)).collect()
    }
}
