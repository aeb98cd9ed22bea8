//! The history query builder and its date span types.

use chrono::NaiveDate;

use super::{Exchange, Interval, Period};

/// Inclusive calendar range whose end never precedes its start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Returns `None` when `end` is before `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (end >= start).then_some(Self { start, end })
    }

    /// Builds a range, pulling `end` up to `start` when it lies before it.
    /// The flag reports whether that correction happened.
    pub fn clamped(start: NaiveDate, end: NaiveDate) -> (Self, bool) {
        if end < start {
            (Self { start, end: start }, true)
        } else {
            (Self { start, end }, false)
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Either a trailing window or an explicit date range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Span {
    Period(Period),
    Range(DateRange),
}

impl Span {
    /// The explicit range, resolving a period against `today`.
    pub fn to_range(&self, today: NaiveDate) -> DateRange {
        match self {
            Span::Period(period) => period.resolve(today),
            Span::Range(range) => *range,
        }
    }
}

/// A normalized request for historical prices.
///
/// `symbol` is stored exactly as the user typed it; provider-specific
/// identifiers are derived with [`HistoryQuery::yahoo_symbol`] and
/// [`HistoryQuery::google_id`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HistoryQuery {
    pub symbol: String,
    pub exchange: Option<Exchange>,
    pub span: Span,
    pub interval: Interval,
}

impl HistoryQuery {
    /// A daily, one-year query for `symbol` with no exchange.
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            exchange: None,
            span: Span::Period(Period::OneYear),
            interval: Interval::OneDay,
        }
    }

    pub fn with_exchange(mut self, exchange: Exchange) -> Self {
        self.exchange = Some(exchange);
        self
    }

    pub fn with_period(mut self, period: Period) -> Self {
        self.span = Span::Period(period);
        self
    }

    pub fn with_range(mut self, range: DateRange) -> Self {
        self.span = Span::Range(range);
        self
    }

    pub fn with_interval(mut self, interval: Interval) -> Self {
        self.interval = interval;
        self
    }

    /// Symbol as the Yahoo chart API expects it (`RELIANCE.NS`, `AAPL`).
    pub fn yahoo_symbol(&self) -> String {
        match self.exchange {
            Some(exchange) => format!("{}{}", self.symbol, exchange.yahoo_suffix()),
            None => self.symbol.clone(),
        }
    }

    /// Identifier used in Google Finance quote URLs (`RELIANCE:NSE`).
    pub fn google_id(&self) -> String {
        match self.exchange {
            Some(exchange) => format!("{}:{}", self.symbol, exchange.google_code()),
            None => self.symbol.clone(),
        }
    }
}
