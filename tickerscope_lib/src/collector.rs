//! Turns raw parameter input into a normalized [`HistoryQuery`].

use chrono::NaiveDate;
use tickerscope_api::{earliest_date, DateRange, HistoryQuery, Span};

use crate::error::TickerScopeError;
use crate::loader::Provider;
use crate::validation;

pub const DEFAULT_SYMBOL: &str = "AAPL";

/// Parameter values as typed by the user. `None` means the field was left
/// at its default.
#[derive(Debug, Clone, Default)]
pub struct RawParams {
    pub symbol: Option<String>,
    pub exchange: Option<String>,
    pub period: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub interval: Option<String>,
}

/// Non-fatal message produced while collecting parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// The end date preceded the start date and was pulled up to it.
    RangeCorrected { start: NaiveDate, end: NaiveDate },
    /// The window a period resolved to.
    Window { start: NaiveDate, end: NaiveDate },
}

impl Notice {
    /// True for notices that should be shown as warnings.
    pub fn is_warning(&self) -> bool {
        matches!(self, Notice::RangeCorrected { .. })
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::RangeCorrected { start, end } => write!(
                f,
                "End date cannot be before start date. Showing {} to {}.",
                start.format("%d/%m/%Y"),
                end.format("%d/%m/%Y")
            ),
            Notice::Window { start, end } => write!(
                f,
                "Showing {} to {}.",
                start.format("%d/%m/%Y"),
                end.format("%d/%m/%Y")
            ),
        }
    }
}

/// A query ready for loading plus the notices raised while building it.
#[derive(Debug, Clone)]
pub struct Collected {
    pub query: HistoryQuery,
    pub notices: Vec<Notice>,
}

/// Validates and normalizes raw parameters for `provider`.
///
/// Yahoo keeps a period span as-is (default `1y`); Google always gets an
/// explicit range, defaulting to 1980-01-01 through `today`. When only one
/// of start/end is given the other falls back to that same default. A
/// reversed range is clamped rather than rejected.
pub fn collect(
    provider: Provider,
    raw: &RawParams,
    today: NaiveDate,
) -> Result<Collected, TickerScopeError> {
    let symbol = match raw.symbol.as_deref() {
        Some(s) => validation::sanitize_symbol(s)?,
        None => DEFAULT_SYMBOL.to_string(),
    };
    let exchange = match raw.exchange.as_deref() {
        Some(e) => validation::validate_exchange(e)?,
        None => None,
    };
    let interval = match raw.interval.as_deref() {
        Some(i) => Some(validation::validate_interval(i)?),
        None => None,
    };
    let period = match raw.period.as_deref() {
        Some(p) => Some(validation::validate_period(p)?),
        None => None,
    };
    let start = raw
        .start
        .as_deref()
        .map(validation::validate_date)
        .transpose()?;
    let end = raw
        .end
        .as_deref()
        .map(validation::validate_date)
        .transpose()?;

    if period.is_some() && (start.is_some() || end.is_some()) {
        return Err(TickerScopeError::InvalidInput(
            "use either a period or a start/end range, not both".to_string(),
        ));
    }

    let mut notices = Vec::new();
    let span = if start.is_some() || end.is_some() {
        let start = start.unwrap_or_else(earliest_date);
        let end = end.unwrap_or(today);
        let (range, corrected) = DateRange::clamped(start, end);
        if corrected {
            tracing::warn!("end date {} before start date {}, clamped", end, start);
            notices.push(Notice::RangeCorrected {
                start: range.start(),
                end: range.end(),
            });
        }
        Span::Range(range)
    } else {
        match (provider, period) {
            (Provider::Yahoo, Some(period)) => Span::Period(period),
            (Provider::Google, Some(period)) => {
                let range = period.resolve(today);
                notices.push(Notice::Window {
                    start: range.start(),
                    end: range.end(),
                });
                Span::Range(range)
            }
            (Provider::Yahoo, None) => HistoryQuery::new(&symbol).span,
            (Provider::Google, None) => Span::Range(DateRange::clamped(earliest_date(), today).0),
        }
    };

    let mut query = HistoryQuery::new(&symbol);
    query.exchange = exchange;
    query.span = span;
    if let Some(interval) = interval {
        query = query.with_interval(interval);
    }

    Ok(Collected { query, notices })
}
