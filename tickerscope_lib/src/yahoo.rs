//! Yahoo Finance chart client.
//!
//! [`ChartSource`] is the seam the loader talks to; [`YahooClient`] is the
//! production implementation over `yahoo_finance_api`.

use async_trait::async_trait;
use chrono::{Days, NaiveDate, NaiveTime};
use thiserror::Error;
use time::OffsetDateTime;
use tickerscope_api::types::{PriceRecord, Timestamp};
use tickerscope_api::{HistoryQuery, Span};

/// Errors from Yahoo Finance operations.
#[derive(Error, Debug)]
pub enum YahooError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error(transparent)]
    Upstream(#[from] yahoo_finance_api::YahooError),
}

fn midnight_utc(date: NaiveDate) -> Result<OffsetDateTime, YahooError> {
    let secs = date.and_time(NaiveTime::MIN).and_utc().timestamp();
    OffsetDateTime::from_unix_timestamp(secs).map_err(|_| YahooError::InvalidDate(date.to_string()))
}

/// Request window for an explicit range: `[start 00:00, end + 1 day 00:00)`
/// in UTC, so the end date is included.
pub fn range_bounds(
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(OffsetDateTime, OffsetDateTime), YahooError> {
    let after_end = end
        .checked_add_days(Days::new(1))
        .ok_or_else(|| YahooError::InvalidDate(end.to_string()))?;
    Ok((midnight_utc(start)?, midnight_utc(after_end)?))
}

/// Source of historical chart data.
#[async_trait]
pub trait ChartSource: Send + Sync {
    /// Fetches the records for a query, in whatever order the source returns them.
    async fn fetch_history(&self, query: &HistoryQuery) -> Result<Vec<PriceRecord>, YahooError>;
}

/// Yahoo Finance chart API client.
pub struct YahooClient {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooClient {
    /// Create a new YahooClient with default configuration.
    pub fn new() -> Result<Self, YahooError> {
        Ok(Self {
            connector: yahoo_finance_api::YahooConnector::new()?,
        })
    }
}

#[async_trait]
impl ChartSource for YahooClient {
    async fn fetch_history(&self, query: &HistoryQuery) -> Result<Vec<PriceRecord>, YahooError> {
        let symbol = query.yahoo_symbol();
        let interval = query.interval.to_string();
        let response = match query.span {
            Span::Period(period) => {
                self.connector
                    .get_quote_range(&symbol, &interval, &period.to_string())
                    .await?
            }
            Span::Range(range) => {
                let (start, end) = range_bounds(range.start(), range.end())?;
                self.connector
                    .get_quote_history_interval(&symbol, start, end, &interval)
                    .await?
            }
        };

        let intraday = query.interval.is_intraday();
        let records = response
            .quotes()?
            .iter()
            .filter_map(|q| {
                Some(PriceRecord {
                    timestamp: Timestamp::from_epoch(q.timestamp as i64, intraday)?,
                    open: q.open,
                    high: q.high,
                    low: q.low,
                    close: q.close,
                    adj_close: Some(q.adjclose),
                    volume: q.volume,
                })
            })
            .collect();
        Ok(records)
    }
}
