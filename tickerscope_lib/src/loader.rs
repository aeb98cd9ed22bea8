//! Fail-safe, memoized price loading for both providers.
//!
//! Every provider failure is turned into a [`FetchOutcome`] value; nothing
//! escapes as an error. Outcomes (failures included) are memoized for the
//! lifetime of the [`Loader`].

use std::str::FromStr;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tickerscope_api::types::{PriceSeries, SeriesLayout};
use tickerscope_api::{Exchange, HistoryQuery, Interval, Span};

use crate::cache::FetchCache;
use crate::config::Config;
use crate::error::TickerScopeError;
use crate::scrape::{ScrapeClient, ScrapeError};
use crate::yahoo::{ChartSource, YahooClient, YahooError};

pub const GOOGLE_FETCH_FAILED: &str = "Failed to fetch data from Google Finance";
pub const GOOGLE_PARSE_FAILED: &str = "Failed to parse Google Finance data";
pub const NO_HISTORY: &str = "No historical data available";

/// Market data provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// Yahoo Finance chart API.
    Yahoo,
    /// Google Finance quote page scrape.
    Google,
}

impl Provider {
    /// Layout of the series this provider produces.
    pub fn layout(&self) -> SeriesLayout {
        match self {
            Provider::Yahoo => SeriesLayout::Indexed,
            Provider::Google => SeriesLayout::Flat,
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Yahoo => write!(f, "yahoo"),
            Provider::Google => write!(f, "google"),
        }
    }
}

impl FromStr for Provider {
    type Err = TickerScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yahoo" => Ok(Provider::Yahoo),
            "google" => Ok(Provider::Google),
            _ => Err(TickerScopeError::InvalidInput(format!(
                "unknown provider '{}'. Valid providers: yahoo, google",
                s
            ))),
        }
    }
}

/// Result of one load. `Data` never holds an empty series.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Data(Arc<PriceSeries>),
    /// The request worked but produced nothing to show.
    NoData { message: String },
    /// The provider could not be reached or its answer could not be read.
    Failed { message: String },
}

impl FetchOutcome {
    fn from_series(series: PriceSeries, empty_message: &str) -> Self {
        if series.is_empty() {
            FetchOutcome::NoData {
                message: empty_message.to_string(),
            }
        } else {
            FetchOutcome::Data(Arc::new(series))
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, FetchOutcome::Data(_))
    }

    pub fn series(&self) -> Option<&PriceSeries> {
        match self {
            FetchOutcome::Data(series) => Some(series),
            _ => None,
        }
    }

    /// The loaded series, or an empty one of `layout` when nothing loaded.
    pub fn into_series(self, layout: SeriesLayout) -> Arc<PriceSeries> {
        match self {
            FetchOutcome::Data(series) => series,
            _ => Arc::new(PriceSeries::empty(layout)),
        }
    }

    /// Warning or error text, `None` for data.
    pub fn message(&self) -> Option<&str> {
        match self {
            FetchOutcome::Data(_) => None,
            FetchOutcome::NoData { message } | FetchOutcome::Failed { message } => Some(message),
        }
    }
}

type YahooKey = (String, Span, Interval);
type GoogleKey = (Option<Exchange>, String, NaiveDate, NaiveDate);

/// Loads price series from either provider through a shared memo cache.
pub struct Loader<S = YahooClient> {
    chart: S,
    scraper: ScrapeClient,
    yahoo_cache: FetchCache<YahooKey, FetchOutcome>,
    google_cache: FetchCache<GoogleKey, FetchOutcome>,
}

impl Loader<YahooClient> {
    /// Builds a loader with the production Yahoo client and a quote page
    /// client configured from `config`.
    pub fn from_config(config: &Config) -> Result<Self, YahooError> {
        Ok(Self::new(
            YahooClient::new()?,
            ScrapeClient::new(config.google_client()),
        ))
    }
}

impl<S: ChartSource> Loader<S> {
    pub fn new(chart: S, scraper: ScrapeClient) -> Self {
        Self {
            chart,
            scraper,
            yahoo_cache: FetchCache::new(),
            google_cache: FetchCache::new(),
        }
    }

    pub async fn load(&self, provider: Provider, query: &HistoryQuery) -> FetchOutcome {
        match provider {
            Provider::Yahoo => self.load_yahoo(query).await,
            Provider::Google => self.load_google(query).await,
        }
    }

    /// Loads from the chart source, keyed by `(yahoo symbol, span, interval)`.
    pub async fn load_yahoo(&self, query: &HistoryQuery) -> FetchOutcome {
        let key = (query.yahoo_symbol(), query.span, query.interval);
        self.yahoo_cache
            .get_or_fetch(key, || self.fetch_yahoo(query))
            .await
    }

    async fn fetch_yahoo(&self, query: &HistoryQuery) -> FetchOutcome {
        let symbol = query.yahoo_symbol();
        let records = match self.chart.fetch_history(query).await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!("Yahoo Finance request for '{}' failed: {}", symbol, e);
                return FetchOutcome::Failed {
                    message: format!("Failed to fetch data from Yahoo Finance: {}", e),
                };
            }
        };

        let series = PriceSeries::new(SeriesLayout::Indexed, records);
        if series.is_empty() {
            tracing::warn!("Yahoo Finance returned no data for '{}'", symbol);
            return FetchOutcome::NoData {
                message: NO_HISTORY.to_string(),
            };
        }

        if let Span::Range(range) = query.span {
            let after_end = series.first_date().is_some_and(|d| d > range.end());
            let before_start = series.last_date().is_some_and(|d| d < range.start());
            if after_end || before_start {
                tracing::warn!(
                    "Yahoo Finance data for '{}' lies outside {} to {}",
                    symbol,
                    range.start(),
                    range.end()
                );
                return FetchOutcome::NoData {
                    message: format!(
                        "No data between {} and {}",
                        range.start(),
                        range.end()
                    ),
                };
            }
        }

        FetchOutcome::Data(Arc::new(series))
    }

    /// Loads from the quote page, keyed by `(exchange, symbol, start, end)`.
    /// A period span is resolved against the current UTC date.
    pub async fn load_google(&self, query: &HistoryQuery) -> FetchOutcome {
        let range = query.span.to_range(Utc::now().date_naive());
        let key = (
            query.exchange,
            query.symbol.clone(),
            range.start(),
            range.end(),
        );
        self.google_cache
            .get_or_fetch(key, || async {
                let google_id = query.google_id();
                match self.scraper.history(&google_id, range).await {
                    Ok(series) => {
                        if series.is_empty() {
                            tracing::warn!(
                                "No Google Finance data for '{}' between {} and {}",
                                google_id,
                                range.start(),
                                range.end()
                            );
                        }
                        FetchOutcome::from_series(series, NO_HISTORY)
                    }
                    Err(e) => google_failure(&google_id, e),
                }
            })
            .await
    }

    /// Number of memoized outcomes across both providers.
    pub fn cached_len(&self) -> usize {
        self.yahoo_cache.len() + self.google_cache.len()
    }
}

fn google_failure(google_id: &str, err: ScrapeError) -> FetchOutcome {
    match err {
        ScrapeError::Api(e) => {
            tracing::error!("Google Finance request for '{}' failed: {}", google_id, e);
            FetchOutcome::Failed {
                message: GOOGLE_FETCH_FAILED.to_string(),
            }
        }
        ScrapeError::MissingScript(_) | ScrapeError::Json(_) => {
            tracing::error!("Google Finance page for '{}' unreadable: {}", google_id, err);
            FetchOutcome::Failed {
                message: GOOGLE_PARSE_FAILED.to_string(),
            }
        }
        ScrapeError::NoHistory => {
            tracing::warn!("Google Finance page for '{}' has no history", google_id);
            FetchOutcome::NoData {
                message: NO_HISTORY.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tickerscope_api::types::{PriceRecord, Timestamp};
    use tickerscope_api::{DateRange, Exchange, Period};

    fn record(y: i32, m: u32, d: u32, close: f64) -> PriceRecord {
        PriceRecord {
            timestamp: Timestamp::Day(NaiveDate::from_ymd_opt(y, m, d).unwrap()),
            open: close - 1.0,
            high: close + 1.0,
            low: close - 2.0,
            close,
            adj_close: Some(close),
            volume: 1_000,
        }
    }

    fn range(start: (i32, u32, u32), end: (i32, u32, u32)) -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        )
        .unwrap()
    }

    /// Chart source that replays fixed records and counts calls.
    struct FakeChart {
        records: Vec<PriceRecord>,
        calls: AtomicUsize,
    }

    impl FakeChart {
        fn new(records: Vec<PriceRecord>) -> Self {
            Self {
                records,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ChartSource for FakeChart {
        async fn fetch_history(
            &self,
            _query: &HistoryQuery,
        ) -> Result<Vec<PriceRecord>, YahooError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok(self.records.clone())
        }
    }

    /// Chart source that always fails.
    struct BrokenChart;

    #[async_trait]
    impl ChartSource for BrokenChart {
        async fn fetch_history(
            &self,
            query: &HistoryQuery,
        ) -> Result<Vec<PriceRecord>, YahooError> {
            Err(YahooError::InvalidDate(query.yahoo_symbol()))
        }
    }

    fn loader<S: ChartSource>(chart: S) -> Loader<S> {
        // Google is never reached in these tests.
        Loader::new(chart, ScrapeClient::with_base_url("http://127.0.0.1:1"))
    }

    #[tokio::test]
    async fn aapl_default_query_returns_sorted_data() {
        let chart = FakeChart::new(vec![
            record(2024, 3, 2, 172.0),
            record(2024, 3, 1, 170.0),
            record(2024, 3, 4, 175.0),
        ]);
        let loader = loader(chart);
        let query = HistoryQuery::new("AAPL").with_period(Period::OneYear);

        let outcome = loader.load(Provider::Yahoo, &query).await;
        let series = outcome.series().expect("data");
        assert_eq!(series.layout(), SeriesLayout::Indexed);
        assert_eq!(series.len(), 3);
        let closes: Vec<f64> = series.records().iter().map(|r| r.close).collect();
        assert_eq!(closes, vec![170.0, 172.0, 175.0]);
        assert!(outcome.message().is_none());
    }

    #[tokio::test]
    async fn failing_source_becomes_failed_outcome() {
        let loader = loader(BrokenChart);
        let outcome = loader.load(Provider::Yahoo, &HistoryQuery::new("AAPL")).await;
        match outcome {
            FetchOutcome::Failed { message } => assert!(message.contains("Yahoo")),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_response_is_no_data() {
        let loader = loader(FakeChart::new(vec![]));
        let query = HistoryQuery::new("").with_exchange(Exchange::Nse);
        let outcome = loader.load(Provider::Yahoo, &query).await;
        assert!(matches!(outcome, FetchOutcome::NoData { .. }));
        assert!(outcome.into_series(SeriesLayout::Indexed).is_empty());
    }

    #[tokio::test]
    async fn data_after_requested_end_is_no_data() {
        let loader = loader(FakeChart::new(vec![
            record(2024, 7, 1, 10.0),
            record(2024, 7, 2, 11.0),
        ]));
        let query = HistoryQuery::new("AAPL").with_range(range((2024, 1, 1), (2024, 6, 30)));
        let outcome = loader.load(Provider::Yahoo, &query).await;
        assert!(matches!(outcome, FetchOutcome::NoData { .. }));
    }

    #[tokio::test]
    async fn data_before_requested_start_is_no_data() {
        let loader = loader(FakeChart::new(vec![record(2023, 12, 29, 10.0)]));
        let query = HistoryQuery::new("AAPL").with_range(range((2024, 1, 1), (2024, 6, 30)));
        let outcome = loader.load(Provider::Yahoo, &query).await;
        assert!(matches!(outcome, FetchOutcome::NoData { .. }));
    }

    #[tokio::test]
    async fn overlapping_range_keeps_data() {
        let loader = loader(FakeChart::new(vec![
            record(2024, 6, 28, 10.0),
            record(2024, 7, 1, 11.0),
        ]));
        let query = HistoryQuery::new("AAPL").with_range(range((2024, 1, 1), (2024, 6, 30)));
        assert!(loader.load(Provider::Yahoo, &query).await.is_data());
    }

    #[tokio::test]
    async fn identical_queries_fetch_once() {
        let loader = loader(FakeChart::new(vec![record(2024, 3, 1, 1.0)]));
        let query = HistoryQuery::new("RELIANCE").with_exchange(Exchange::Nse);

        let (a, b) = tokio::join!(
            loader.load(Provider::Yahoo, &query),
            loader.load(Provider::Yahoo, &query)
        );
        let c = loader.load(Provider::Yahoo, &query).await;
        assert!(a.is_data() && b.is_data() && c.is_data());
        assert_eq!(loader.chart.calls.load(Ordering::SeqCst), 1);
        assert_eq!(loader.cached_len(), 1);
    }

    #[tokio::test]
    async fn different_intervals_fetch_separately() {
        let loader = loader(FakeChart::new(vec![record(2024, 3, 1, 1.0)]));
        let daily = HistoryQuery::new("AAPL");
        let weekly = HistoryQuery::new("AAPL").with_interval(Interval::OneWeek);
        loader.load(Provider::Yahoo, &daily).await;
        loader.load(Provider::Yahoo, &weekly).await;
        assert_eq!(loader.chart.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn unreachable_google_is_failed() {
        let loader = loader(FakeChart::new(vec![]));
        let query = HistoryQuery::new("RELIANCE")
            .with_exchange(Exchange::Nse)
            .with_range(range((2024, 1, 1), (2024, 1, 31)));
        let outcome = loader.load(Provider::Google, &query).await;
        assert_eq!(outcome.message(), Some(GOOGLE_FETCH_FAILED));
    }

    #[test]
    fn provider_parse() {
        assert_eq!("Yahoo".parse::<Provider>().unwrap(), Provider::Yahoo);
        assert_eq!("google".parse::<Provider>().unwrap(), Provider::Google);
        assert!("bing".parse::<Provider>().is_err());
        assert_eq!(Provider::Google.to_string(), "google");
        assert_eq!(Provider::Google.layout(), SeriesLayout::Flat);
    }
}
