//! Google Finance quote page scraping.
//!
//! The quote page embeds its chart data as JSON inside a `<script>` element
//! with a fixed id; this module locates that element, parses the payload
//! and turns it into a date-filtered [`PriceSeries`].

use std::sync::OnceLock;

use chrono::DateTime;
use regex::Regex;
use tickerscope_api::types::{
    GooglePrice, PriceRecord, PriceSeries, QuotePagePayload, SeriesLayout, Timestamp,
};
use tickerscope_api::{Client, DateRange};

/// `id` attribute of the script element that carries the price payload.
pub const DATA_SCRIPT_ID: &str = "K3kOpe";

#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("api error: {0}")]
    Api(#[from] tickerscope_api::Error),
    #[error("missing data script '{0}'")]
    MissingScript(&'static str),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no historical prices in payload")]
    NoHistory,
}

pub struct ScrapeClient {
    client: Client,
}

impl ScrapeClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a client against a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self::new(Client::with_base_url(base_url))
    }

    /// Fetches and parses the quote page for `google_id`, keeping the
    /// records dated within `range`.
    ///
    /// A page with an empty price list yields [`ScrapeError::NoHistory`];
    /// a list whose records all fall outside `range` yields an empty series.
    pub async fn history(
        &self,
        google_id: &str,
        range: DateRange,
    ) -> Result<PriceSeries, ScrapeError> {
        let html = self.client.get_quote_page(google_id).await?;
        let prices = parse_quote_page(&html)?;
        Ok(to_series(&prices, range))
    }
}

/// Returns the text content of the first `<script>` element whose `id`
/// attribute equals `id`.
pub fn extract_script_by_id<'a>(html: &'a str, id: &str) -> Option<&'a str> {
    static SCRIPT_RE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = SCRIPT_RE
        .get_or_init(|| Regex::new(r#"(?is)<script\b([^>]*)>(.*?)</script>"#).ok())
        .as_ref()?;
    re.captures_iter(html).find_map(|caps| {
        let attrs = caps.get(1)?.as_str();
        if script_id(attrs)? == id {
            caps.get(2).map(|body| body.as_str())
        } else {
            None
        }
    })
}

fn script_id(attrs: &str) -> Option<&str> {
    static ID_RE: OnceLock<Option<Regex>> = OnceLock::new();
    let re = ID_RE
        .get_or_init(|| Regex::new(r#"(?:^|\s)id\s*=\s*["']([^"']*)["']"#).ok())
        .as_ref()?;
    re.captures(attrs)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Extracts the non-empty historical price list from a quote page.
pub fn parse_quote_page(html: &str) -> Result<Vec<GooglePrice>, ScrapeError> {
    let script = extract_script_by_id(html, DATA_SCRIPT_ID)
        .ok_or(ScrapeError::MissingScript(DATA_SCRIPT_ID))?;
    let payload: QuotePagePayload = serde_json::from_str(script.trim())?;
    match payload.historical_prices {
        Some(prices) if !prices.is_empty() => Ok(prices),
        _ => Err(ScrapeError::NoHistory),
    }
}

/// Converts scraped prices into a flat series, keeping records whose UTC
/// date lies within `range` (inclusive). Fractional epochs are floored to
/// the second; volumes are rounded to whole shares.
pub fn to_series(prices: &[GooglePrice], range: DateRange) -> PriceSeries {
    let records = prices
        .iter()
        .filter_map(|p| {
            if !p.date.is_finite() {
                return None;
            }
            let date = DateTime::from_timestamp(p.date.floor() as i64, 0)?.date_naive();
            if !range.contains(date) {
                return None;
            }
            Some(PriceRecord {
                timestamp: Timestamp::Day(date),
                open: p.open,
                high: p.high,
                low: p.low,
                close: p.close,
                adj_close: None,
                volume: p.volume.max(0.0).round() as u64,
            })
        })
        .collect();
    PriceSeries::new(SeriesLayout::Flat, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn price(date: i64, close: f64) -> GooglePrice {
        GooglePrice {
            date: date as f64,
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000.4,
        }
    }

    fn range(start: (i32, u32, u32), end: (i32, u32, u32)) -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(start.0, start.1, start.2).unwrap(),
            NaiveDate::from_ymd_opt(end.0, end.1, end.2).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn extract_script_finds_id_among_others() {
        let html = r#"<script>var a = 1;</script><script type="application/json" id="K3kOpe" nonce="x">{"a":1}</script>"#;
        assert_eq!(extract_script_by_id(html, "K3kOpe"), Some(r#"{"a":1}"#));
    }

    #[test]
    fn extract_script_single_quotes_and_case() {
        let html = "<SCRIPT id='K3kOpe'>\n[1,2]\n</SCRIPT>";
        assert_eq!(extract_script_by_id(html, "K3kOpe"), Some("\n[1,2]\n"));
    }

    #[test]
    fn extract_script_ignores_similar_ids() {
        let html = r#"<script id="K3kOpeX">{}</script><script data-id="K3kOpe">{}</script>"#;
        assert_eq!(extract_script_by_id(html, "K3kOpe"), None);
    }

    #[test]
    fn parse_missing_script() {
        let err = parse_quote_page("<html><body></body></html>").unwrap_err();
        assert!(matches!(err, ScrapeError::MissingScript("K3kOpe")));
    }

    #[test]
    fn parse_invalid_json() {
        let html = r#"<script id="K3kOpe">not json</script>"#;
        assert!(matches!(
            parse_quote_page(html),
            Err(ScrapeError::Json(_))
        ));
    }

    #[test]
    fn parse_absent_or_empty_history() {
        let absent = r#"<script id="K3kOpe">{"symbol":"X"}</script>"#;
        let empty = r#"<script id="K3kOpe">{"historicalPrices":[]}</script>"#;
        assert!(matches!(parse_quote_page(absent), Err(ScrapeError::NoHistory)));
        assert!(matches!(parse_quote_page(empty), Err(ScrapeError::NoHistory)));
    }

    #[test]
    fn parse_records() {
        let html = r#"<script id="K3kOpe">{"historicalPrices":[{"date":1704153600,"open":1.0,"high":2.0,"low":0.5,"close":1.5,"volume":10}]}</script>"#;
        let prices = parse_quote_page(html).unwrap();
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].close, 1.5);
    }

    #[test]
    fn parse_float_epochs() {
        let html = r#"<script id="K3kOpe">{"historicalPrices":[{"date":1704153600.0,"open":1.0,"high":2.0,"low":0.5,"close":1.5,"volume":10.0},{"date":1704240000.75,"open":1.0,"high":2.0,"low":0.5,"close":1.7,"volume":12}]}</script>"#;
        let prices = parse_quote_page(html).unwrap();
        assert_eq!(prices.len(), 2);

        let series = to_series(&prices, range((2024, 1, 2), (2024, 1, 3)));
        let dates: Vec<String> = series
            .records()
            .iter()
            .map(|r| r.timestamp.to_string())
            .collect();
        assert_eq!(dates, vec!["2024-01-02", "2024-01-03"]);
    }

    #[test]
    fn to_series_floors_fractional_epoch() {
        // 2024-01-02 23:59:59.9 UTC
        let mut late = price(1704239999, 1.0);
        late.date += 0.9;
        let series = to_series(&[late], range((2024, 1, 2), (2024, 1, 2)));
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn to_series_filters_inclusive_and_sorts() {
        // 2024-01-05, 2024-01-02, 2024-01-03, 2024-01-04 (out of order)
        let prices = vec![
            price(1704412800, 4.0),
            price(1704153600, 1.0),
            price(1704240000, 2.0),
            price(1704326400, 3.0),
        ];
        let series = to_series(&prices, range((2024, 1, 2), (2024, 1, 4)));
        assert_eq!(series.layout(), SeriesLayout::Flat);
        let closes: Vec<f64> = series.records().iter().map(|r| r.close).collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
        assert!(series.records().iter().all(|r| r.adj_close.is_none()));
        assert_eq!(series.records()[0].volume, 1000);
    }

    #[test]
    fn to_series_outside_range_is_empty() {
        let prices = vec![price(1704153600, 1.0)];
        let series = to_series(&prices, range((2023, 1, 1), (2023, 12, 31)));
        assert!(series.is_empty());
    }

    #[test]
    fn to_series_uses_utc_date() {
        // 2024-01-02 23:30:00 UTC stays on the 2nd
        let prices = vec![price(1704238200, 1.0)];
        let series = to_series(&prices, range((2024, 1, 2), (2024, 1, 2)));
        assert_eq!(series.len(), 1);
    }
}
