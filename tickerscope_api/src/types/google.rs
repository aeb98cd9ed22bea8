//! JSON payload embedded in Google Finance quote pages.

use serde::{Deserialize, Serialize};

/// Object held by the quote page's data script element.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct QuotePagePayload {
    /// Missing on pages without history; an empty array means the same.
    #[serde(default)]
    pub historical_prices: Option<Vec<GooglePrice>>,
}

/// One daily bar as published on the quote page.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GooglePrice {
    /// Seconds since the Unix epoch. Published either as an integer or as
    /// a float.
    pub date: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}
