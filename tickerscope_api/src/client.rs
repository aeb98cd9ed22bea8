//! HTTP client for Google Finance quote pages.

use std::time::Duration;

use url::Url;

use crate::{user_agent::get_user_agent, Error};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for Google Finance quote pages.
///
/// Sends requests with browser-like headers and a randomized user agent.
/// Each request builds a fresh `reqwest::Client` with the configured timeout.
pub struct Client {
    /// Base URL for the site. Defaults to `https://www.google.com`.
    base_url: String,
    timeout: Duration,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a new client pointing at the production site.
    pub fn new() -> Self {
        Self {
            base_url: "https://www.google.com".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Overrides the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds `{base}/finance/quote/{google_id}`, percent-encoding the id as a path segment.
    pub fn quote_url(&self, google_id: &str) -> Result<Url, Error> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            tracing::error!("Invalid URL constructed: {}", e);
            Error::RequestFailed
        })?;
        url.path_segments_mut()
            .map_err(|_| {
                tracing::error!("Base URL cannot hold a path: {}", self.base_url);
                Error::RequestFailed
            })?
            .pop_if_empty()
            .extend(["finance", "quote", google_id]);
        Ok(url)
    }

    /// Fetches the raw HTML of the quote page for a provider-specific id
    /// such as `RELIANCE:NSE`.
    pub async fn get_quote_page(&self, google_id: &str) -> Result<String, Error> {
        let url = self.quote_url(google_id)?;
        let client = reqwest::Client::builder()
            .user_agent(get_user_agent())
            .timeout(self.timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed
            })?;
        let resp = client
            .get(url)
            .header("accept", "text/html,application/xhtml+xml")
            .header("accept-language", "en-US,en;q=0.9")
            .header("upgrade-insecure-requests", "1")
            .header("cache-control", "no-cache")
            .header("pragma", "no-cache")
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to get quote page: {}", e);
                Error::RequestFailed
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| {
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed
        })?;

        if !status.is_success() {
            let snippet = truncate_body(&body);
            tracing::error!("Request failed with status {}: {}", status, snippet);
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                body: snippet,
            });
        }

        Ok(body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut cut = MAX;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...[truncated]", &body[..cut])
    }
}
