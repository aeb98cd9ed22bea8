//! Runtime configuration read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use tickerscope_api::Client;

pub const DEFAULT_GOOGLE_BASE_URL: &str = "https://www.google.com";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL for Google Finance quote pages (`TICKERSCOPE_GOOGLE_BASE_URL`).
    pub google_base_url: String,
    /// Per-request HTTP timeout (`TICKERSCOPE_HTTP_TIMEOUT_SECS`).
    pub http_timeout: Duration,
    /// Directory export files are written to (`TICKERSCOPE_EXPORT_DIR`).
    pub export_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            google_base_url: DEFAULT_GOOGLE_BASE_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            export_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Reads the process environment. Unset or unparsable values fall back
    /// to the defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let google_base_url = env_string(&lookup, "TICKERSCOPE_GOOGLE_BASE_URL")
            .unwrap_or_else(|| DEFAULT_GOOGLE_BASE_URL.to_string());
        let timeout_secs = env_u64(
            &lookup,
            "TICKERSCOPE_HTTP_TIMEOUT_SECS",
            DEFAULT_HTTP_TIMEOUT_SECS,
        )
        .max(1);
        let export_dir = env_string(&lookup, "TICKERSCOPE_EXPORT_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            google_base_url,
            http_timeout: Duration::from_secs(timeout_secs),
            export_dir,
        }
    }

    /// Quote page client using the configured base URL and timeout.
    pub fn google_client(&self) -> Client {
        Client::with_base_url(&self.google_base_url).with_timeout(self.http_timeout)
    }
}

fn env_string(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

fn env_u64(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> u64 {
    lookup(key)
        .and_then(|val| val.trim().parse::<u64>().ok())
        .unwrap_or(default)
}
