//! Error types for the library layer.

use std::fmt;

/// Errors produced by the library layer, wrapping the quote page client
/// and adding serialization, input validation and export failures.
#[derive(Debug)]
pub enum TickerScopeError {
    /// An error from the underlying quote page client.
    Api(tickerscope_api::Error),
    /// JSON serialization or deserialization failed.
    Serialization(serde_json::Error),
    /// User-provided input failed validation.
    InvalidInput(String),
    /// An export was requested in a format other than csv, xlsx or slx.
    UnsupportedFormat(String),
    /// Encoding or writing an export failed.
    Export(String),
}

impl fmt::Display for TickerScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            Self::UnsupportedFormat(tag) => write!(f, "Unsupported file format: '{}'", tag),
            Self::Export(msg) => write!(f, "Export error: {}", msg),
        }
    }
}

impl std::error::Error for TickerScopeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<tickerscope_api::Error> for TickerScopeError {
    fn from(e: tickerscope_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<serde_json::Error> for TickerScopeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}

impl From<csv::Error> for TickerScopeError {
    fn from(e: csv::Error) -> Self {
        Self::Export(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for TickerScopeError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        Self::Export(e.to_string())
    }
}

impl From<std::io::Error> for TickerScopeError {
    fn from(e: std::io::Error) -> Self {
        Self::Export(e.to_string())
    }
}
