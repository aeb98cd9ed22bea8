//! Library layer for tickerscope: parameter collection, memoized price
//! loading from Yahoo Finance and Google Finance, descriptive statistics
//! and file export.
//!
//! Wraps the `tickerscope_api` crate's query types and quote page client
//! with a process-wide fetch cache and fail-safe loaders that turn every
//! provider failure into an explicit [`FetchOutcome`].

pub mod analysis;
pub mod cache;
pub mod collector;
pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod scrape;
pub mod validation;
pub mod yahoo;

pub use tickerscope_api;
pub use tickerscope_api::types;
pub use tickerscope_api::{DateRange, Exchange, HistoryQuery, Interval, Period, Span};

pub use collector::{collect, Collected, Notice, RawParams};
pub use config::Config;
pub use error::TickerScopeError;
pub use export::{ExportBlob, ExportFormat};
pub use loader::{FetchOutcome, Loader, Provider};
pub use scrape::{ScrapeClient, ScrapeError};
pub use yahoo::{ChartSource, YahooClient, YahooError};
