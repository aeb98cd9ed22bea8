use chrono::NaiveDate;
use tickerscope_api::{earliest_date, Exchange, Interval, Period};

use crate::error::TickerScopeError;
use crate::export::ExportFormat;

pub const MAX_SYMBOL_LENGTH: usize = 32;

/// Date formats accepted for `--start` / `--end`, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim
/// whitespace, and enforce the symbol byte-length limit.
///
/// An empty result is allowed: an empty symbol is passed to the provider,
/// which answers with no data.
pub fn sanitize_symbol(input: &str) -> Result<String, TickerScopeError> {
    if input.len() > MAX_SYMBOL_LENGTH {
        return Err(TickerScopeError::InvalidInput(format!(
            "symbol exceeds maximum length of {} bytes",
            MAX_SYMBOL_LENGTH
        )));
    }
    Ok(input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string())
}

/// Validate an exchange name, case-insensitive. `none` or an empty string
/// selects no exchange.
pub fn validate_exchange(input: &str) -> Result<Option<Exchange>, TickerScopeError> {
    let upper = input.trim().to_uppercase();
    if upper.is_empty() || upper == "NONE" {
        return Ok(None);
    }
    upper.parse::<Exchange>().map(Some).map_err(|_| {
        TickerScopeError::InvalidInput(format!(
            "unknown exchange '{}'. Valid exchanges: NSE, BSE, NASDAQ, NYSE, none",
            input
        ))
    })
}

/// Validate a period name (`1d` ... `10y`, `ytd`, `max`), case-insensitive.
pub fn validate_period(input: &str) -> Result<Period, TickerScopeError> {
    input.trim().to_lowercase().parse::<Period>().map_err(|_| {
        TickerScopeError::InvalidInput(format!(
            "unknown period '{}'. Valid periods: {}",
            input,
            join(Period::ALL.iter())
        ))
    })
}

/// Validate an interval name (`1m` ... `3mo`), case-insensitive.
pub fn validate_interval(input: &str) -> Result<Interval, TickerScopeError> {
    input.trim().to_lowercase().parse::<Interval>().map_err(|_| {
        TickerScopeError::InvalidInput(format!(
            "unknown interval '{}'. Valid intervals: {}",
            input,
            join(Interval::ALL.iter())
        ))
    })
}

/// Validate a date in `YYYY-MM-DD` or `DD/MM/YYYY` form, no earlier than
/// 1980-01-01.
pub fn validate_date(input: &str) -> Result<NaiveDate, TickerScopeError> {
    let trimmed = input.trim();
    let date = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| {
            TickerScopeError::InvalidInput(format!(
                "invalid date '{}'. Expected format: YYYY-MM-DD (e.g., 2024-06-01)",
                trimmed
            ))
        })?;
    if date < earliest_date() {
        return Err(TickerScopeError::InvalidInput(format!(
            "date {} is before the earliest supported date {}",
            date,
            earliest_date()
        )));
    }
    Ok(date)
}

/// Validate an export format tag, case-insensitive.
pub fn validate_export_format(input: &str) -> Result<ExportFormat, TickerScopeError> {
    input.trim().to_lowercase().parse::<ExportFormat>()
}

fn join<T: std::fmt::Display>(items: impl Iterator<Item = T>) -> String {
    items.map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
