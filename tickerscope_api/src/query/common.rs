//! Enumerations shared by all history queries: [`Exchange`], [`Period`], [`Interval`].

use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};

use super::DateRange;

/// Earliest date the tool will ask a provider for (1980-01-01).
pub fn earliest_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1980, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Stock exchange a symbol is listed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Exchange {
    Nse,
    Bse,
    Nasdaq,
    Nyse,
}

impl Exchange {
    /// Suffix appended to a symbol for the Yahoo chart API.
    ///
    /// Only the Indian exchanges carry one; US listings use the bare symbol.
    pub fn yahoo_suffix(&self) -> &'static str {
        match self {
            Exchange::Nse => ".NS",
            Exchange::Bse => ".BO",
            Exchange::Nasdaq | Exchange::Nyse => "",
        }
    }

    /// Exchange code appended (after a colon) to build a Google Finance id.
    pub fn google_code(&self) -> &'static str {
        match self {
            Exchange::Nse => "NSE",
            Exchange::Bse => "BOM",
            Exchange::Nasdaq => "NASDAQ",
            Exchange::Nyse => "NYSE",
        }
    }
}

impl std::fmt::Display for Exchange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Exchange::Nse => "NSE",
                Exchange::Bse => "BSE",
                Exchange::Nasdaq => "NASDAQ",
                Exchange::Nyse => "NYSE",
            }
        )
    }
}

impl FromStr for Exchange {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NSE" => Ok(Exchange::Nse),
            "BSE" => Ok(Exchange::Bse),
            "NASDAQ" => Ok(Exchange::Nasdaq),
            "NYSE" => Ok(Exchange::Nyse),
            _ => Err(()),
        }
    }
}

/// Relative trailing window, used instead of an explicit start/end pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Period {
    OneDay,
    FiveDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
    TenYears,
    YearToDate,
    Max,
}

impl Period {
    pub const ALL: [Period; 11] = [
        Period::OneDay,
        Period::FiveDays,
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::TwoYears,
        Period::FiveYears,
        Period::TenYears,
        Period::YearToDate,
        Period::Max,
    ];

    /// Resolves the window into concrete dates ending on `today`.
    pub fn resolve(&self, today: NaiveDate) -> DateRange {
        let start = match self {
            Period::OneDay => today.checked_sub_days(Days::new(1)),
            Period::FiveDays => today.checked_sub_days(Days::new(5)),
            Period::OneMonth => today.checked_sub_months(Months::new(1)),
            Period::ThreeMonths => today.checked_sub_months(Months::new(3)),
            Period::SixMonths => today.checked_sub_months(Months::new(6)),
            Period::OneYear => today.checked_sub_months(Months::new(12)),
            Period::TwoYears => today.checked_sub_months(Months::new(24)),
            Period::FiveYears => today.checked_sub_months(Months::new(60)),
            Period::TenYears => today.checked_sub_months(Months::new(120)),
            Period::YearToDate => NaiveDate::from_ymd_opt(today.year(), 1, 1),
            Period::Max => Some(earliest_date()),
        }
        .unwrap_or_else(earliest_date)
        .max(earliest_date());
        DateRange::clamped(start, today).0
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Period::OneDay => "1d",
                Period::FiveDays => "5d",
                Period::OneMonth => "1mo",
                Period::ThreeMonths => "3mo",
                Period::SixMonths => "6mo",
                Period::OneYear => "1y",
                Period::TwoYears => "2y",
                Period::FiveYears => "5y",
                Period::TenYears => "10y",
                Period::YearToDate => "ytd",
                Period::Max => "max",
            }
        )
    }
}

impl FromStr for Period {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|p| p.to_string() == s)
            .ok_or(())
    }
}

/// Sampling granularity of price records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Interval {
    OneMinute,
    TwoMinutes,
    FiveMinutes,
    FifteenMinutes,
    ThirtyMinutes,
    SixtyMinutes,
    NinetyMinutes,
    OneHour,
    OneDay,
    FiveDays,
    OneWeek,
    OneMonth,
    ThreeMonths,
}

impl Interval {
    pub const ALL: [Interval; 13] = [
        Interval::OneMinute,
        Interval::TwoMinutes,
        Interval::FiveMinutes,
        Interval::FifteenMinutes,
        Interval::ThirtyMinutes,
        Interval::SixtyMinutes,
        Interval::NinetyMinutes,
        Interval::OneHour,
        Interval::OneDay,
        Interval::FiveDays,
        Interval::OneWeek,
        Interval::OneMonth,
        Interval::ThreeMonths,
    ];

    /// True for sub-daily intervals, whose records carry a time of day.
    pub fn is_intraday(&self) -> bool {
        matches!(
            self,
            Interval::OneMinute
                | Interval::TwoMinutes
                | Interval::FiveMinutes
                | Interval::FifteenMinutes
                | Interval::ThirtyMinutes
                | Interval::SixtyMinutes
                | Interval::NinetyMinutes
                | Interval::OneHour
        )
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Interval::OneMinute => "1m",
                Interval::TwoMinutes => "2m",
                Interval::FiveMinutes => "5m",
                Interval::FifteenMinutes => "15m",
                Interval::ThirtyMinutes => "30m",
                Interval::SixtyMinutes => "60m",
                Interval::NinetyMinutes => "90m",
                Interval::OneHour => "1h",
                Interval::OneDay => "1d",
                Interval::FiveDays => "5d",
                Interval::OneWeek => "1wk",
                Interval::OneMonth => "1mo",
                Interval::ThreeMonths => "3mo",
            }
        )
    }
}

impl FromStr for Interval {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Interval::ALL
            .into_iter()
            .find(|i| i.to_string() == s)
            .ok_or(())
    }
}
