//! Aggregates request parameters

use crate::Error;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Calendar unit of a bar's size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timespan {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Timespan {
    /// Path segment used by the aggregates endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            Timespan::Second => "second",
            Timespan::Minute => "minute",
            Timespan::Hour => "hour",
            Timespan::Day => "day",
            Timespan::Week => "week",
            Timespan::Month => "month",
            Timespan::Quarter => "quarter",
            Timespan::Year => "year",
        }
    }
}

impl FromStr for Timespan {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "second" | "s" => Ok(Self::Second),
            "minute" | "m" => Ok(Self::Minute),
            "hour" | "h" => Ok(Self::Hour),
            "day" | "d" => Ok(Self::Day),
            "week" | "w" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "quarter" | "q" => Ok(Self::Quarter),
            "year" | "y" => Ok(Self::Year),
            _ => Err(Error::InvalidTimespan(s.to_string())),
        }
    }
}

impl fmt::Display for Timespan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One bounded aggregates request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatesQuery {
    /// Ticker symbol (e.g., "TSLA", "X:BTCUSD")
    pub ticker: String,
    /// Number of `timespan` units per bar
    pub multiplier: u32,
    /// Bar size unit
    pub timespan: Timespan,
    /// First day of the range, inclusive
    pub from: NaiveDate,
    /// Last day of the range, inclusive
    pub to: NaiveDate,
    /// Maximum number of base aggregates the service may return
    pub limit: u32,
}

impl AggregatesQuery {
    /// Query for `ticker` with every other parameter at its default
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            ..Self::default()
        }
    }

    pub fn with_bar_size(mut self, multiplier: u32, timespan: Timespan) -> Self {
        self.multiplier = multiplier;
        self.timespan = timespan;
        self
    }

    pub fn with_range(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

impl Default for AggregatesQuery {
    fn default() -> Self {
        Self {
            ticker: "TSLA".to_string(),
            multiplier: 1,
            timespan: Timespan::Day,
            from: NaiveDate::from_ymd_opt(2021, 1, 9).unwrap_or_default(),
            to: NaiveDate::from_ymd_opt(2023, 1, 10).unwrap_or_default(),
            limit: 5000,
        }
    }
}
