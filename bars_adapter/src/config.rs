use anyhow::{Context, Result};
use chrono::NaiveDate;
use dotenv::dotenv;
use polygon_bars::prelude::{AggregatesQuery, Normalization, WindowConfig};
use std::str::FromStr;

pub struct Config {
    pub api_key: String,
    pub base_url: Option<String>,
    pub query: AggregatesQuery,
    pub normalization: Normalization,
    pub window: WindowConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let defaults = AggregatesQuery::default();
        let window_defaults = WindowConfig::default();

        Ok(Config {
            api_key: std::env::var("POLYGON_API_KEY").context("POLYGON_API_KEY is not set")?,
            base_url: std::env::var("POLYGON_BASE_URL").ok(),
            query: AggregatesQuery {
                ticker: std::env::var("BARS_TICKER").unwrap_or(defaults.ticker),
                multiplier: env_or("BARS_MULTIPLIER", defaults.multiplier)?,
                timespan: env_or("BARS_TIMESPAN", defaults.timespan)?,
                from: env_date_or("BARS_FROM", defaults.from)?,
                to: env_date_or("BARS_TO", defaults.to)?,
                limit: env_or("BARS_LIMIT", defaults.limit)?,
            },
            normalization: env_or("BARS_NORMALIZATION", Normalization::default())?,
            window: WindowConfig {
                window_size: env_or("BARS_WINDOW_SIZE", window_defaults.window_size)?,
                step: env_or("BARS_WINDOW_STEP", window_defaults.step)?,
                ..window_defaults
            },
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("invalid {}: {}", key, raw)),
        Err(_) => Ok(default),
    }
}

fn env_date_or(key: &str, default: NaiveDate) -> Result<NaiveDate> {
    match std::env::var(key) {
        Ok(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .with_context(|| format!("invalid {}: {}", key, raw)),
        Err(_) => Ok(default),
    }
}
