mod config;

use anyhow::{Context, Result};
use config::Config;
use polygon_bars::prelude::*;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

// Fetches one bar range from Polygon.io and prints its rolling windows as JSON lines

#[derive(Serialize)]
struct WindowLine<'a> {
    start: usize,
    rows: usize,
    target: f64,
    timestamp: &'a Value,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting bars adapter...");

    let config = Config::from_env()?;
    let client = match &config.base_url {
        Some(base_url) => PolygonClient::with_base_url(config.api_key.as_str(), base_url),
        None => PolygonClient::new(config.api_key.as_str()),
    };

    let bars = client
        .get_aggs(&config.query)
        .with_context(|| format!("failed to fetch bars for {}", config.query.ticker))?;

    let mut table = bars_to_table(&bars, true)?;
    add_change_column(&mut table, "close")?;
    normalize_(&config.normalization, &mut table, DEFAULT_COLUMNS)?;
    info!(
        "Normalized {} rows with {}",
        table.len(),
        config.normalization.name()
    );

    let windows = config.window.windows(&table)?;
    let step = config.window.step.max(1);
    for (i, window) in windows.iter().enumerate() {
        let line = WindowLine {
            start: i * step,
            rows: window.rows(),
            target: window.target,
            timestamp: &window.timestamp,
        };
        println!("{}", serde_json::to_string(&line)?);
    }

    info!("Wrote {} windows of {} rows", windows.len(), config.window.window_size);
    Ok(())
}
