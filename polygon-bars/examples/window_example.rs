//! Example: normalizing synthetic bars and slicing training windows

use polygon_bars::prelude::*;

const DAY_MS: i64 = 86_400_000;

fn create_test_bars(count: usize, base_price: f64) -> Vec<Bar> {
    let mut bars = Vec::new();
    // 2022-01-03 00:00:00 UTC
    let base_time = 1_641_168_000_000;

    for i in 0..count {
        // Add some volatility
        let volatility = (i as f64 % 10.0) * 0.5;
        let trend = if i < count / 2 { 0.1 } else { -0.1 }; // Up then down
        let price = base_price + (i as f64 * trend) + volatility;

        bars.push(Bar::new(
            base_time + i as i64 * DAY_MS,
            price,
            price + 1.0,
            price - 1.0,
            price + 0.2,
            1000.0 + volatility * 100.0,
            price + 0.05,
            200 + i as i64,
        ));
    }

    bars
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let bars = create_test_bars(60, 100.0);
    let mut table = bars_to_table(&bars, true)?;
    add_change_column(&mut table, "close")?;
    normalize_(&MinMax, &mut table, DEFAULT_COLUMNS)?;

    let config = WindowConfig {
        step: 7,
        ..WindowConfig::default()
    };
    for window in config.windows(&table)? {
        println!(
            "{:?} rows x cols, target {:+.4}, ends {:?}",
            window.data.dim(),
            window.target,
            window.timestamp
        );
    }

    Ok(())
}
