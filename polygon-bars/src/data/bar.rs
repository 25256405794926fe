//! OHLCV bar data structures

use crate::data::record::Record;
use crate::data::table::{Column, Table, TimeUnit, TIMESTAMP_COLUMN};
use crate::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Field names of a flattened bar, in table column order
pub const BAR_FIELDS: [&str; 8] = [
    "timestamp",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "vwap",
    "transactions",
];

/// One aggregate price bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Bar start, milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume
    pub volume: f64,
    /// Volume weighted average price
    pub vwap: f64,
    /// Number of transactions
    pub transactions: i64,
}

impl Bar {
    /// Create a new bar
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        timestamp: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        vwap: f64,
        transactions: i64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            vwap,
            transactions,
        }
    }

    /// Flatten into a field record, in [`BAR_FIELDS`] order
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.insert("timestamp", self.timestamp);
        record.insert("open", self.open);
        record.insert("high", self.high);
        record.insert("low", self.low);
        record.insert("close", self.close);
        record.insert("volume", self.volume);
        record.insert("vwap", self.vwap);
        record.insert("transactions", self.transactions);
        record
    }

    fn empty_columns() -> Vec<(&'static str, Column)> {
        BAR_FIELDS
            .iter()
            .map(|&name| {
                let column = match name {
                    "timestamp" | "transactions" => Column::Int(Vec::new()),
                    _ => Column::Float(Vec::new()),
                };
                (name, column)
            })
            .collect()
    }
}

/// Assemble bars into a table, one row per bar in input order.
///
/// With `convert_timestamp` the millisecond `timestamp` column is replaced by
/// UTC-naive calendar timestamps.
pub fn bars_to_table(bars: &[Bar], convert_timestamp: bool) -> Result<Table> {
    let mut table = if bars.is_empty() {
        Table::from_columns(Bar::empty_columns())?
    } else {
        Table::from_records(bars.iter().map(Bar::to_record).collect())?
    };

    if convert_timestamp {
        table.decode_timestamp(TIMESTAMP_COLUMN, TimeUnit::Milliseconds)?;
    }

    debug!("Flattened {} bars (convert_timestamp={})", bars.len(), convert_timestamp);
    Ok(table)
}
