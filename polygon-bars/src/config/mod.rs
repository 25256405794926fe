//! Configuration module

pub mod window;

pub use window::*;

/// Numeric bar columns normalized and windowed when no list is given
pub const DEFAULT_COLUMNS: &[&str] = &[
    "open",
    "high",
    "low",
    "close",
    "volume",
    "vwap",
    "transactions",
];
