//! Window slicing configuration

use crate::config::DEFAULT_COLUMNS;
use serde::{Deserialize, Serialize};

/// Window slicing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// First row of a single window
    pub start: usize,
    /// Rows per window (28 daily bars = 4 weeks)
    pub window_size: usize,
    /// Offset between consecutive rolling windows
    pub step: usize,
    /// Feature columns, in matrix column order
    pub columns: Vec<String>,
}

impl WindowConfig {
    /// Feature columns as borrowed names
    pub fn column_refs(&self) -> Vec<&str> {
        self.columns.iter().map(String::as_str).collect()
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            start: 0,
            window_size: 28,
            step: 1,
            columns: DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}
