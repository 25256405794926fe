//! Windowing module
//!
//! Fixed-length row slices reduced to one training example each.

use crate::config::WindowConfig;
use crate::data::{Table, Value, CHANGE_COLUMN, TIMESTAMP_COLUMN};
use crate::{Error, Result};
use ndarray::Array2;
use tracing::warn;

/// One training example cut from a table
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    /// Feature matrix, `[rows, columns]`
    pub data: Array2<f64>,
    /// `change` of the last row
    pub target: f64,
    /// `timestamp` of the last row, raw or decoded
    pub timestamp: Value,
}

impl Window {
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }
}

/// Slice rows `[n, n + window_size)` of `table`.
///
/// A range running past the last row is truncated, not rejected, so the
/// matrix may hold fewer than `window_size` rows. Use
/// [`create_window_strict`] to reject it instead.
pub fn create_window(table: &Table, n: usize, window_size: usize, columns: &[&str]) -> Result<Window> {
    let end = n.saturating_add(window_size);
    let data = table.to_matrix_rows(columns, n..end)?;
    let change = table.column(CHANGE_COLUMN)?;
    let timestamps = table.column(TIMESTAMP_COLUMN)?;

    let rows = data.nrows();
    if rows == 0 {
        return Err(Error::EmptyWindow {
            start: n,
            len: table.len(),
        });
    }
    if rows < window_size {
        warn!(
            "Window [{}, {}) truncated to {} rows of a {} row table",
            n,
            end,
            rows,
            table.len()
        );
    }

    let last = n + rows - 1;
    let target = change
        .get(last)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| Error::NonNumericColumn(CHANGE_COLUMN.to_string()))?;
    let timestamp = timestamps.get(last).ok_or(Error::EmptyWindow {
        start: n,
        len: table.len(),
    })?;

    Ok(Window {
        data,
        target,
        timestamp,
    })
}

/// Like [`create_window`], but a range past the last row is an error
pub fn create_window_strict(
    table: &Table,
    n: usize,
    window_size: usize,
    columns: &[&str],
) -> Result<Window> {
    let end = n.saturating_add(window_size);
    if end > table.len() {
        return Err(Error::WindowOutOfRange {
            start: n,
            end,
            len: table.len(),
        });
    }
    create_window(table, n, window_size, columns)
}

/// Every full window of `window_size` rows, starting at row 0 and advancing
/// by `step` rows (a zero step advances by one)
pub fn rolling_windows(
    table: &Table,
    window_size: usize,
    step: usize,
    columns: &[&str],
) -> Result<Vec<Window>> {
    if window_size == 0 || window_size > table.len() {
        return Ok(Vec::new());
    }

    (0..=table.len() - window_size)
        .step_by(step.max(1))
        .map(|n| create_window(table, n, window_size, columns))
        .collect()
}

impl WindowConfig {
    /// Single window at `start`
    pub fn window(&self, table: &Table) -> Result<Window> {
        create_window(table, self.start, self.window_size, &self.column_refs())
    }

    /// Rolling windows over the whole table
    pub fn windows(&self, table: &Table) -> Result<Vec<Window>> {
        rolling_windows(table, self.window_size, self.step, &self.column_refs())
    }
}
