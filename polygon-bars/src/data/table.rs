//! Column-oriented table of bar data

use crate::data::record::{Record, Value};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use ndarray::Array2;
use serde::Serialize;
use std::borrow::Cow;
use std::ops::Range;
use tracing::debug;

/// Name of the raw or decoded bar timestamp column
pub const TIMESTAMP_COLUMN: &str = "timestamp";
/// Name of the derived column read as a window's target
pub const CHANGE_COLUMN: &str = "change";

/// Unit of an integer epoch timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Seconds,
    Milliseconds,
    Microseconds,
    Nanoseconds,
}

impl TimeUnit {
    fn per_second(self) -> i64 {
        match self {
            TimeUnit::Seconds => 1,
            TimeUnit::Milliseconds => 1_000,
            TimeUnit::Microseconds => 1_000_000,
            TimeUnit::Nanoseconds => 1_000_000_000,
        }
    }

    /// Decode an epoch offset into a UTC-naive calendar timestamp
    pub fn decode(self, raw: i64) -> Result<NaiveDateTime> {
        let per_second = self.per_second();
        let secs = raw.div_euclid(per_second);
        let nanos = raw.rem_euclid(per_second) * (1_000_000_000 / per_second);
        DateTime::<Utc>::from_timestamp(secs, nanos as u32)
            .map(|dt| dt.naive_utc())
            .ok_or_else(|| Error::TimestampOutOfRange(raw.to_string()))
    }
}

/// Homogeneous column of values
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Column {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Timestamp(Vec<NaiveDateTime>),
}

impl Column {
    fn starting_with(value: Value, capacity: usize) -> Self {
        match value {
            Value::Int(v) => {
                let mut values = Vec::with_capacity(capacity);
                values.push(v);
                Column::Int(values)
            }
            Value::Float(v) => {
                let mut values = Vec::with_capacity(capacity);
                values.push(v);
                Column::Float(values)
            }
            Value::Timestamp(v) => {
                let mut values = Vec::with_capacity(capacity);
                values.push(v);
                Column::Timestamp(values)
            }
        }
    }

    /// Append a value, widening an integer column to float when needed
    fn push(&mut self, name: &str, value: Value) -> Result<()> {
        let widened = match (&mut *self, value) {
            (Column::Int(values), Value::Int(v)) => {
                values.push(v);
                None
            }
            (Column::Float(values), Value::Float(v)) => {
                values.push(v);
                None
            }
            (Column::Float(values), Value::Int(v)) => {
                values.push(v as f64);
                None
            }
            (Column::Int(values), Value::Float(v)) => {
                let mut floats: Vec<f64> = values.iter().map(|&i| i as f64).collect();
                floats.push(v);
                Some(Column::Float(floats))
            }
            (Column::Timestamp(values), Value::Timestamp(v)) => {
                values.push(v);
                None
            }
            _ => return Err(Error::MixedColumn(name.to_string())),
        };
        if let Some(column) = widened {
            *self = column;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Int(v) => v.len(),
            Column::Float(v) => v.len(),
            Column::Timestamp(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        match self {
            Column::Int(v) => v.get(index).copied().map(Value::Int),
            Column::Float(v) => v.get(index).copied().map(Value::Float),
            Column::Timestamp(v) => v.get(index).copied().map(Value::Timestamp),
        }
    }

    pub fn is_numeric(&self) -> bool {
        !matches!(self, Column::Timestamp(_))
    }

    /// Values as floats; borrowed for float columns, `None` for timestamps
    pub fn numeric(&self) -> Option<Cow<'_, [f64]>> {
        match self {
            Column::Int(v) => Some(Cow::Owned(v.iter().map(|&i| i as f64).collect())),
            Column::Float(v) => Some(Cow::Borrowed(v)),
            Column::Timestamp(_) => None,
        }
    }
}

impl From<Vec<i64>> for Column {
    fn from(values: Vec<i64>) -> Self {
        Column::Int(values)
    }
}

impl From<Vec<f64>> for Column {
    fn from(values: Vec<f64>) -> Self {
        Column::Float(values)
    }
}

impl From<Vec<NaiveDateTime>> for Column {
    fn from(values: Vec<NaiveDateTime>) -> Self {
        Column::Timestamp(values)
    }
}

/// Ordered named columns of equal length
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<(String, Column)>,
    rows: usize,
}

impl Table {
    /// Create an empty table with no columns
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from named columns, which must all have the same length
    pub fn from_columns<N: Into<String>>(columns: Vec<(N, Column)>) -> Result<Self> {
        let mut table = Self::new();
        for (name, column) in columns {
            table.set_column(name, column)?;
        }
        Ok(table)
    }

    /// Assemble records into a table, one row per record in input order.
    ///
    /// Column order follows the first record. Every later record must carry
    /// each of those fields.
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        let mut records = records.into_iter();
        let first = match records.next() {
            Some(record) => record,
            None => return Ok(Self::new()),
        };

        let capacity = records.len() + 1;
        let mut columns: Vec<(String, Column)> = first
            .iter()
            .map(|(name, value)| (name.to_string(), Column::starting_with(*value, capacity)))
            .collect();

        for record in records {
            for (name, column) in columns.iter_mut() {
                let value = record
                    .get(name)
                    .ok_or_else(|| Error::MissingField(name.clone()))?;
                column.push(name, *value)?;
            }
        }

        let table = Self::from_columns(columns)?;
        debug!("Assembled table with {} rows, {} columns", table.len(), table.width());
        Ok(table)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, column)| column)
            .ok_or_else(|| Error::ColumnNotFound(name.to_string()))
    }

    /// Column values as floats
    pub fn numeric_column(&self, name: &str) -> Result<Cow<'_, [f64]>> {
        self.column(name)?
            .numeric()
            .ok_or_else(|| Error::NonNumericColumn(name.to_string()))
    }

    /// Replace a column in place, or append it if the name is new
    pub fn set_column(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if !self.columns.is_empty() && column.len() != self.rows {
            return Err(Error::ColumnLength {
                column: name,
                expected: self.rows,
                actual: column.len(),
            });
        }

        self.rows = column.len();
        match self.columns.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = column,
            None => self.columns.push((name, column)),
        }
        Ok(())
    }

    /// Row at `index` as a record
    pub fn row(&self, index: usize) -> Option<Record> {
        if index >= self.rows {
            return None;
        }
        self.columns
            .iter()
            .map(|(name, column)| column.get(index).map(|value| (name.as_str(), value)))
            .collect()
    }

    /// Feature matrix of `columns` over every row
    pub fn to_matrix(&self, columns: &[&str]) -> Result<Array2<f64>> {
        self.to_matrix_rows(columns, 0..self.rows)
    }

    /// Feature matrix of `columns` over `rows`, clamped to the table length
    pub fn to_matrix_rows(&self, columns: &[&str], rows: Range<usize>) -> Result<Array2<f64>> {
        let end = rows.end.min(self.rows);
        let start = rows.start.min(end);
        let data = columns
            .iter()
            .map(|name| self.numeric_column(name))
            .collect::<Result<Vec<_>>>()?;

        Ok(Array2::from_shape_fn((end - start, data.len()), |(i, j)| {
            data[j][start + i]
        }))
    }

    /// Replace an integer epoch column with decoded calendar timestamps
    pub fn decode_timestamp(&mut self, name: &str, unit: TimeUnit) -> Result<()> {
        let decoded = match self.column(name)? {
            Column::Int(raw) => raw
                .iter()
                .map(|&v| unit.decode(v))
                .collect::<Result<Vec<_>>>()?,
            Column::Float(raw) => raw
                .iter()
                .map(|&v| {
                    if !(i64::MIN as f64..i64::MAX as f64).contains(&v) {
                        return Err(Error::TimestampOutOfRange(v.to_string()));
                    }
                    unit.decode(v as i64)
                })
                .collect::<Result<Vec<_>>>()?,
            Column::Timestamp(_) => return Ok(()),
        };
        self.set_column(name, Column::Timestamp(decoded))
    }
}

/// Append the `change` column: percentage change of `source` from the
/// previous row. The first row has no predecessor and is NaN.
pub fn add_change_column(table: &mut Table, source: &str) -> Result<()> {
    let change: Vec<f64> = {
        let values = table.numeric_column(source)?;
        std::iter::once(f64::NAN)
            .chain(values.windows(2).map(|w| w[1] / w[0] - 1.0))
            .take(values.len())
            .collect()
    };
    table.set_column(CHANGE_COLUMN, Column::Float(change))
}
