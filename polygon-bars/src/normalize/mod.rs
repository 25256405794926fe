//! Normalization module
//!
//! Column rescaling strategies and their in-place application to a table.

pub mod minmax;
pub mod zscore;

pub use minmax::*;
pub use zscore::*;

use crate::data::{Column, Table};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, warn};

/// Normalizer trait for all column strategies
pub trait Normalizer {
    /// Get the name of the strategy
    fn name(&self) -> &str;

    /// Rescale one column using that column's own statistics
    fn normalize(&self, values: &[f64]) -> Vec<f64>;
}

/// Strategy selector, e.g. from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    #[default]
    ZScore,
    MinMax,
}

impl Normalizer for Normalization {
    fn name(&self) -> &str {
        match self {
            Normalization::ZScore => ZScore.name(),
            Normalization::MinMax => MinMax.name(),
        }
    }

    fn normalize(&self, values: &[f64]) -> Vec<f64> {
        match self {
            Normalization::ZScore => ZScore.normalize(values),
            Normalization::MinMax => MinMax.normalize(values),
        }
    }
}

impl FromStr for Normalization {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "zscore" | "z-score" | "z_score" => Ok(Self::ZScore),
            "minmax" | "min-max" | "min_max" => Ok(Self::MinMax),
            _ => Err(Error::InvalidNormalization(s.to_string())),
        }
    }
}

/// Normalize each of `columns` in place, column by column, in list order.
///
/// Every column is looked up before any is rewritten, so a missing or
/// non-numeric column leaves the table unchanged. Integer columns become
/// float columns. Unlisted columns are untouched.
pub fn normalize_<N>(normalizer: &N, table: &mut Table, columns: &[&str]) -> Result<()>
where
    N: Normalizer + ?Sized,
{
    for &name in columns {
        if !table.column(name)?.is_numeric() {
            return Err(Error::NonNumericColumn(name.to_string()));
        }
    }

    for &name in columns {
        let normalized = normalizer.normalize(&table.numeric_column(name)?);
        if normalized.iter().any(|v| !v.is_finite()) {
            warn!("{} normalization of `{}` produced non-finite values", normalizer.name(), name);
        }
        debug!("Normalized `{}` with {}", name, normalizer.name());
        table.set_column(name, Column::Float(normalized))?;
    }

    Ok(())
}
