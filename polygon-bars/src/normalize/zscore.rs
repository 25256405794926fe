//! Z-score normalization

use crate::normalize::Normalizer;

/// Rescale by `(x - mean) / std`, using the population standard deviation
#[derive(Debug, Clone, Copy, Default)]
pub struct ZScore;

impl Normalizer for ZScore {
    fn name(&self) -> &str {
        "zscore"
    }

    fn normalize(&self, values: &[f64]) -> Vec<f64> {
        zscore_normalize(values)
    }
}

/// Z-score a column. NaN cells are left out of the statistics and stay NaN.
/// A constant column has zero deviation and maps to NaN.
pub fn zscore_normalize(values: &[f64]) -> Vec<f64> {
    let present = || values.iter().filter(|v| !v.is_nan());
    let n = present().count() as f64;
    let mean = present().sum::<f64>() / n;
    let std = (present().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();

    values.iter().map(|v| (v - mean) / std).collect()
}
