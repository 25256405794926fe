//! Min-max normalization

use crate::normalize::Normalizer;

/// Rescale linearly into [0, 1] by `(x - min) / (max - min)`
#[derive(Debug, Clone, Copy, Default)]
pub struct MinMax;

impl Normalizer for MinMax {
    fn name(&self) -> &str {
        "minmax"
    }

    fn normalize(&self, values: &[f64]) -> Vec<f64> {
        minmax_normalize(values)
    }
}

/// Min-max a column. NaN cells are left out of the bounds and stay NaN.
/// A constant column has zero range and maps to NaN.
pub fn minmax_normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;

    values.iter().map(|v| (v - min) / range).collect()
}
