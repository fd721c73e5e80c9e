use crate::model::fiterror::{FitError, FitResult};

use nalgebra::DVectorView;

/// Arithmetic mean. NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Dot product of two equally long slices.
///
/// Panics if the lengths differ.
pub fn dot(a: &[f64], b: &[f64]) -> f64 {
    let a = DVectorView::from_slice(a, a.len());
    let b = DVectorView::from_slice(b, b.len());
    a.dot(&b)
}

/// Residual sum of squares.
pub fn rss(residuals: &[f64]) -> f64 {
    residuals.iter().map(|r| r.powi(2)).sum()
}

/// Total sum of squares around the mean of `y`.
pub fn tss(y: &[f64]) -> f64 {
    let y_mean = mean(y);
    y.iter().map(|&yi| (yi - y_mean).powi(2)).sum()
}

/// Coefficient of determination, `1 - rss / tss`.
///
/// A constant target has no variance to explain, so `tss == 0` is reported
/// as [`FitError::ZeroTotalSumOfSquares`] instead of an infinite ratio.
pub fn r_squared(rss: f64, tss: f64) -> FitResult<f64> {
    if tss == 0.0 {
        return Err(FitError::ZeroTotalSumOfSquares);
    }
    Ok(1.0 - rss / tss)
}

/// Half mean squared error, `sum(r^2) / (2 * len(x))`.
///
/// The halving matches the gradients in [`crate::stats::LinReg::gradient`],
/// so it must not be "fixed" into a conventional MSE. An empty `x` gives NaN.
pub fn mean_squared_error(x: &[f64], residuals: &[f64]) -> f64 {
    rss(residuals) / (x.len() as f64 * 2.0)
}
