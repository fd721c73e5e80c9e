use crate::model::fiterror::{FitError, FitResult};

/// Checks training data before any computation: both arrays non-empty, of
/// equal length and made of finite numbers.
pub fn validate_inputs(x: &[f64], y: &[f64]) -> FitResult<()> {
    if x.is_empty() {
        return Err(FitError::EmptyInput { name: "x" });
    }
    if y.is_empty() {
        return Err(FitError::EmptyInput { name: "y" });
    }
    if x.len() != y.len() {
        return Err(FitError::LengthMismatch { len_x: x.len(), len_y: y.len() });
    }
    if let Some(index) = x.iter().position(|v| !v.is_finite()) {
        return Err(FitError::NonFiniteInput { name: "x", index });
    }
    if let Some(index) = y.iter().position(|v| !v.is_finite()) {
        return Err(FitError::NonFiniteInput { name: "y", index });
    }
    Ok(())
}
