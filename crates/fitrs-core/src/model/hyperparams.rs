use crate::model::fiterror::{FitError, FitResult};

use serde::Serialize;

/// Settings of the descent loop. Validated once, never changed by fitting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hyperparameters {
    pub learning_rate: f64,
    pub convergence_threshold: f64,
    /// `None` runs until the loss stops improving, however long that takes.
    pub max_iterations: Option<u64>,
    /// Iterations between progress events, 0 disables them.
    pub log_every: u64,
}

impl Hyperparameters {
    pub const DEFAULT_LOG_EVERY: u64 = 1000;

    pub fn new(convergence_threshold: f64, learning_rate: f64) -> FitResult<Self> {
        let learning_rate = positive("learning_rate", learning_rate)?;
        let convergence_threshold = positive("convergence_threshold", convergence_threshold)?;
        Ok(Self {
            learning_rate,
            convergence_threshold,
            max_iterations: None,
            log_every: Self::DEFAULT_LOG_EVERY,
        })
    }
}

pub(crate) fn finite(name: &'static str, value: f64) -> FitResult<f64> {
    if !value.is_finite() {
        return Err(FitError::NonFiniteParameter { name, value });
    }
    Ok(value)
}

pub(crate) fn positive(name: &'static str, value: f64) -> FitResult<f64> {
    let value = finite(name, value)?;
    if value <= 0.0 {
        return Err(FitError::NonPositiveParameter { name, value });
    }
    Ok(value)
}
