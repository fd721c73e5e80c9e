use crate::stats::ShapiroWilk;

use serde::Serialize;
use std::time::Duration;

/// Statistics derived from one successful fit.
#[derive(Clone, Debug, PartialEq)]
pub struct FitSummary {
    /// Predicted minus actual at the fitted parameters, one per training point.
    pub residuals: Vec<f64>,
    pub normality: ShapiroWilk,
    pub r_squared: f64,
    pub fit_duration: Duration,
    pub iterations: u64,
    pub initial_loss: f64,
    pub final_loss: f64,
}

impl FitSummary {
    pub fn w_stat(&self) -> f64 {
        self.normality.w
    }
    pub fn p_value(&self) -> f64 {
        self.normality.p_value
    }
}

/// Flat, serialisable view of a fitted model for reports and `--json`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FitSnapshot {
    pub theta_0: f64,
    pub theta_1: f64,
    pub learning_rate: f64,
    pub convergence_threshold: f64,
    pub r_squared: f64,
    pub w_stat: f64,
    pub p_value: f64,
    pub fit_duration_s: f64,
    pub iterations: u64,
    pub initial_loss: f64,
    pub final_loss: f64,
    pub n_samples: usize,
}
