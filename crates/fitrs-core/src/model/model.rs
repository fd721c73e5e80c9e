use crate::model::fiterror::{FitError, FitResult};
use crate::model::hyperparams::{finite, Hyperparameters};
use crate::model::summary::{FitSnapshot, FitSummary};
use crate::model::validate::validate_inputs;
use crate::stats::{mean_squared_error, r_squared, rss, shapiro_wilk, tss, LinReg};

use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Univariate linear model `y = theta_1 * x + theta_0` fitted by batch
/// gradient descent.
///
/// Parameters only change through a successful [`Model::fit`], which also
/// replaces the whole [`FitSummary`]. A failed fit leaves both untouched.
#[derive(Clone, Debug)]
pub struct Model {
    line: LinReg,
    hyper: Hyperparameters,
    summary: Option<FitSummary>,
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}, lr: {}, threshold: {}, r2: {:?}",
            self.line,
            self.hyper.learning_rate,
            self.hyper.convergence_threshold,
            self.r_squared()
        )
    }
}

impl Model {
    pub fn new(
        theta_0: f64,
        theta_1: f64,
        convergence_threshold: f64,
        learning_rate: f64,
    ) -> FitResult<Self> {
        let theta_0 = finite("theta_0", theta_0)?;
        let theta_1 = finite("theta_1", theta_1)?;
        let hyper = Hyperparameters::new(convergence_threshold, learning_rate)?;
        Ok(Self { line: LinReg::from_val(theta_0, theta_1), hyper, summary: None })
    }

    pub fn with_max_iterations(mut self, max_iterations: Option<u64>) -> Self {
        self.hyper.max_iterations = max_iterations;
        self
    }

    pub fn with_log_every(mut self, log_every: u64) -> Self {
        self.hyper.log_every = log_every;
        self
    }

    pub fn theta_0(&self) -> f64 {
        self.line.intercept
    }
    pub fn theta_1(&self) -> f64 {
        self.line.slope
    }
    pub fn line(&self) -> LinReg {
        self.line
    }
    pub fn hyperparameters(&self) -> &Hyperparameters {
        &self.hyper
    }
    pub fn learning_rate(&self) -> f64 {
        self.hyper.learning_rate
    }
    pub fn convergence_threshold(&self) -> f64 {
        self.hyper.convergence_threshold
    }
    pub fn max_iterations(&self) -> Option<u64> {
        self.hyper.max_iterations
    }

    pub fn summary(&self) -> Option<&FitSummary> {
        self.summary.as_ref()
    }
    pub fn is_fitted(&self) -> bool {
        self.summary.is_some()
    }
    /// Residuals stored by the last successful fit.
    pub fn residuals_fitted(&self) -> Option<&[f64]> {
        self.summary.as_ref().map(|s| s.residuals.as_slice())
    }
    pub fn r_squared(&self) -> Option<f64> {
        self.summary.as_ref().map(|s| s.r_squared)
    }
    pub fn w_stat(&self) -> Option<f64> {
        self.summary.as_ref().map(FitSummary::w_stat)
    }
    pub fn p_value(&self) -> Option<f64> {
        self.summary.as_ref().map(FitSummary::p_value)
    }
    pub fn fit_duration(&self) -> Option<Duration> {
        self.summary.as_ref().map(|s| s.fit_duration)
    }

    pub fn snapshot(&self) -> Option<FitSnapshot> {
        let s = self.summary.as_ref()?;
        Some(FitSnapshot {
            theta_0: self.theta_0(),
            theta_1: self.theta_1(),
            learning_rate: self.hyper.learning_rate,
            convergence_threshold: self.hyper.convergence_threshold,
            r_squared: s.r_squared,
            w_stat: s.w_stat(),
            p_value: s.p_value(),
            fit_duration_s: s.fit_duration.as_secs_f64(),
            iterations: s.iterations,
            initial_loss: s.initial_loss,
            final_loss: s.final_loss,
            n_samples: s.residuals.len(),
        })
    }

    pub fn predict(&self, x: &[f64]) -> Vec<f64> {
        self.line.predict(x)
    }

    /// Predicted minus actual at the current parameters. Does not touch the
    /// stored residuals.
    pub fn residuals(&self, x: &[f64], y: &[f64]) -> FitResult<Vec<f64>> {
        if x.len() != y.len() {
            return Err(FitError::LengthMismatch { len_x: x.len(), len_y: y.len() });
        }
        Ok(self.line.residuals(x, y))
    }

    /// Runs gradient descent from the current parameters until one step
    /// improves the loss by less than the convergence threshold, then
    /// computes the derived statistics.
    pub fn fit(&mut self, x: &[f64], y: &[f64]) -> FitResult<()> {
        validate_inputs(x, y)?;
        let (line, summary) = self.descend(x, y)?;
        self.line = line;
        self.summary = Some(summary);
        Ok(())
    }

    fn descend(&self, x: &[f64], y: &[f64]) -> FitResult<(LinReg, FitSummary)> {
        let _span = tracing::info_span!("fit", n = x.len()).entered();
        let Hyperparameters { learning_rate, convergence_threshold, max_iterations, log_every } =
            self.hyper;

        let start_time = Instant::now();
        let mut line = self.line;
        let mut residuals = line.residuals(x, y);
        let initial_loss = mean_squared_error(x, &residuals);
        info!(initial_loss, learning_rate, convergence_threshold, "starting gradient descent");

        let mut loss = initial_loss;
        // the first comparison is against the initial loss itself
        let mut diff = initial_loss;
        let mut iterations: u64 = 0;

        while diff >= convergence_threshold {
            if let Some(max) = max_iterations {
                if iterations >= max {
                    return Err(FitError::IterationLimit { max });
                }
            }

            let loss_before = loss;
            line = line.step(x, &residuals, learning_rate);
            residuals = line.residuals(x, y);
            let loss_after = mean_squared_error(x, &residuals);
            iterations += 1;

            if !loss_after.is_finite() || !line.is_finite() {
                return Err(FitError::Diverged { iterations });
            }

            diff = loss_before - loss_after;
            loss = loss_after;

            if log_every > 0 && iterations % log_every == 0 {
                debug!(
                    iterations,
                    loss_diff = diff,
                    theta_0 = line.intercept,
                    theta_1 = line.slope,
                    "gradient descent progress"
                );
            }
        }

        if diff < 0.0 {
            warn!(
                iterations,
                loss_diff = diff,
                "last step increased the loss, learning rate may be too large"
            );
        }

        let r_squared = r_squared(rss(&residuals), tss(y))?;
        let normality = shapiro_wilk(&residuals)
            .ok_or(FitError::TooFewForNormality { n: residuals.len() })?;
        let fit_duration = start_time.elapsed();

        info!(
            iterations,
            theta_0 = line.intercept,
            theta_1 = line.slope,
            r_squared,
            elapsed_s = fit_duration.as_secs_f64(),
            "gradient descent converged"
        );

        Ok((
            line,
            FitSummary {
                residuals,
                normality,
                r_squared,
                fit_duration,
                iterations,
                initial_loss,
                final_loss: loss,
            },
        ))
    }
}
