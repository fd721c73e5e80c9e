use crate::stats::stats::{dot, mean};

use serde::Serialize;
use std::fmt;

/// Straight line `y = slope * x + intercept`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LinReg {
    pub intercept: f64,
    pub slope: f64,
}

impl fmt::Display for LinReg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "y = {} * x + {}", self.slope, self.intercept)
    }
}

impl LinReg {
    pub fn from_val(intercept: f64, slope: f64) -> Self {
        Self { intercept, slope }
    }
    pub fn calculate(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
    pub fn is_finite(&self) -> bool {
        self.intercept.is_finite() && self.slope.is_finite()
    }

    pub fn predict(&self, x: &[f64]) -> Vec<f64> {
        x.iter().map(|&xi| self.calculate(xi)).collect()
    }

    /// Predicted minus actual, pairwise. Extra elements of the longer slice
    /// are ignored; callers check lengths.
    pub fn residuals(&self, x: &[f64], y: &[f64]) -> Vec<f64> {
        x.iter().zip(y).map(|(&xi, &yi)| self.calculate(xi) - yi).collect()
    }

    /// Partial derivatives of the half-MSE loss with respect to
    /// (intercept, slope).
    pub fn gradient(x: &[f64], residuals: &[f64]) -> (f64, f64) {
        let d_intercept = mean(residuals);
        let d_slope = dot(residuals, x) / x.len() as f64;
        (d_intercept, d_slope)
    }

    /// One batch gradient-descent update.
    pub fn step(&self, x: &[f64], residuals: &[f64], learning_rate: f64) -> Self {
        let (d_intercept, d_slope) = Self::gradient(x, residuals);
        Self {
            intercept: self.intercept - learning_rate * d_intercept,
            slope: self.slope - learning_rate * d_slope,
        }
    }

    /// Closed-form ordinary least squares. `None` when `x` has no variance
    /// or the slices are empty or of different lengths.
    pub fn least_squares(x: &[f64], y: &[f64]) -> Option<Self> {
        if x.is_empty() || x.len() != y.len() {
            return None;
        }
        let avg_x = mean(x);
        let avg_y = mean(y);

        let ss_xx: f64 = x.iter().map(|&xi| (xi - avg_x).powi(2)).sum();
        if !ss_xx.is_finite() || ss_xx <= f64::EPSILON {
            return None;
        }
        let ss_xy: f64 = x.iter().zip(y).map(|(&xi, &yi)| (xi - avg_x) * (yi - avg_y)).sum();

        let slope = ss_xy / ss_xx;
        let intercept = avg_y - slope * avg_x;
        Some(Self { intercept, slope })
    }
}

#[cfg(test)]
mod tests {
    use super::LinReg;
    use approx::assert_relative_eq;

    #[test]
    fn test_predict_is_linear() {
        let line = LinReg::from_val(-1.5, 2.0);
        let x = [0.0, 1.0, -3.0, 10.5];
        let y_hat = line.predict(&x);
        for (xi, yi) in x.iter().zip(&y_hat) {
            assert_eq!(*yi, 2.0 * xi - 1.5);
        }
    }

    #[test]
    fn test_predict_empty() {
        assert!(LinReg::from_val(3.0, 4.0).predict(&[]).is_empty());
    }

    #[test]
    fn test_residuals_sign() {
        let line = LinReg::from_val(0.0, 1.0);
        assert_eq!(line.residuals(&[1.0, 2.0], &[0.0, 5.0]), vec![1.0, -3.0]);
    }

    #[test]
    fn test_gradient_zero_at_exact_fit() {
        let line = LinReg::from_val(1.0, 2.0);
        let x = [0.0, 1.0, 2.0];
        let y = [1.0, 3.0, 5.0];
        let r = line.residuals(&x, &y);
        assert_eq!(LinReg::gradient(&x, &r), (0.0, 0.0));
        assert_eq!(line.step(&x, &r, 0.5), line);
    }

    #[test]
    fn test_step_moves_downhill() {
        // y = 2x + 1, start at the origin
        let x = [1.0, 2.0, 3.0];
        let y = [3.0, 5.0, 7.0];
        let line = LinReg::from_val(0.0, 0.0);
        let r = line.residuals(&x, &y);
        // mean(r) = -5, dot(r, x) / n = -34 / 3
        let next = line.step(&x, &r, 0.1);
        assert_relative_eq!(next.intercept, 0.5, epsilon = 1e-12);
        assert_relative_eq!(next.slope, 34.0 / 30.0, epsilon = 1e-12);
    }

    #[test]
    fn test_least_squares() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [1.0, 2.0, 3.0, 4.0];
        let model = LinReg::least_squares(&x, &y).unwrap();
        assert_relative_eq!(model.slope, 1.0, epsilon = 1e-12);
        assert_relative_eq!(model.intercept, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_least_squares_degenerate_x() {
        assert_eq!(LinReg::least_squares(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]), None);
        assert_eq!(LinReg::least_squares(&[], &[]), None);
    }
}
