//! Shapiro-Wilk test for normality, Royston's approximation (AS R94).
//!
//! Coefficients are approximated from normal order statistics and the
//! p-value from Royston's normalising transformations of `W`.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};
use std::f64::consts::PI;

/// Ranges below this are treated as a constant sample.
const SMALL: f64 = 1e-19;

const C1: [f64; 6] = [0.0, 0.221157, -0.147981, -2.071190, 4.434685, -2.706056];
const C2: [f64; 6] = [0.0, 0.042981, -0.293762, -1.752461, 5.682633, -3.582633];
// mean and log-sd of the transformed W, 4 <= n <= 11
const C3: [f64; 4] = [0.544, -0.39978, 0.025054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.77857, 0.062767, -0.0020322];
// same, n >= 12, polynomials in ln(n)
const C5: [f64; 4] = [-1.5861, -0.31082, -0.083751, 0.0038915];
const C6: [f64; 3] = [-0.4803, -0.082676, 0.0030302];
const G: [f64; 2] = [-2.273, 0.459];

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ShapiroWilk {
    pub w: f64,
    pub p_value: f64,
}

/// Runs the test over `sample`.
///
/// Returns `None` for fewer than three values or any non-finite value. A
/// sample with no spread is reported as `W = 1, p = 1`.
pub fn shapiro_wilk(sample: &[f64]) -> Option<ShapiroWilk> {
    let n = sample.len();
    if n < 3 || sample.iter().any(|v| !v.is_finite()) {
        return None;
    }

    let mut x = sample.to_vec();
    x.sort_by(|a, b| a.total_cmp(b));
    if x[n - 1] - x[0] < SMALL {
        return Some(ShapiroWilk { w: 1.0, p_value: 1.0 });
    }

    let normal = Normal::new(0.0, 1.0).ok()?;
    let a = coefficients(&normal, n);

    let x_mean = x.iter().sum::<f64>() / n as f64;
    let ss: f64 = x.iter().map(|xi| (xi - x_mean).powi(2)).sum();
    let num: f64 = a.iter().zip(&x).map(|(ai, xi)| ai * xi).sum();

    // rounding can push a perfect fit a hair above one
    let w = (num * num / ss).min(1.0);
    let p_value = p_value(&normal, w, n);

    Some(ShapiroWilk { w, p_value })
}

fn poly(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// Expected normal order statistics of a sample of `n`, from Blom's
/// plotting positions `(i - 3/8) / (n + 1/4)`.
pub(crate) fn blom_quantiles(normal: &Normal, n: usize) -> Vec<f64> {
    let nf = n as f64;
    (1..=n).map(|i| normal.inverse_cdf((i as f64 - 0.375) / (nf + 0.25))).collect()
}

/// Antisymmetric weights for the ordered sample, `a[i] = -a[n - 1 - i]`.
fn coefficients(normal: &Normal, n: usize) -> Vec<f64> {
    if n == 3 {
        let a = 0.5_f64.sqrt();
        return vec![-a, 0.0, a];
    }

    let nf = n as f64;
    let m = blom_quantiles(normal, n);
    let mm: f64 = m.iter().map(|v| v * v).sum();
    let u = 1.0 / nf.sqrt();

    let mut a = vec![0.0; n];
    let a_n = m[n - 1] / mm.sqrt() + poly(&C1, u);
    a[n - 1] = a_n;
    a[0] = -a_n;

    let (phi, first) = if n > 5 {
        let a_n1 = m[n - 2] / mm.sqrt() + poly(&C2, u);
        a[n - 2] = a_n1;
        a[1] = -a_n1;
        let phi = (mm - 2.0 * m[n - 1].powi(2) - 2.0 * m[n - 2].powi(2))
            / (1.0 - 2.0 * a_n.powi(2) - 2.0 * a_n1.powi(2));
        (phi, 2)
    } else {
        let phi = (mm - 2.0 * m[n - 1].powi(2)) / (1.0 - 2.0 * a_n.powi(2));
        (phi, 1)
    };

    let scale = phi.sqrt();
    for i in first..n - first {
        a[i] = m[i] / scale;
    }
    a
}

fn p_value(normal: &Normal, w: f64, n: usize) -> f64 {
    let nf = n as f64;
    if n == 3 {
        let p = 6.0 / PI * (w.sqrt().asin() - 0.75_f64.sqrt().asin());
        return p.clamp(0.0, 1.0);
    }

    let y = (1.0 - w).ln();
    let z = if n <= 11 {
        let gamma = poly(&G, nf);
        if y >= gamma {
            return 1e-99;
        }
        let m = poly(&C3, nf);
        let s = poly(&C4, nf).exp();
        (-(gamma - y).ln() - m) / s
    } else {
        let ln_n = nf.ln();
        let m = poly(&C5, ln_n);
        let s = poly(&C6, ln_n).exp();
        (y - m) / s
    };
    1.0 - normal.cdf(z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_three_points_evenly_spaced() {
        let res = shapiro_wilk(&[1.0, 2.0, 3.0]).unwrap();
        assert_abs_diff_eq!(res.w, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(res.p_value, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_five_points_reference() {
        let res = shapiro_wilk(&[5.0, 3.0, 1.0, 4.0, 2.0]).unwrap();
        assert_abs_diff_eq!(res.w, 0.986762, epsilon = 1e-5);
        assert_abs_diff_eq!(res.p_value, 0.967174, epsilon = 1e-4);
    }

    #[test]
    fn test_royston_example() {
        let x = [148., 154., 158., 160., 161., 162., 166., 170., 182., 195., 236.];
        let res = shapiro_wilk(&x).unwrap();
        assert_abs_diff_eq!(res.w, 0.78881, epsilon = 1e-4);
        assert_abs_diff_eq!(res.p_value, 0.00670, epsilon = 1e-4);
    }

    #[test]
    fn test_large_sample_uses_log_branch() {
        let x: Vec<f64> = (1..=20).map(f64::from).collect();
        let res = shapiro_wilk(&x).unwrap();
        assert_abs_diff_eq!(res.w, 0.96038, epsilon = 1e-4);
        assert_abs_diff_eq!(res.p_value, 0.5514, epsilon = 1e-3);
    }

    #[test]
    fn test_outlier_rejects_normality() {
        let x = [1., 1., 1., 1., 1., 1., 1., 1., 1., 50., 2., 3.];
        let res = shapiro_wilk(&x).unwrap();
        assert!(res.w < 0.5);
        assert!(res.p_value < 1e-3);
    }

    #[test]
    fn test_constant_sample() {
        assert_eq!(shapiro_wilk(&[2.0; 6]), Some(ShapiroWilk { w: 1.0, p_value: 1.0 }));
    }

    #[test]
    fn test_blom_quantiles() {
        let normal = Normal::new(0.0, 1.0).unwrap();
        let q = blom_quantiles(&normal, 4);
        assert_eq!(q.len(), 4);
        // (1 - 0.375) / 4.25
        assert_abs_diff_eq!(q[0], normal.inverse_cdf(0.625 / 4.25), epsilon = 1e-15);
        assert_abs_diff_eq!(q[0], -q[3], epsilon = 1e-12);
        assert_abs_diff_eq!(q[1], -q[2], epsilon = 1e-12);
    }

    #[test]
    fn test_too_short_or_non_finite() {
        assert_eq!(shapiro_wilk(&[]), None);
        assert_eq!(shapiro_wilk(&[1.0, 2.0]), None);
        assert_eq!(shapiro_wilk(&[1.0, f64::NAN, 2.0, 3.0]), None);
    }
}
