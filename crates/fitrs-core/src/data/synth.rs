use crate::data::{DataError, Dataset};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use tracing::debug;

/// Settings for [`make_regression`]. The defaults match the QA pipeline:
/// 100 samples, noise 0.4, bias 50.
#[derive(Clone, Debug, PartialEq)]
pub struct SyntheticSpec {
    pub n_samples: usize,
    /// Standard deviation of the gaussian noise added to `y`.
    pub noise: f64,
    pub bias: f64,
    /// Slope of the generating line, drawn from `100 * U(0, 1)` when `None`.
    pub coef: Option<f64>,
    pub seed: Option<u64>,
}

impl Default for SyntheticSpec {
    fn default() -> Self {
        Self { n_samples: 100, noise: 0.4, bias: 50.0, coef: None, seed: None }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SyntheticData {
    pub dataset: Dataset,
    pub coef: f64,
    pub bias: f64,
}

/// Single-feature regression problem: `x ~ N(0, 1)`,
/// `y = coef * x + bias + noise * N(0, 1)`.
pub fn make_regression(spec: &SyntheticSpec) -> Result<SyntheticData, DataError> {
    if spec.n_samples == 0 {
        return Err(DataError::Synthetic("n_samples must be at least 1".to_owned()));
    }
    if !spec.noise.is_finite() || spec.noise < 0.0 {
        return Err(DataError::Synthetic(format!("noise must be >= 0, got {}", spec.noise)));
    }
    if !spec.bias.is_finite() {
        return Err(DataError::Synthetic(format!("bias must be finite, got {}", spec.bias)));
    }
    if let Some(coef) = spec.coef.filter(|c| !c.is_finite()) {
        return Err(DataError::Synthetic(format!("coef must be finite, got {coef}")));
    }

    let mut rng = match spec.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let coef = spec.coef.unwrap_or_else(|| 100.0 * rng.random::<f64>());
    let x: Vec<f64> = (0..spec.n_samples).map(|_| rng.sample(StandardNormal)).collect();
    let y: Vec<f64> = x
        .iter()
        .map(|&xi| coef * xi + spec.bias + spec.noise * rng.sample::<f64, _>(StandardNormal))
        .collect();

    debug!(n = spec.n_samples, coef, bias = spec.bias, noise = spec.noise, "generated dataset");
    Ok(SyntheticData { dataset: Dataset::new(x, y)?, coef, bias: spec.bias })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let spec = SyntheticSpec::default();
        assert_eq!(spec.n_samples, 100);
        assert_eq!(spec.noise, 0.4);
        assert_eq!(spec.bias, 50.0);
    }

    #[test]
    fn test_seeded_is_reproducible() {
        let spec = SyntheticSpec { seed: Some(42), ..Default::default() };
        let a = make_regression(&spec).unwrap();
        let b = make_regression(&spec).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.dataset.len(), 100);
        assert!((0.0..100.0).contains(&a.coef));
    }

    #[test]
    fn test_noiseless_points_on_line() {
        let spec = SyntheticSpec {
            n_samples: 20,
            noise: 0.0,
            bias: -3.0,
            coef: Some(1.5),
            seed: Some(1),
        };
        let data = make_regression(&spec).unwrap();
        for (xi, yi) in data.dataset.x().iter().zip(data.dataset.y()) {
            assert_eq!(*yi, 1.5 * xi - 3.0);
        }
    }

    #[test]
    fn test_invalid_settings() {
        let bad = [
            SyntheticSpec { n_samples: 0, ..Default::default() },
            SyntheticSpec { noise: -1.0, ..Default::default() },
            SyntheticSpec { bias: f64::NAN, ..Default::default() },
            SyntheticSpec { coef: Some(f64::INFINITY), ..Default::default() },
        ];
        for spec in bad {
            assert!(matches!(make_regression(&spec), Err(DataError::Synthetic(_))), "{spec:?}");
        }
    }
}
