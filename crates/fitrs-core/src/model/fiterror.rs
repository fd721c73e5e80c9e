/// Broad class of a [`FitError`], used by callers that only care whether a
/// value had the wrong type or the wrong magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A value that should be a real number is not (NaN, infinite or unparsable).
    Type,
    /// A well-typed value outside its allowed range or shape.
    Value,
    /// The statistic is mathematically undefined for the data.
    Domain,
    /// Gradient descent did not reach a usable stopping point.
    Convergence,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum FitError {
    #[error("{name} must be a finite number, got {value}")]
    NonFiniteParameter { name: &'static str, value: f64 },
    #[error("{name} must be greater than zero, got {value}")]
    NonPositiveParameter { name: &'static str, value: f64 },
    #[error("input array {name} must not be empty")]
    EmptyInput { name: &'static str },
    #[error("x and y have different lengths: {len_x} vs {len_y}")]
    LengthMismatch { len_x: usize, len_y: usize },
    #[error("input array {name} has a non-finite value at index {index}")]
    NonFiniteInput { name: &'static str, index: usize },
    #[error("total sum of squares is zero (constant y), r squared is undefined")]
    ZeroTotalSumOfSquares,
    #[error("normality test needs at least 3 residuals, got {n}")]
    TooFewForNormality { n: usize },
    #[error("gradient descent diverged after {iterations} iterations, try a smaller learning rate")]
    Diverged { iterations: u64 },
    #[error("no convergence within {max} iterations")]
    IterationLimit { max: u64 },
}

impl FitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FitError::NonFiniteParameter { .. } | FitError::NonFiniteInput { .. } => {
                ErrorKind::Type
            },
            FitError::NonPositiveParameter { .. }
            | FitError::EmptyInput { .. }
            | FitError::LengthMismatch { .. } => ErrorKind::Value,
            FitError::ZeroTotalSumOfSquares | FitError::TooFewForNormality { .. } => {
                ErrorKind::Domain
            },
            FitError::Diverged { .. } | FitError::IterationLimit { .. } => ErrorKind::Convergence,
        }
    }
}

pub type FitResult<T> = Result<T, FitError>;
