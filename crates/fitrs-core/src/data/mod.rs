pub mod dataset;
pub mod synth;

pub use dataset::Dataset;
pub use synth::{make_regression, SyntheticData, SyntheticSpec};

use crate::model::{ErrorKind, FitError};

#[derive(thiserror::Error, Debug)]
pub enum DataError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("column '{0}' not found in header")]
    MissingColumn(String),
    #[error("row {row}, column '{column}': '{value}' is not a number")]
    NotNumeric { row: usize, column: String, value: String },
    #[error("invalid synthetic data settings: {0}")]
    Synthetic(String),
    #[error(transparent)]
    Fit(#[from] FitError),
}

impl DataError {
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            DataError::NotNumeric { .. } => Some(ErrorKind::Type),
            DataError::Synthetic(_) => Some(ErrorKind::Value),
            DataError::Fit(e) => Some(e.kind()),
            _ => None,
        }
    }
}
