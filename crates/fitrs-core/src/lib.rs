//! Univariate linear regression fitted by batch gradient descent, with
//! goodness-of-fit statistics, a residual normality test and an HTML QA
//! report.

pub mod cmd;
pub mod data;
pub mod model;
pub mod report;
pub mod stats;

pub use data::{Dataset, SyntheticSpec};
pub use model::{ErrorKind, FitError, FitResult, FitSummary, Hyperparameters, Model};
pub use stats::{LinReg, ShapiroWilk};
