pub mod fiterror;
pub mod hyperparams;
pub mod model;
pub mod summary;
pub mod validate;

pub use fiterror::{ErrorKind, FitError, FitResult};
pub use hyperparams::Hyperparameters;
pub use model::Model;
pub use summary::{FitSnapshot, FitSummary};
pub use validate::validate_inputs;
