pub mod linreg;
pub mod normality;
pub mod stats;

pub use linreg::LinReg;
pub use normality::{shapiro_wilk, ShapiroWilk};
pub use stats::{dot, mean, mean_squared_error, r_squared, rss, tss};
