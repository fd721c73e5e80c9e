pub mod html_report;
pub mod plot;

pub use html_report::{report_file_name, write_report, ReportData};
pub use plot::{render_plots, Plots};

#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("plotting failed: {0}")]
    Plot(String),
    #[error("model has not been fitted, nothing to report")]
    NotFitted,
}
