use crate::data::{make_regression, DataError, Dataset, SyntheticSpec};
use crate::model::{ErrorKind, FitError, Model};
use crate::report::{write_report, ReportData, ReportError};

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/* =================== Model configuration file =================== */

fn default_log_every() -> u64 {
    crate::model::Hyperparameters::DEFAULT_LOG_EVERY
}

/// Initial parameters and hyperparameters, read from a JSON file:
///
/// ```json
/// { "theta_0": 0.0, "theta_1": 0.0, "learning_rate": 0.1, "convergence_threshold": 1e-9 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    pub theta_0: f64,
    pub theta_1: f64,
    pub learning_rate: f64,
    pub convergence_threshold: f64,
    #[serde(default)]
    pub max_iterations: Option<u64>,
    #[serde(default = "default_log_every")]
    pub log_every: u64,
}

impl ModelConfig {
    pub fn from_json_str(s: &str, path: &Path) -> Result<Self, CmdError> {
        serde_json::from_str(s)
            .map_err(|source| CmdError::Config { path: path.to_path_buf(), source })
    }

    pub fn load(path: &Path) -> Result<Self, CmdError> {
        let s = fs::read_to_string(path)?;
        Self::from_json_str(&s, path)
    }

    pub fn build_model(&self) -> Result<Model, FitError> {
        Ok(Model::new(self.theta_0, self.theta_1, self.convergence_threshold, self.learning_rate)?
            .with_max_iterations(self.max_iterations)
            .with_log_every(self.log_every))
    }
}

/* =================== Public configuration types =================== */

#[derive(Debug, Clone)]
pub struct Config {
    pub action: Action,
}

#[derive(Debug, Clone)]
pub enum Action {
    Fit(Fit),
    Generate(Generate),
}

#[derive(Debug, Clone)]
pub struct Fit {
    pub config_path: PathBuf,
    pub source: DataSource,
    pub out_dir: PathBuf,
    pub write_report: bool,
    pub print_json: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DataSource {
    Csv { path: PathBuf, x_col: String, y_col: String },
    Synthetic(SyntheticSpec),
}

#[derive(Debug, Clone)]
pub struct Generate {
    pub spec: SyntheticSpec,
    pub output: PathBuf,
}

impl DataSource {
    /// Loads the dataset and a description of where it came from.
    pub fn load(&self) -> Result<(Dataset, String), DataError> {
        match self {
            DataSource::Csv { path, x_col, y_col } => {
                let data = Dataset::from_csv(path, x_col, y_col)?;
                Ok((data, path.display().to_string()))
            },
            DataSource::Synthetic(spec) => {
                let synth = make_regression(spec)?;
                let desc = format!(
                    "synthetic, y = {:.4} * x + {} + N(0, {}^2)",
                    synth.coef, synth.bias, spec.noise
                );
                Ok((synth.dataset, desc))
            },
        }
    }
}

/* =================== Error type =================== */

#[derive(thiserror::Error, Debug)]
pub enum CmdError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config {}: {source}", path.display())]
    Config { path: PathBuf, source: serde_json::Error },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("model error: {0}")]
    Fit(#[from] FitError),
    #[error("data error: {0}")]
    Data(#[from] DataError),
    #[error("report error: {0}")]
    Report(#[from] ReportError),
}

impl CmdError {
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            // wrong JSON types and missing keys both surface as data errors
            CmdError::Config { source, .. } if source.is_data() => Some(ErrorKind::Type),
            CmdError::Fit(e) => Some(e.kind()),
            CmdError::Data(e) => e.kind(),
            _ => None,
        }
    }
}

/* =================== Entry point =================== */

impl Config {
    pub fn run(&self) -> Result<(), CmdError> {
        match &self.action {
            Action::Fit(f) => run_fit(f),
            Action::Generate(g) => run_generate(g),
        }
    }
}

/* =================== Actions =================== */

fn run_fit(f: &Fit) -> Result<(), CmdError> {
    let model_cfg = ModelConfig::load(&f.config_path)?;
    let mut model = model_cfg.build_model()?;
    info!(path = %f.config_path.display(), "loaded model config");

    let (dataset, source) = f.source.load()?;
    model.fit(dataset.x(), dataset.y())?;
    info!("{}", model);

    if f.print_json {
        if let Some(snapshot) = model.snapshot() {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }

    if f.write_report {
        let data = ReportData {
            model: &model,
            x: dataset.x(),
            y: dataset.y(),
            source: &source,
            date: Local::now().date_naive(),
        };
        let path = write_report(&f.out_dir, &data)?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}

fn run_generate(g: &Generate) -> Result<(), CmdError> {
    let synth = make_regression(&g.spec)?;
    synth.dataset.write_csv(&g.output)?;
    println!(
        "Wrote {} points to {} (coef {:.4}, bias {})",
        synth.dataset.len(),
        g.output.display(),
        synth.coef,
        synth.bias
    );
    Ok(())
}
