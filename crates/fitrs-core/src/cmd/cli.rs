use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

use crate::cmd::config::{Action, Config, DataSource, Fit as FitCfg, Generate as GenerateCfg};
use crate::data::SyntheticSpec;

#[derive(Debug, Parser)]
#[command(
    name = "fitrs",
    about = "Gradient descent fitting of a straight line, with QA report",
    version,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Log level, overridden by FITRS_LOG
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fit a model and write the QA report
    Fit(FitArgs),

    /// Write a synthetic regression dataset to CSV
    Generate(GenerateArgs),
}

/* ----------------------- fit ----------------------- */

#[derive(Debug, Args)]
pub struct FitArgs {
    /// JSON file with theta_0, theta_1, learning_rate and convergence_threshold
    #[arg(short = 'c', long = "config", value_hint = ValueHint::FilePath)]
    pub config: PathBuf,

    /// CSV file to fit; synthetic data is generated when omitted
    #[arg(short = 'd', long = "data", value_hint = ValueHint::FilePath)]
    pub data: Option<PathBuf>,

    /// Column holding the feature
    #[arg(long = "x-col", default_value = "x", requires = "data")]
    pub x_col: String,

    /// Column holding the target
    #[arg(long = "y-col", default_value = "y", requires = "data")]
    pub y_col: String,

    #[command(flatten)]
    pub synthetic: SyntheticArgs,

    /// Directory the report is written into
    #[arg(short = 'o', long = "out-dir", default_value = "docs", value_hint = ValueHint::DirPath)]
    pub out_dir: PathBuf,

    /// Skip the HTML report
    #[arg(long = "no-report")]
    pub no_report: bool,

    /// Print the fitted model as JSON on stdout
    #[arg(long = "json")]
    pub json: bool,
}

/* -------------------- synthetic data -------------------- */

#[derive(Debug, Args)]
pub struct SyntheticArgs {
    /// Number of generated samples
    #[arg(long = "samples", default_value_t = 100)]
    pub samples: usize,

    /// Standard deviation of the added noise
    #[arg(long, default_value_t = 0.4)]
    pub noise: f64,

    /// Intercept of the generating line
    #[arg(long, default_value_t = 50.0, allow_negative_numbers = true)]
    pub bias: f64,

    /// Slope of the generating line (random when omitted)
    #[arg(long, allow_negative_numbers = true)]
    pub coef: Option<f64>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,
}

impl From<SyntheticArgs> for SyntheticSpec {
    fn from(a: SyntheticArgs) -> Self {
        SyntheticSpec {
            n_samples: a.samples,
            noise: a.noise,
            bias: a.bias,
            coef: a.coef,
            seed: a.seed,
        }
    }
}

/* --------------------- generate --------------------- */

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Output CSV file
    #[arg(short = 'o', long = "output", value_hint = ValueHint::FilePath)]
    pub output: PathBuf,

    #[command(flatten)]
    pub synthetic: SyntheticArgs,
}

// -------- Map CLI -> Config/Action types --------

impl Cli {
    pub fn into_config(self) -> Config {
        match self.command {
            Commands::Fit(a) => {
                let source = match a.data {
                    Some(path) => DataSource::Csv { path, x_col: a.x_col, y_col: a.y_col },
                    None => DataSource::Synthetic(a.synthetic.into()),
                };
                Config {
                    action: Action::Fit(FitCfg {
                        config_path: a.config,
                        source,
                        out_dir: a.out_dir,
                        write_report: !a.no_report,
                        print_json: a.json,
                    }),
                }
            },
            Commands::Generate(a) => Config {
                action: Action::Generate(GenerateCfg {
                    spec: a.synthetic.into(),
                    output: a.output,
                }),
            },
        }
    }
}
