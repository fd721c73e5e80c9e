mod logging;

use fitrs_core::cmd::cli::Cli;
use fitrs_core::cmd::config::Config;

use clap::Parser;
use std::process;

fn main() {
    let cli = Cli::parse();
    if let Err(e) = logging::init(cli.log_level) {
        eprintln!("Invalid log filter: {e}");
        process::exit(1);
    }

    let cfg: Config = cli.into_config();
    if let Err(e) = cfg.run() {
        eprintln!("{e}");
        process::exit(1);
    }
}
