use tracing::Level;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Initialises tracing. `FITRS_LOG` takes precedence over `level`.
pub fn init(level: Level) -> Result<(), ParseError> {
    let lvl = level.as_str().to_lowercase();
    let filter = EnvFilter::try_from_env("FITRS_LOG")
        .or_else(|_| EnvFilter::try_new(format!("fitrs_core={lvl},fitrs={lvl}")))?;

    // stdout is reserved for results
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
