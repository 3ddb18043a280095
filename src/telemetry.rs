use crate::error::{Result, ScorecardError};
use tracing_subscriber::EnvFilter;

pub fn level_directive(configured: &str, verbose: u8, quiet: bool) -> String {
    if quiet {
        return "error".to_string();
    }
    match verbose {
        0 => configured.to_string(),
        1 => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Installs the stderr subscriber. `RUST_LOG` wins over everything else.
pub fn init(configured: &str, verbose: u8, quiet: bool) -> Result<()> {
    let directive = level_directive(configured, verbose, quiet);
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&directive).map_err(|source| {
            ScorecardError::ConfigParse(format!(
                "invalid logging.level '{directive}': {source}"
            ))
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(|source| ScorecardError::Telemetry(source.to_string()))
}
