//! Process-wide `tracing` subscriber for the `lather` binary.
//!
//! Output goes to stderr so `lather render` can write pages to stdout.
//! `LATHER_LOG` takes precedence over the configured filter.

use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;
use crate::error::{Result, SiteError};

/// Variable holding `EnvFilter` directives.
pub const ENV_LOG: &str = "LATHER_LOG";

/// Build the filter from `LATHER_LOG`, falling back to `config.filter`.
pub fn filter(config: &LogConfig, env: Option<String>) -> Result<EnvFilter> {
    let directives = env
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| config.filter.clone());
    EnvFilter::try_new(&directives).map_err(|error| SiteError::Logging {
        message: format!("bad filter {directives:?}: {error}"),
    })
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init(config: &LogConfig) -> Result<()> {
    let filter = filter(config, std::env::var(ENV_LOG).ok())?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|error| SiteError::Logging {
        message: error.to_string(),
    })
}
