use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;
use crate::error::EngineError;

/// Install the global subscriber. `RUST_LOG` overrides the default `info`
/// filter. Fails if a subscriber is already installed.
pub fn init_logging(format: LogFormat) -> Result<(), EngineError> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let registry = tracing_subscriber::registry().with(filter);

  let result = match format {
    LogFormat::Json => registry
      .with(fmt::layer().with_target(true).with_writer(std::io::stderr).json())
      .try_init(),
    LogFormat::Pretty => registry
      .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
      .try_init(),
  };
  result.map_err(|e| EngineError::Logging(e.to_string()))?;

  tracing::debug!(?format, "Logging initialized");
  Ok(())
}
