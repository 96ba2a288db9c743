//! Logger setup for the `kd` binary.
//!
//! The library only emits through the `log` facade; the binary decides where
//! records go. Level precedence: `--log-level`, then `KD_LOG` (which may come
//! from a `.env` file), then `warn`.

use flexi_logger::{Logger, LoggerHandle};

use crate::error::AppError;

pub const LOG_ENV_VAR: &str = "KD_LOG";
const DEFAULT_LEVEL: &str = "warn";

/// Resolve the effective log spec.
pub fn resolve_level(cli_level: Option<&str>) -> String {
    cli_level
        .map(str::to_string)
        .or_else(|| std::env::var(LOG_ENV_VAR).ok())
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string())
}

/// Start logging to stderr. Keep the returned handle alive for the whole run.
pub fn setup_logging(level: &str) -> Result<LoggerHandle, AppError> {
    Logger::try_with_str(level)
        .map_err(|e| AppError::new(2, format!("Invalid log level '{level}': {e}")))?
        .log_to_stderr()
        .start()
        .map_err(|e| AppError::new(2, format!("Logger initialization failed: {e}")))
}
