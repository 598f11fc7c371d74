use crate::errors::{AppError, AppResult};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes logging to stderr and, when `log_file` is given, to that file as well.
///
/// `RUST_LOG` overrides the default filter, which is `etl_append=info`, or
/// `etl_append=debug` when `verbose` is set. The log file is appended to, so
/// successive runs accumulate in one file.
///
/// # Errors
///
/// Returns `IoError` if the log file cannot be opened and `InvalidInput` if a global
/// subscriber is already installed.
pub fn init_logging(log_file: Option<&Path>, verbose: bool) -> AppResult<()> {
    let default_directive = if verbose {
        "etl_append=debug"
    } else {
        "etl_append=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| {
                    AppError::IoError(format!(
                        "Failed to create log directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    AppError::IoError(format!("Failed to open log file {}: {e}", path.display()))
                })?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let console_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::InvalidInput(format!("Failed to initialize logging: {e}")))
}
