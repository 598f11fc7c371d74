use crate::config::{PipelineConfig, PipelineConfigFile};
use crate::errors::{AppError, AppResult};
use crate::logging::init_logging;
use crate::pipeline::{self, RunSummary};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use tracing::{error, info};

// CLI metadata constants
const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
const APP_ABOUT: &str = env!("CARGO_PKG_DESCRIPTION");

/// Builds the command-line interface.
///
/// - `run`: configure the job with flags
/// - `toml`: load the job from a TOML configuration file
///
/// `--verbose` is accepted by both subcommands.
pub fn build_command() -> Command<'static> {
    Command::new("etl-append")
        .version(APP_VERSION)
        .author(APP_AUTHOR)
        .about(APP_ABOUT)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log debug events (overridden by RUST_LOG)")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("run")
                .about("Append every CSV, JSON-lines and XML file of a directory into one CSV")
                .after_help("Example:\n  etl-append run -s data/source -t data/output --exclude draft.csv")
                .arg(
                    Arg::new("source")
                        .short('s')
                        .long("source")
                        .help("Directory containing the input files")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("target")
                        .short('t')
                        .long("target")
                        .help("Directory receiving the output and log files")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Output file name (default: appended_output_<timestamp>.csv)")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("columns")
                        .short('c')
                        .long("columns")
                        .help("Comma-separated expected columns, in output order")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("numeric_columns")
                        .short('n')
                        .long("numeric-columns")
                        .help("Comma-separated columns that must be numeric")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("exclude")
                        .short('x')
                        .long("exclude")
                        .help("File name in the source directory to skip")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("no_log_file")
                        .long("no-log-file")
                        .help("Only log to stderr")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("toml")
                .about("Run using a TOML configuration file")
                .arg(
                    Arg::new("config")
                        .help("Path to the TOML config file")
                        .required(true)
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
}

/// Parses command-line arguments and runs the ETL job.
///
/// Prints help when no subcommand is given.
///
/// # Errors
///
/// Returns configuration, logging and pipeline errors unchanged. Configuration
/// and pipeline errors are logged before they are returned.
pub fn cli() -> AppResult<()> {
    let cmd = build_command();
    let mut cmd_for_help = cmd.clone();
    let matches = cmd.get_matches();
    let verbose = matches
        .subcommand()
        .is_some_and(|(_, sub)| flag(sub, "verbose"));

    let resolved = config_from_matches(&matches).map_err(|err| {
        // No log file is known yet, so the error only reaches stderr
        if init_logging(None, verbose).is_ok() {
            error!("{err}");
        }
        err
    })?;

    match resolved {
        Some(config) => {
            init_logging(config.log_path().as_deref(), verbose)?;
            run_and_report(&config)?;
        }
        None => {
            cmd_for_help
                .print_help()
                .map_err(|e| AppError::IoError(format!("Failed to print help: {e}")))?;
        }
    }

    Ok(())
}

/// Runs the pipeline and logs its outcome, including the error message on failure.
pub(crate) fn run_and_report(config: &PipelineConfig) -> AppResult<RunSummary> {
    match pipeline::run(config) {
        Ok(summary) => {
            info!(
                output = %summary.output_path.display(),
                rows = summary.rows_written,
                "Data saved"
            );
            Ok(summary)
        }
        Err(err) => {
            error!("ETL job failed: {err}");
            Err(err)
        }
    }
}

/// Resolves the pipeline configuration from parsed arguments.
///
/// Returns `None` when no subcommand was given.
pub fn config_from_matches(matches: &ArgMatches) -> AppResult<Option<PipelineConfig>> {
    let config = match matches.subcommand() {
        Some(("run", sub)) => {
            let mut config = PipelineConfig {
                source_dir: sub
                    .get_one::<PathBuf>("source")
                    .cloned()
                    .ok_or_else(|| AppError::InvalidInput("--source is required".into()))?,
                target_dir: sub
                    .get_one::<PathBuf>("target")
                    .cloned()
                    .ok_or_else(|| AppError::InvalidInput("--target is required".into()))?,
                ..PipelineConfig::default()
            };
            if let Some(output) = sub.get_one::<String>("output") {
                config.output_file_name = output.clone();
            }
            if let Some(columns) = sub.get_one::<String>("columns") {
                config.columns = parse_list(columns);
            }
            if let Some(numeric) = sub.get_one::<String>("numeric_columns") {
                config.numeric_columns = parse_list(numeric);
            }
            config.exclude_file = sub.get_one::<String>("exclude").cloned();
            if flag(sub, "no_log_file") {
                config.log_file = None;
            }
            config.validate()?;
            config
        }
        Some(("toml", sub)) => {
            let config_path = sub
                .get_one::<PathBuf>("config")
                .ok_or_else(|| AppError::InvalidInput("A config file is required".into()))?;
            PipelineConfigFile::from_toml_file(config_path)?.into_config()?
        }
        _ => return Ok(None),
    };

    Ok(Some(config))
}

fn flag(matches: &ArgMatches, id: &str) -> bool {
    matches.get_one::<bool>(id).copied().unwrap_or(false)
}

/// Splits a comma-separated list, trimming entries and dropping empty ones.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
