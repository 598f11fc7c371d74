use crate::config::PipelineConfig;
use crate::errors::AppResult;
use crate::extractor::extract_all;
use crate::loader::write_csv;
use crate::transformer::transform;
use crate::utils::format_duration;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_path: PathBuf,
    pub rows_written: usize,
    pub files_read: usize,
    pub files_skipped: usize,
    pub elapsed: Duration,
}

/// Runs extraction, transform and load once for `config`.
///
/// # Workflow
///
/// 1. Validates the configuration and builds the schema
/// 2. Extracts all source files into one row set
/// 3. Converts `height` and `weight` in place
/// 4. Writes the row set atomically to the output path
///
/// # Errors
///
/// Any error aborts the run and is returned unchanged. Since the output is only
/// written in the last step, and atomically, a failed run leaves no output file and
/// does not alter a previous one.
pub fn run(config: &PipelineConfig) -> AppResult<RunSummary> {
    let start = Instant::now();
    config.validate()?;
    let schema = config.schema()?;
    let output_path = config.output_path();

    info!(
        source_dir = %config.source_dir.display(),
        output = %output_path.display(),
        columns = %schema.joined_names(),
        "ETL job started"
    );

    let excluded = config.excluded_file_names();
    let mut extraction = extract_all(&config.source_dir, &schema, &excluded)?;
    transform(&mut extraction.row_set)?;
    write_csv(&extraction.row_set, &output_path)?;

    let summary = RunSummary {
        output_path,
        rows_written: extraction.row_set.len(),
        files_read: extraction.files_read,
        files_skipped: extraction.files_skipped,
        elapsed: start.elapsed(),
    };

    info!(
        output = %summary.output_path.display(),
        rows = summary.rows_written,
        files_read = summary.files_read,
        elapsed = %format_duration(summary.elapsed),
        "ETL job finished"
    );

    Ok(summary)
}
