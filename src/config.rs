use crate::constants::*;
use crate::errors::{AppError, AppResult};
use crate::models::{ColumnKind, Schema};
use crate::utils::timestamped_output_name;
use chrono::Local;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolved configuration for one pipeline run.
///
/// Built either from CLI arguments or from a TOML file and passed explicitly to
/// [`crate::pipeline::run`]; nothing is read from globals.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory scanned for `.csv`, `.json`/`.jsonl` and `.xml` files
    pub source_dir: PathBuf,
    /// Directory receiving the output file (and the log file, if relative)
    pub target_dir: PathBuf,
    /// Bare file name of the output CSV
    pub output_file_name: String,
    /// Expected columns, in output order
    pub columns: Vec<String>,
    /// Columns that must parse as numbers
    pub numeric_columns: Vec<String>,
    /// Extra file name to skip during extraction
    pub exclude_file: Option<String>,
    /// Log file; relative paths are resolved against `target_dir`
    pub log_file: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from(DEFAULT_SOURCE_DIR),
            target_dir: PathBuf::from(DEFAULT_TARGET_DIR),
            output_file_name: timestamped_output_name(Local::now().naive_local()),
            columns: default_columns(),
            numeric_columns: default_numeric_columns(),
            exclude_file: None,
            log_file: Some(PathBuf::from(DEFAULT_LOG_FILE)),
        }
    }
}

impl PipelineConfig {
    /// Full path of the output file.
    pub fn output_path(&self) -> PathBuf {
        self.target_dir.join(&self.output_file_name)
    }

    /// Full path of the log file, if file logging is enabled.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.as_ref().map(|p| self.target_dir.join(p))
    }

    /// Builds the schema described by `columns` and `numeric_columns`.
    pub fn schema(&self) -> AppResult<Schema> {
        Schema::new(&self.columns, &self.numeric_columns)
    }

    /// File names that extraction must skip.
    ///
    /// Holds `exclude_file` when set, plus the output file name when the output is
    /// written into the source directory, so a previous run's output is never read
    /// back as input.
    pub fn excluded_file_names(&self) -> Vec<String> {
        let mut excluded: Vec<String> = self.exclude_file.iter().cloned().collect();
        if self.output_in_source_dir() && !excluded.contains(&self.output_file_name) {
            excluded.push(self.output_file_name.clone());
        }
        excluded
    }

    fn output_in_source_dir(&self) -> bool {
        match (
            fs::canonicalize(&self.source_dir),
            fs::canonicalize(&self.target_dir),
        ) {
            (Ok(source), Ok(target)) => source == target,
            _ => self.source_dir == self.target_dir,
        }
    }

    /// Checks the configuration before any file is touched.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the schema is invalid, `height` or `weight` is missing
    /// or not numeric, or the output/excluded names are not bare file names. The
    /// output name must end in `.csv`.
    pub fn validate(&self) -> AppResult<()> {
        let schema = self.schema()?;
        for required in [HEIGHT_COLUMN, WEIGHT_COLUMN] {
            let numeric = schema
                .columns()
                .iter()
                .any(|c| c.name == required && c.kind == ColumnKind::Numeric);
            if !numeric {
                return Err(AppError::InvalidInput(format!(
                    "Column '{required}' must be present and numeric"
                )));
            }
        }

        ensure_bare_file_name(&self.output_file_name, "Output file")?;
        let has_csv_extension = Path::new(&self.output_file_name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(OUTPUT_FILE_EXTENSION));
        if !has_csv_extension {
            return Err(AppError::InvalidInput(format!(
                "Output file '{}' must have a .{OUTPUT_FILE_EXTENSION} extension",
                self.output_file_name
            )));
        }

        if let Some(exclude) = &self.exclude_file {
            ensure_bare_file_name(exclude, "Excluded file")?;
        }

        Ok(())
    }
}

fn ensure_bare_file_name(name: &str, what: &str) -> AppResult<()> {
    let is_bare = Path::new(name).file_name().and_then(|n| n.to_str()) == Some(name);
    if is_bare {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "{what} '{name}' must be a file name without directories"
        )))
    }
}

/// Configuration that can be loaded from a TOML file.
///
/// `source_dir` and `target_dir` are required; everything else falls back to the
/// same defaults as the CLI. Unknown keys are rejected to catch typos. An empty
/// `log_file` disables file logging.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfigFile {
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,
    #[serde(default)]
    pub output_file: Option<String>,
    #[serde(default = "default_columns")]
    pub columns: Vec<String>,
    #[serde(default = "default_numeric_columns")]
    pub numeric_columns: Vec<String>,
    #[serde(default)]
    pub exclude_file: Option<String>,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

impl PipelineConfigFile {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the file cannot be read and `InvalidInput` if the TOML is
    /// malformed, required keys are missing or unknown keys are present.
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            AppError::IoError(format!("Failed to read config {}: {e}", path.display()))
        })?;
        let config: PipelineConfigFile = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolves defaults and validates the result.
    pub fn into_config(self) -> AppResult<PipelineConfig> {
        let defaults = PipelineConfig::default();
        let config = PipelineConfig {
            source_dir: self.source_dir,
            target_dir: self.target_dir,
            output_file_name: self.output_file.unwrap_or(defaults.output_file_name),
            columns: self.columns,
            numeric_columns: self.numeric_columns,
            exclude_file: self.exclude_file,
            log_file: Some(self.log_file)
                .filter(|name| !name.trim().is_empty())
                .map(PathBuf::from),
        };
        config.validate()?;
        Ok(config)
    }
}

fn default_columns() -> Vec<String> {
    DEFAULT_COLUMNS.iter().map(|c| c.to_string()).collect()
}

fn default_numeric_columns() -> Vec<String> {
    DEFAULT_NUMERIC_COLUMNS.iter().map(|c| c.to_string()).collect()
}

fn default_log_file() -> String {
    DEFAULT_LOG_FILE.to_string()
}
