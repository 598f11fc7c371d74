//! etl-append library
//!
//! This crate provides the core functionality for the `etl-append` binary.
//! Keep the crate root minimal; implementation and tests live in their modules.
//!
//! ## Overview
//!
//! A single run reads every supported file in a source directory, normalizes the
//! records to one schema, converts units and writes one CSV file:
//!
//! - [`extractor`] - Finds and reads CSV, JSON-lines and XML files into a [`models::RowSet`]
//! - [`transformer`] - Converts `height` (inches → meters) and `weight` (pounds → kilograms)
//! - [`loader`] - Writes the row set to CSV atomically
//! - [`pipeline`] - Runs the three stages for a [`config::PipelineConfig`]
//! - [`cli`] - Command-line interface and TOML configuration entry points
//! - [`models`] - Schema, values, rows and source formats
//! - [`errors`] - Error types used throughout the application
//!
//! ## Example Usage
//!
//! ```no_run
//! use etl_append::{config::PipelineConfig, errors::AppResult, pipeline};
//! use std::path::PathBuf;
//!
//! # fn example() -> AppResult<()> {
//! let config = PipelineConfig {
//!     source_dir: PathBuf::from("data/source"),
//!     target_dir: PathBuf::from("data/output"),
//!     output_file_name: "people.csv".to_string(),
//!     ..PipelineConfig::default()
//! };
//! let summary = pipeline::run(&config)?;
//! println!("{} rows written to {}", summary.rows_written, summary.output_path.display());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod extractor;
pub mod loader;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod transformer;
pub mod utils;
