//! Extraction: reads every supported file in a source directory into one [`RowSet`].

mod coerce;
mod csv_reader;
mod file_finder;
mod json_reader;
mod xml_reader;

use crate::errors::AppResult;
use crate::models::{Row, RowSet, Schema, SourceFormat};
use std::path::Path;
use tracing::{debug, info};

// Re-export public API
pub use csv_reader::read_csv;
pub use file_finder::find_source_files;
pub use json_reader::read_json_lines;
pub use xml_reader::read_xml;

/// Result of an extraction pass.
#[derive(Debug)]
pub struct Extraction {
    pub row_set: RowSet,
    pub files_read: usize,
    pub files_skipped: usize,
}

/// Reads a single source file with the reader for `format`.
pub fn read_file(format: SourceFormat, path: &Path, schema: &Schema) -> AppResult<Vec<Row>> {
    match format {
        SourceFormat::Csv => read_csv(path, schema),
        SourceFormat::JsonLines => read_json_lines(path, schema),
        SourceFormat::Xml => read_xml(path, schema),
    }
}

/// Extracts every CSV, JSON-lines and XML file in `source_dir` into one row set.
///
/// # Behavior
///
/// - **Order**: formats are read CSV first, then JSON lines, then XML; files within a
///   format are read in file-name order; rows keep their order within each file.
/// - **Exclusion**: files whose name appears in `excluded` are skipped and logged.
///   Nothing else is ever skipped.
/// - **Empty input**: a directory without matching files yields an empty row set.
///
/// # Errors
///
/// The first failing file aborts the extraction; its error names the file, and
/// for field-level failures the record and field as well.
pub fn extract_all(source_dir: &Path, schema: &Schema, excluded: &[String]) -> AppResult<Extraction> {
    info!(source_dir = %source_dir.display(), "Extraction started");

    let mut rows: Vec<Row> = Vec::new();
    let mut files_read = 0;
    let mut files_skipped = 0;

    for (format, files) in find_source_files(source_dir)? {
        info!(
            format = format.display_name(),
            files = files.len(),
            "Extracting files"
        );
        let rows_before = rows.len();

        for path in files {
            let is_excluded = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|name| excluded.iter().any(|ex| ex == name));
            if is_excluded {
                files_skipped += 1;
                info!(file = %path.display(), "Skipping excluded file");
                continue;
            }

            let mut file_rows = read_file(format, &path, schema)?;
            debug!(file = %path.display(), rows = file_rows.len(), "Read file");
            rows.append(&mut file_rows);
            files_read += 1;
        }

        info!(
            format = format.display_name(),
            rows = rows.len() - rows_before,
            "Finished extracting format"
        );
    }

    let mut row_set = RowSet::new(schema.clone());
    row_set.extend(rows)?;

    info!(
        rows = row_set.len(),
        files_read = files_read,
        files_skipped = files_skipped,
        "Extraction finished"
    );

    Ok(Extraction {
        row_set,
        files_read,
        files_skipped,
    })
}
